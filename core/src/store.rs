//! Ordered in-memory list of contacts, the single source of truth for
//! rendering.
//!
//! # Design
//! A `Vec` keeps insertion and response order, which is what the list shows.
//! Every mutation goes through an identifier lookup, so overlapping
//! completions resolve independently. Identifiers are unique at all times,
//! including while pending entries wait for their server id.

use std::collections::HashSet;

use crate::types::{Contact, ContactDraft, ContactId, EntryId, PendingId};

/// One row of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub details: ContactDraft,
}

impl Entry {
    pub fn is_pending(&self) -> bool {
        self.id.is_pending()
    }
}

impl From<Contact> for Entry {
    fn from(contact: Contact) -> Self {
        let (id, details) = contact.into_parts();
        Self {
            id: EntryId::Saved(id),
            details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactStore {
    entries: Vec<Entry>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole list, keeping the server's order.
    ///
    /// A response that repeats an id keeps only the first occurrence.
    /// Returns how many duplicates were dropped.
    pub fn replace_all(&mut self, contacts: Vec<Contact>) -> usize {
        let total = contacts.len();
        let mut seen = HashSet::with_capacity(total);
        self.entries = contacts
            .into_iter()
            .filter(|contact| seen.insert(contact.id.clone()))
            .map(Entry::from)
            .collect();
        total - self.entries.len()
    }

    /// A temporary id that no entry currently uses.
    pub fn fresh_pending_id(&self) -> PendingId {
        loop {
            let id = PendingId::random();
            if !self.contains(&EntryId::Pending(id)) {
                return id;
            }
        }
    }

    /// Optimistic insert at the end of the list.
    pub fn push_pending(&mut self, id: PendingId, details: ContactDraft) {
        debug_assert!(!self.contains(&EntryId::Pending(id)));
        self.entries.push(Entry {
            id: EntryId::Pending(id),
            details,
        });
    }

    /// Swap a pending entry for the record the server returned, in place.
    ///
    /// If the server id is already listed (a reload landed first), the
    /// pending entry is dropped instead so ids stay unique. Returns `false`
    /// when the pending entry is gone, e.g. because a reload replaced the
    /// list in the meantime; the store is then left alone.
    pub fn confirm(&mut self, pending: PendingId, contact: Contact) -> bool {
        let pending = EntryId::Pending(pending);
        let Some(index) = self.entries.iter().position(|entry| entry.id == pending) else {
            return false;
        };
        if self.contains(&EntryId::Saved(contact.id.clone())) {
            self.entries.remove(index);
        } else {
            self.entries[index] = Entry::from(contact);
        }
        true
    }

    /// Roll back an optimistic insert.
    pub fn discard(&mut self, pending: PendingId) -> bool {
        self.remove_entry(&EntryId::Pending(pending))
    }

    /// Overwrite the four fields of a saved entry; its id and position stay.
    pub fn apply_update(&mut self, id: &ContactId, details: ContactDraft) -> bool {
        let target = EntryId::Saved(id.clone());
        match self.entries.iter_mut().find(|entry| entry.id == target) {
            Some(entry) => {
                entry.details = details;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ContactId) -> bool {
        self.remove_entry(&EntryId::Saved(id.clone()))
    }

    fn remove_entry(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        before != self.entries.len()
    }
}
