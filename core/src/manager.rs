//! State owner for the contacts screen.
//!
//! # Design
//! `ContactsManager` owns the store, the form and the session credential.
//! User actions arrive as `Command`s. A command that needs the network hands
//! back an `Outgoing` request tagged with a `Ticket`; the host executes it
//! and later calls `resolve` with the ticket and the outcome. Each ticket
//! remembers what to do on completion, so any number of requests can be in
//! flight and each one settles against the store by identifier.
//!
//! Sync failures are never returned to the caller. They are logged and
//! answered with a local compensating action:
//!
//! | operation | on success                         | on failure             |
//! |-----------|------------------------------------|------------------------|
//! | load      | replace the whole store            | nothing                |
//! | create    | swap pending entry, reset draft    | drop pending entry     |
//! | update    | overwrite fields, leave edit mode  | nothing                |
//! | delete    | remove entry                       | nothing                |

use std::collections::HashMap;

use crate::client::ContactsClient;
use crate::error::{ApiError, CommandError};
use crate::form::{Form, FormMode};
use crate::http::{HttpRequest, HttpResponse};
use crate::session::Credential;
use crate::store::ContactStore;
use crate::types::{ContactDraft, ContactId, EntryId, Field, PendingId};

/// Handle correlating an `Outgoing` request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A request the host must execute and then `resolve`.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The session provider handed us a new token (or took it away).
    SetCredential(Option<String>),
    Reload,
    SetField(Field, String),
    Submit,
    BeginEdit(EntryId),
    Delete(EntryId),
}

/// What to do with the store once a ticket resolves.
#[derive(Debug, Clone)]
enum Pending {
    Load,
    Create { pending: PendingId },
    Update { id: ContactId, draft: ContactDraft },
    Delete { id: ContactId },
}

#[derive(Debug)]
pub struct ContactsManager {
    client: ContactsClient,
    credential: Option<Credential>,
    store: ContactStore,
    form: Form,
    in_flight: HashMap<Ticket, Pending>,
    next_ticket: u64,
}

impl ContactsManager {
    pub fn new(client: ContactsClient) -> Self {
        Self {
            client,
            credential: None,
            store: ContactStore::new(),
            form: Form::new(),
            in_flight: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn has_session(&self) -> bool {
        self.credential.is_some()
    }

    /// Number of requests handed out and not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Apply one user action. `Ok(None)` means the action was purely local.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<Outgoing>, CommandError> {
        match command {
            Command::SetCredential(token) => Ok(self.set_credential(token)),
            Command::Reload => self.load().map(Some),
            Command::SetField(field, value) => {
                self.set_field(field, value);
                Ok(None)
            }
            Command::Submit => self.submit().map(Some),
            Command::BeginEdit(id) => self.begin_edit(&id).map(|()| None),
            Command::Delete(id) => self.delete(&id).map(Some),
        }
    }

    /// Install a new credential. Loads the list when the token actually
    /// changed to a non-empty value; an empty token ends the session but
    /// leaves the list as it is.
    pub fn set_credential(&mut self, token: Option<String>) -> Option<Outgoing> {
        let credential = token.and_then(Credential::new);
        if credential == self.credential {
            return None;
        }
        self.credential = credential;
        match self.credential {
            Some(_) => self.load().ok(),
            None => {
                tracing::info!("session ended");
                None
            }
        }
    }

    /// Fetch the whole list. Every call issues a new request; each completion
    /// replaces the store with its own response.
    pub fn load(&mut self) -> Result<Outgoing, CommandError> {
        let credential = self.credential.as_ref().ok_or(CommandError::NoSession)?;
        let request = self.client.build_list_contacts(credential);
        Ok(self.issue(Pending::Load, request))
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    /// Route the draft to create or update depending on the form mode.
    pub fn submit(&mut self) -> Result<Outgoing, CommandError> {
        self.form.validate()?;
        let credential = self.credential.as_ref().ok_or(CommandError::NoSession)?;
        let draft = self.form.draft().clone();

        let (pending, request) = match self.form.mode() {
            FormMode::Create => {
                let request = self.client.build_add_contact(credential, &draft);
                let id = self.store.fresh_pending_id();
                (Pending::Create { pending: id }, request)
            }
            FormMode::Edit(id) => {
                let request = self.client.build_update_contact(credential, id, &draft);
                let id = id.clone();
                (Pending::Update { id, draft: draft.clone() }, request)
            }
        };

        // A draft that cannot be encoded never reaches the wire; treat it like
        // any other failed exchange.
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                self.fail(&pending, &err);
                return Err(CommandError::Unsendable(err.to_string()));
            }
        };

        if let Pending::Create { pending: id } = &pending {
            tracing::debug!(pending = %id, "optimistic insert");
            self.store.push_pending(*id, draft);
        }
        Ok(self.issue(pending, request))
    }

    /// Copy a saved contact into the draft and switch to edit mode.
    pub fn begin_edit(&mut self, id: &EntryId) -> Result<(), CommandError> {
        let contact_id = self.saved_entry(id)?;
        let details = self
            .store
            .get(id)
            .map(|entry| entry.details.clone())
            .unwrap_or_default();
        tracing::debug!(id = %contact_id, "editing contact");
        self.form.begin_edit(contact_id, details);
        Ok(())
    }

    pub fn delete(&mut self, id: &EntryId) -> Result<Outgoing, CommandError> {
        let contact_id = self.saved_entry(id)?;
        let credential = self.credential.as_ref().ok_or(CommandError::NoSession)?;
        let request = self.client.build_delete_contact(credential, &contact_id);
        Ok(self.issue(Pending::Delete { id: contact_id }, request))
    }

    /// Settle a ticket with the host's outcome. Unknown tickets are ignored.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<HttpResponse, ApiError>) {
        let Some(pending) = self.in_flight.remove(&ticket) else {
            tracing::warn!(?ticket, "resolve called for unknown ticket");
            return;
        };
        if let Err(err) = self.complete(&pending, outcome) {
            self.fail(&pending, &err);
        }
    }

    fn complete(
        &mut self,
        pending: &Pending,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<(), ApiError> {
        let response = outcome?;
        match pending {
            Pending::Load => {
                let contacts = self.client.parse_list_contacts(response)?;
                let count = contacts.len();
                let dropped = self.store.replace_all(contacts);
                if dropped > 0 {
                    tracing::warn!(dropped, "contact list repeated ids; kept first occurrences");
                }
                tracing::info!(count, "fetched contacts");
            }
            Pending::Create { pending } => {
                let contact = self.client.parse_add_contact(response)?;
                tracing::info!(id = %contact.id, "added contact");
                if !self.store.confirm(*pending, contact) {
                    tracing::debug!(%pending, "pending contact no longer listed");
                }
                self.form.reset_draft();
            }
            Pending::Update { id, draft } => {
                self.client.parse_update_contact(response)?;
                tracing::info!(%id, "updated contact");
                self.store.apply_update(id, draft.clone());
                self.form.finish_edit();
            }
            Pending::Delete { id } => {
                self.client.parse_delete_contact(response)?;
                tracing::info!(%id, "deleted contact");
                self.store.remove(id);
            }
        }
        Ok(())
    }

    fn fail(&mut self, pending: &Pending, err: &ApiError) {
        match pending {
            Pending::Load => tracing::error!(error = %err, "failed to fetch contacts"),
            Pending::Create { pending } => {
                tracing::error!(error = %err, "failed to add contact");
                self.store.discard(*pending);
            }
            Pending::Update { id, .. } => {
                tracing::error!(error = %err, %id, "failed to update contact");
            }
            Pending::Delete { id } => {
                tracing::error!(error = %err, %id, "failed to delete contact");
            }
        }
    }

    fn issue(&mut self, pending: Pending, request: HttpRequest) -> Outgoing {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        tracing::debug!(?ticket, method = request.method.as_str(), url = %request.url, "issuing request");
        self.in_flight.insert(ticket, pending);
        Outgoing { ticket, request }
    }

    /// The server id behind an entry, if the entry exists and is confirmed.
    fn saved_entry(&self, id: &EntryId) -> Result<ContactId, CommandError> {
        if !self.store.contains(id) {
            return Err(CommandError::UnknownEntry(id.clone()));
        }
        match id.saved() {
            Some(contact_id) => Ok(contact_id.clone()),
            None => {
                tracing::debug!(%id, "ignoring action on unconfirmed contact");
                Err(CommandError::Unconfirmed(id.clone()))
            }
        }
    }
}
