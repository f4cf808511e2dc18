//! The contact form: a draft plus the id of the contact being edited, if any.

use crate::error::FormError;
use crate::types::{ContactDraft, ContactId, Field};

/// Whether submitting the form creates a new contact or updates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<'a> {
    Create,
    Edit(&'a ContactId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    draft: ContactDraft,
    editing: Option<ContactId>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&ContactId> {
        self.editing.as_ref()
    }

    pub fn mode(&self) -> FormMode<'_> {
        match &self.editing {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Load a saved contact into the draft and switch to edit mode.
    pub fn begin_edit(&mut self, id: ContactId, details: ContactDraft) {
        self.draft = details;
        self.editing = Some(id);
    }

    pub fn reset_draft(&mut self) {
        self.draft = ContactDraft::default();
    }

    pub fn finish_edit(&mut self) {
        self.editing = None;
        self.reset_draft();
    }

    /// The constraints the inputs themselves enforce: every field is
    /// required and the email input only takes an address.
    pub fn validate(&self) -> Result<(), FormError> {
        if let Some(field) = Field::ALL
            .into_iter()
            .find(|field| self.draft.get(*field).trim().is_empty())
        {
            return Err(FormError::MissingField(field));
        }
        if !looks_like_email(&self.draft.email) {
            return Err(FormError::InvalidEmail(self.draft.email.clone()));
        }
        Ok(())
    }
}

/// `local@domain` with both parts non-empty and no whitespace.
fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
