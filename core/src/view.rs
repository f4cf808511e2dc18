//! Pure rendering of the manager state into a view model.
//!
//! # Design
//! `render` reads the form and the store and nothing else, so the same state
//! always yields the same `View`. Hosts draw the view however they like; the
//! `Display` impl is the plain-text layout the CLI prints.

use std::fmt;

use crate::form::FormMode;
use crate::manager::ContactsManager;
use crate::types::{EntryId, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub field: Field,
    pub label: &'static str,
    pub kind: InputKind,
    pub placeholder: &'static str,
    pub value: String,
    pub required: bool,
}

/// Per-row affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 1-based position in the list.
    pub position: usize,
    pub id: EntryId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub inputs: Vec<InputView>,
    pub list_heading: &'static str,
    pub rows: Vec<RowView>,
}

impl View {
    pub fn is_editing(&self) -> bool {
        self.heading == EDIT_HEADING
    }

    /// Entry shown at a 1-based row position.
    pub fn row(&self, position: usize) -> Option<&RowView> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
    }
}

const ADD_HEADING: &str = "Add Contact";
const EDIT_HEADING: &str = "Edit Contact";

pub fn render(manager: &ContactsManager) -> View {
    let form = manager.form();
    let (heading, submit_label) = match form.mode() {
        FormMode::Create => (ADD_HEADING, "Add Contact"),
        FormMode::Edit(_) => (EDIT_HEADING, "Update Contact"),
    };

    let inputs = Field::ALL
        .into_iter()
        .map(|field| {
            let (label, kind, placeholder) = input_layout(field);
            InputView {
                field,
                label,
                kind,
                placeholder,
                value: form.draft().get(field).to_string(),
                required: true,
            }
        })
        .collect();

    let rows = manager
        .store()
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| RowView {
            position: index + 1,
            id: entry.id.clone(),
            name: entry.details.name.clone(),
            phone: entry.details.phone.clone(),
            email: entry.details.email.clone(),
            address: entry.details.address.clone(),
            actions: if entry.is_pending() {
                Vec::new()
            } else {
                vec![RowAction::Edit, RowAction::Delete]
            },
        })
        .collect();

    View {
        heading,
        submit_label,
        inputs,
        list_heading: "Your Contacts",
        rows,
    }
}

fn input_layout(field: Field) -> (&'static str, InputKind, &'static str) {
    match field {
        Field::Name => ("Name", InputKind::Text, "John Doe"),
        Field::Phone => ("Phone", InputKind::Text, "(123) 456-7890"),
        Field::Email => ("Email", InputKind::Email, "john.doe@example.com"),
        Field::Address => ("Address", InputKind::Text, "123 Main St"),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.heading)?;
        for input in &self.inputs {
            let marker = if input.required { "*" } else { "" };
            let label = format!("{}{marker}", input.label);
            if input.value.is_empty() {
                writeln!(f, "  {label:<9} [ ] e.g. {}", input.placeholder)?;
            } else {
                writeln!(f, "  {label:<9} [{}]", input.value)?;
            }
        }
        writeln!(f, "  <{}>", self.submit_label)?;
        writeln!(f)?;

        writeln!(f, "== {} ==", self.list_heading)?;
        if self.rows.is_empty() {
            return writeln!(f, "  (no contacts)");
        }
        for row in &self.rows {
            if row.actions.is_empty() {
                writeln!(f, "  {}. {} (saving)", row.position, row.name)?;
            } else {
                writeln!(f, "  {}. {}", row.position, row.name)?;
            }
            for line in [&row.phone, &row.email, &row.address] {
                writeln!(f, "     {line}")?;
            }
            if !row.actions.is_empty() {
                let actions: Vec<&str> = row
                    .actions
                    .iter()
                    .map(|action| match action {
                        RowAction::Edit => "[edit]",
                        RowAction::Delete => "[delete]",
                    })
                    .collect();
                writeln!(f, "     {}", actions.join(" "))?;
            }
        }
        Ok(())
    }
}
