//! Line-oriented command language of the interactive host.

use contacts_core::{Command, EntryId, Field, UnknownField, View};
use thiserror::Error;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Set(Field, String),
    Submit,
    Edit(usize),
    Delete(usize),
    Login(String),
    Logout,
    Reload,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}`; try `help`")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] UnknownField),

    #[error("no row {0} in the list")]
    NoSuchRow(usize),
}

pub const HELP: &str = "\
commands:
  set <field> <value...>   edit a form field (name, phone, email, address)
  submit                   add the contact, or save the one being edited
  edit <row>               load a listed contact into the form
  delete <row>             delete a listed contact
  login <token>            start a session with a bearer token
  logout                   end the session
  reload                   fetch the list again
  show                     print the screen
  help                     print this help
  quit                     leave";

/// Parse one line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(InputError::Usage("set <field> <value...>"))?;
            Input::Set(field.parse()?, value.trim().to_string())
        }
        "submit" => Input::Submit,
        "edit" => Input::Edit(row_number(rest, "edit <row>")?),
        "delete" => Input::Delete(row_number(rest, "delete <row>")?),
        "login" if !rest.is_empty() => Input::Login(rest.to_string()),
        "login" => return Err(InputError::Usage("login <token>")),
        "logout" => Input::Logout,
        "reload" => Input::Reload,
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(input))
}

fn row_number(text: &str, usage: &'static str) -> Result<usize, InputError> {
    text.parse().map_err(|_| InputError::Usage(usage))
}

/// Translate rows into entry ids using the view the user is looking at.
///
/// `Show`, `Help` and `Quit` are handled by the host and map to `None`.
pub fn to_command(input: Input, view: &View) -> Result<Option<Command>, InputError> {
    let entry = |row: usize| -> Result<EntryId, InputError> {
        view.row(row)
            .map(|row| row.id.clone())
            .ok_or(InputError::NoSuchRow(row))
    };
    Ok(Some(match input {
        Input::Set(field, value) => Command::SetField(field, value),
        Input::Submit => Command::Submit,
        Input::Edit(row) => Command::BeginEdit(entry(row)?),
        Input::Delete(row) => Command::Delete(entry(row)?),
        Input::Login(token) => Command::SetCredential(Some(token)),
        Input::Logout => Command::SetCredential(None),
        Input::Reload => Command::Reload,
        Input::Show | Input::Help | Input::Quit => return Ok(None),
    }))
}
