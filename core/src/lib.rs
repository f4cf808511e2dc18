//! Client-side core of the contacts manager.
//!
//! # Overview
//! Holds the contact list, the add/edit form and the session credential, and
//! turns user actions into HTTP requests for the contacts API. The core never
//! touches the network (host-does-IO): the host executes each `Outgoing`
//! request and feeds the outcome back through `ContactsManager::resolve`.
//!
//! # Design
//! - `ContactsClient` is stateless: `build_*` produces a request, `parse_*`
//!   consumes a response.
//! - `ContactsManager` owns all mutable state and applies `Command`s. Creation
//!   is optimistic; update and delete wait for the server.
//! - Failed exchanges are logged through `tracing` and compensated locally;
//!   they are never returned to the caller.
//! - `view::render` is a pure function of the manager state.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod manager;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use client::ContactsClient;
pub use error::{ApiError, CommandError, FormError};
pub use form::{Form, FormMode};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use manager::{Command, ContactsManager, Outgoing, Ticket};
pub use session::Credential;
pub use store::{ContactStore, Entry};
pub use types::{Contact, ContactDraft, ContactId, EntryId, Field, PendingId, UnknownField};
pub use view::{render, View};
