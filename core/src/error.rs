//! Error types for the contacts client.
//!
//! # Design
//! `ApiError` covers everything that can go wrong on a sync exchange. The
//! manager does not branch on the variant: every one of them is logged and
//! answered with the same compensating action. The variants exist so the log
//! line says what actually happened.
//!
//! `CommandError` is the local refusal of a user command before any request
//! is built. It never describes a network outcome.

use thiserror::Error;

use crate::types::{EntryId, Field};

/// Failure of a request/response exchange with the contacts API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The host could not complete the round-trip at all.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Why the draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("`{0}` is not an email address")]
    InvalidEmail(String),
}

/// A user command that was refused without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("no session credential; log in first")]
    NoSession,

    #[error("no contact {0} in the list")]
    UnknownEntry(EntryId),

    #[error("contact {0} is still being saved")]
    Unconfirmed(EntryId),

    #[error("request could not be built: {0}")]
    Unsendable(String),
}
