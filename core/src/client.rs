//! Stateless HTTP request builder and response parser for the contacts API.
//!
//! # Design
//! `ContactsClient` holds only the base URL. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the caller runs the round-trip in between.
//! Every request is authenticated with the bearer credential passed in, so
//! the same client serves any session.

use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Credential;
use crate::types::{Contact, ContactDraft, ContactId};

const API_PREFIX: [&str; 2] = ["api", "contacts"];

/// Synchronous, stateless client for the contacts API.
#[derive(Debug, Clone)]
pub struct ContactsClient {
    base_url: Url,
}

impl ContactsClient {
    /// `base_url` may carry a path prefix; a trailing slash is ignored.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        Ok(Self { base_url: url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_list_contacts(&self, credential: &Credential) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(&["getContacts"]),
            headers: vec![auth_header(credential)],
            body: None,
        }
    }

    pub fn build_add_contact(
        &self,
        credential: &Credential,
        draft: &ContactDraft,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(&["addContact"]),
            headers: json_headers(credential),
            body: Some(to_json(draft)?),
        })
    }

    pub fn build_update_contact(
        &self,
        credential: &Credential,
        id: &ContactId,
        draft: &ContactDraft,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.endpoint(&["updateContact", id.as_str()]),
            headers: json_headers(credential),
            body: Some(to_json(draft)?),
        })
    }

    pub fn build_delete_contact(&self, credential: &Credential, id: &ContactId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.endpoint(&["deleteContact", id.as_str()]),
            headers: vec![auth_header(credential)],
            body: None,
        }
    }

    pub fn parse_list_contacts(&self, response: HttpResponse) -> Result<Vec<Contact>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_add_contact(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The body of a successful update is not used.
    pub fn parse_update_contact(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// The body of a successful delete is not used.
    pub fn parse_delete_contact(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// Append `/api/contacts/<segments..>` to the base URL, percent-encoding
    /// each segment.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Cannot fail: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url.into()
    }
}

fn auth_header(credential: &Credential) -> (String, String) {
    ("authorization".to_string(), credential.authorization())
}

fn json_headers(credential: &Credential) -> Vec<(String, String)> {
    vec![
        auth_header(credential),
        ("content-type".to_string(), "application/json".to_string()),
    ]
}

fn to_json(draft: &ContactDraft) -> Result<String, ApiError> {
    serde_json::to_string(draft).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Any 2xx is success; everything else becomes `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
