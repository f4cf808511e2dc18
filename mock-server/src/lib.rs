use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl ContactInput {
    fn is_complete(&self) -> bool {
        [&self.name, &self.phone, &self.email, &self.address]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Contact lists keyed by bearer token, in insertion order.
pub type Db = Arc<RwLock<HashMap<String, Vec<Contact>>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Build the router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/contacts/getContacts", get(list_contacts))
        .route("/api/contacts/addContact", post(add_contact))
        .route("/api/contacts/updateContact/{id}", put(update_contact))
        .route("/api/contacts/deleteContact/{id}", delete(delete_contact))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Token from `Authorization: Bearer <token>`, or 401.
fn bearer(headers: &HeaderMap) -> Result<String, StatusCode> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn list_contacts(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Contact>>, StatusCode> {
    let token = bearer(&headers)?;
    let contacts = db.read().await;
    Ok(Json(contacts.get(&token).cloned().unwrap_or_default()))
}

async fn add_contact(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<Contact>), StatusCode> {
    let token = bearer(&headers)?;
    if !input.is_complete() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let contact = Contact {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name,
        phone: input.phone,
        email: input.email,
        address: input.address,
    };
    tracing::debug!(id = %contact.id, "contact added");
    db.write()
        .await
        .entry(token)
        .or_default()
        .push(contact.clone());
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn update_contact(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ContactInput>,
) -> Result<Json<Contact>, StatusCode> {
    let token = bearer(&headers)?;
    if !input.is_complete() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut contacts = db.write().await;
    let contact = contacts
        .get_mut(&token)
        .and_then(|list| list.iter_mut().find(|c| c.id == id))
        .ok_or(StatusCode::NOT_FOUND)?;
    contact.name = input.name;
    contact.phone = input.phone;
    contact.email = input.email;
    contact.address = input.address;
    tracing::debug!(%id, "contact updated");
    Ok(Json(contact.clone()))
}

async fn delete_contact(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let token = bearer(&headers)?;
    let mut contacts = db.write().await;
    let list = contacts.get_mut(&token).ok_or(StatusCode::NOT_FOUND)?;
    let index = list
        .iter()
        .position(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    list.remove(index);
    tracing::debug!(%id, "contact deleted");
    Ok(Json(serde_json::json!({ "message": "Contact deleted" })))
}
