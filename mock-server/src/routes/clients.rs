use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::ActiveOnly;
use crate::store::{Client, Contact, Store};
use crate::{require, ApiFailure, ApiResult, Db};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientInput {
    #[serde(rename = "type", default = "company")]
    client_type: String,
    name: String,
    website: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    notes: Option<String>,
}

fn company() -> String {
    "Company".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactInput {
    client_id: Option<i32>,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    job_title: Option<String>,
    #[serde(default)]
    is_primary: bool,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/{id}", get(get_client).put(update_client))
        .route("/clients/{id}/deactivate", patch(deactivate_client))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/by-client/{id}", get(contacts_by_client))
        .route("/contacts/{id}", put(update_contact))
        .route("/contacts/{id}/remove", patch(remove_contact))
}

pub(crate) fn client_view(store: &Store, client: &Client) -> Client {
    let mut view = client.clone();
    view.job_count = Some(store.jobs.values().filter(|j| j.client_id == client.id).count() as i32);
    view.contact_count = Some(
        store
            .contacts
            .values()
            .filter(|c| c.client_id == client.id)
            .count() as i32,
    );
    view
}

pub(crate) fn contact_view(store: &Store, contact: &Contact) -> Contact {
    let mut view = contact.clone();
    view.client_name = store.clients.get(&contact.client_id).map(|c| c.name.clone());
    view
}

/// Insert a contact; a new primary contact demotes the client's others.
pub(crate) fn insert_contact(store: &mut Store, mut contact: Contact) -> Contact {
    contact.id = store.next_id();
    if contact.is_primary {
        for other in store.contacts.values_mut() {
            if other.client_id == contact.client_id {
                other.is_primary = false;
            }
        }
    }
    store.contacts.insert(contact.id, contact.clone());
    contact
}

async fn list_clients(State(db): State<Db>, Query(q): Query<ActiveOnly>) -> Json<Vec<Client>> {
    let store = db.read().await;
    Json(
        store
            .clients
            .values()
            .filter(|c| !q.active_only || c.is_active)
            .map(|c| client_view(&store, c))
            .collect(),
    )
}

async fn get_client(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<Json<Client>> {
    let store = db.read().await;
    let client = store.clients.get(&id).ok_or_else(|| ApiFailure::not_found("Client"))?;
    Ok(Json(client_view(&store, client)))
}

async fn create_client(
    State(db): State<Db>,
    Json(input): Json<ClientInput>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    let now = Utc::now();
    let id = store.next_id();
    let client = Client {
        id,
        client_type: input.client_type,
        name: input.name,
        website: input.website,
        address_line1: input.address_line1,
        address_line2: input.address_line2,
        city: input.city,
        state: input.state,
        zip: input.zip,
        notes: input.notes,
        is_active: true,
        job_count: None,
        contact_count: None,
        created_at: now,
        updated_at: now,
    };
    store.clients.insert(id, client.clone());
    debug!(client_id = id, "client created");
    Ok((StatusCode::CREATED, Json(client_view(&store, &client))))
}

async fn update_client(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<ClientInput>,
) -> ApiResult<Json<Client>> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    let client = store.clients.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Client"))?;
    client.client_type = input.client_type;
    client.name = input.name;
    client.website = input.website;
    client.address_line1 = input.address_line1;
    client.address_line2 = input.address_line2;
    client.city = input.city;
    client.state = input.state;
    client.zip = input.zip;
    client.notes = input.notes;
    client.updated_at = Utc::now();
    let client = client.clone();
    Ok(Json(client_view(&store, &client)))
}

async fn deactivate_client(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let client = store.clients.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Client"))?;
    client.is_active = false;
    client.updated_at = Utc::now();
    Ok(StatusCode::NO_CONTENT)
}

async fn list_contacts(State(db): State<Db>) -> Json<Vec<Contact>> {
    let store = db.read().await;
    Json(store.contacts.values().map(|c| contact_view(&store, c)).collect())
}

async fn contacts_by_client(State(db): State<Db>, Path(client_id): Path<i32>) -> Json<Vec<Contact>> {
    let store = db.read().await;
    Json(
        store
            .contacts
            .values()
            .filter(|c| c.client_id == client_id)
            .map(|c| contact_view(&store, c))
            .collect(),
    )
}

async fn create_contact(
    State(db): State<Db>,
    Json(input): Json<ContactInput>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    require("First name", &input.first_name)?;
    require("Last name", &input.last_name)?;
    let client_id = input
        .client_id
        .ok_or_else(|| ApiFailure::bad_request("Client is required"))?;
    let mut store = db.write().await;
    if !store.clients.contains_key(&client_id) {
        return Err(ApiFailure::not_found("Client"));
    }
    let contact = insert_contact(
        &mut store,
        Contact {
            id: 0,
            client_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            job_title: input.job_title,
            is_primary: input.is_primary,
            client_name: None,
            created_at: Utc::now(),
        },
    );
    Ok((StatusCode::CREATED, Json(contact_view(&store, &contact))))
}

async fn update_contact(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<ContactInput>,
) -> ApiResult<Json<Contact>> {
    require("First name", &input.first_name)?;
    require("Last name", &input.last_name)?;
    let mut store = db.write().await;
    let client_id = store
        .contacts
        .get(&id)
        .map(|c| c.client_id)
        .ok_or_else(|| ApiFailure::not_found("Contact"))?;
    if input.is_primary {
        for other in store.contacts.values_mut() {
            if other.client_id == client_id && other.id != id {
                other.is_primary = false;
            }
        }
    }
    let contact = store.contacts.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Contact"))?;
    contact.first_name = input.first_name;
    contact.last_name = input.last_name;
    contact.email = input.email;
    contact.phone = input.phone;
    contact.job_title = input.job_title;
    contact.is_primary = input.is_primary;
    let contact = contact.clone();
    Ok(Json(contact_view(&store, &contact)))
}

async fn remove_contact(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .contacts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("Contact"))
}
