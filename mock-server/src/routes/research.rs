use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use super::clients::insert_contact;
use crate::store::{Client, Contact, ResearchLead, ResearchTheme, Store};
use crate::{require, ApiFailure, ApiResult, Db};

const CONVERTED: i32 = 3;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadInput {
    client_id: Option<i32>,
    contact_id: Option<i32>,
    research_theme_id: Option<i32>,
    business_name: String,
    date_contacted: NaiveDate,
    pain_points: Option<String>,
    #[serde(default = "default_interest")]
    interest_level: i32,
    follow_up_date: Option<NaiveDate>,
    notes: Option<String>,
    #[serde(default)]
    would_pay: i32,
    #[serde(default)]
    status: i32,
}

fn default_interest() -> i32 {
    3
}

impl LeadInput {
    fn validate(&self) -> ApiResult<()> {
        require("Business name", &self.business_name)?;
        if !(0..=4).contains(&self.status) {
            return Err(ApiFailure::bad_request(format!("Unknown lead status {}", self.status)));
        }
        if !(0..=2).contains(&self.would_pay) {
            return Err(ApiFailure::bad_request(format!(
                "Unknown would-pay value {}",
                self.would_pay
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromoteInput {
    #[serde(default = "company")]
    client_type: String,
    client_name: String,
    website: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    client_notes: Option<String>,
    contact_first_name: Option<String>,
    contact_last_name: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    contact_job_title: Option<String>,
}

fn company() -> String {
    "Company".to_string()
}

#[derive(Deserialize)]
struct ThemeInput {
    name: String,
    description: Option<String>,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/research", get(list_leads).post(create_lead))
        .route("/research/themes", get(list_themes).post(create_theme))
        .route("/research/themes/{id}", put(update_theme).delete(delete_theme))
        .route(
            "/research/{id}",
            get(get_lead).put(update_lead).delete(delete_lead),
        )
        .route("/research/{id}/promote", post(promote_lead))
}

fn lead_view(store: &Store, lead: &ResearchLead) -> ResearchLead {
    let mut view = lead.clone();
    view.client_name = lead
        .client_id
        .and_then(|id| store.clients.get(&id))
        .map(|c| c.name.clone());
    if let Some(contact) = lead.contact_id.and_then(|id| store.contacts.get(&id)) {
        view.contact_first_name = Some(contact.first_name.clone());
        view.contact_last_name = Some(contact.last_name.clone());
        view.contact_email = contact.email.clone();
        view.contact_phone = contact.phone.clone();
    }
    view.theme_name = lead
        .research_theme_id
        .and_then(|id| store.themes.get(&id))
        .map(|t| t.name.clone());
    view
}

fn check_theme(store: &Store, theme_id: Option<i32>) -> ApiResult<()> {
    match theme_id {
        Some(id) if !store.themes.contains_key(&id) => Err(ApiFailure::not_found("Research theme")),
        _ => Ok(()),
    }
}

async fn list_leads(State(db): State<Db>) -> Json<Vec<ResearchLead>> {
    let store = db.read().await;
    let mut leads: Vec<ResearchLead> = store.leads.values().map(|l| lead_view(&store, l)).collect();
    leads.sort_by(|a, b| b.date_contacted.cmp(&a.date_contacted));
    Json(leads)
}

async fn get_lead(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<Json<ResearchLead>> {
    let store = db.read().await;
    let lead = store.leads.get(&id).ok_or_else(|| ApiFailure::not_found("Research lead"))?;
    Ok(Json(lead_view(&store, lead)))
}

async fn create_lead(
    State(db): State<Db>,
    Json(input): Json<LeadInput>,
) -> ApiResult<(StatusCode, Json<ResearchLead>)> {
    input.validate()?;
    let mut store = db.write().await;
    check_theme(&store, input.research_theme_id)?;
    let now = Utc::now();
    let id = store.next_id();
    let lead = ResearchLead {
        research_lead_id: id,
        client_id: input.client_id,
        contact_id: input.contact_id,
        research_theme_id: input.research_theme_id,
        business_name: input.business_name,
        date_contacted: input.date_contacted,
        pain_points: input.pain_points,
        interest_level: input.interest_level,
        follow_up_date: input.follow_up_date,
        notes: input.notes,
        would_pay: input.would_pay,
        status: input.status,
        created_at: now,
        updated_at: now,
        client_name: None,
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        contact_phone: None,
        theme_name: None,
    };
    store.leads.insert(id, lead.clone());
    Ok((StatusCode::CREATED, Json(lead_view(&store, &lead))))
}

async fn update_lead(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<LeadInput>,
) -> ApiResult<Json<ResearchLead>> {
    input.validate()?;
    let mut store = db.write().await;
    check_theme(&store, input.research_theme_id)?;
    let lead = store
        .leads
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Research lead"))?;
    lead.client_id = input.client_id;
    lead.contact_id = input.contact_id;
    lead.research_theme_id = input.research_theme_id;
    lead.business_name = input.business_name;
    lead.date_contacted = input.date_contacted;
    lead.pain_points = input.pain_points;
    lead.interest_level = input.interest_level;
    lead.follow_up_date = input.follow_up_date;
    lead.notes = input.notes;
    lead.would_pay = input.would_pay;
    lead.status = input.status;
    lead.updated_at = Utc::now();
    let lead = lead.clone();
    Ok(Json(lead_view(&store, &lead)))
}

async fn delete_lead(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .leads
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("Research lead"))
}

/// Create a client (and a primary contact when a first name is given) from
/// the lead, link them, and mark the lead converted.
async fn promote_lead(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<PromoteInput>,
) -> ApiResult<Json<ResearchLead>> {
    require("Client name", &input.client_name)?;
    let mut store = db.write().await;
    let already_linked = store
        .leads
        .get(&id)
        .map(|l| l.client_id.is_some())
        .ok_or_else(|| ApiFailure::not_found("Research lead"))?;
    if already_linked {
        return Err(ApiFailure::bad_request("Lead is already linked to a client"));
    }

    let now = Utc::now();
    let client_id = store.next_id();
    store.clients.insert(
        client_id,
        Client {
            id: client_id,
            client_type: input.client_type,
            name: input.client_name,
            website: input.website,
            address_line1: input.address_line1,
            address_line2: input.address_line2,
            city: input.city,
            state: input.state,
            zip: input.zip,
            notes: input.client_notes,
            is_active: true,
            job_count: None,
            contact_count: None,
            created_at: now,
            updated_at: now,
        },
    );

    let contact_id = match input.contact_first_name.filter(|n| !n.trim().is_empty()) {
        Some(first_name) => {
            let contact = insert_contact(
                &mut store,
                Contact {
                    id: 0,
                    client_id,
                    first_name,
                    last_name: input.contact_last_name.unwrap_or_default(),
                    email: input.contact_email,
                    phone: input.contact_phone,
                    job_title: input.contact_job_title,
                    is_primary: true,
                    client_name: None,
                    created_at: now,
                },
            );
            Some(contact.id)
        }
        None => None,
    };

    let lead = store
        .leads
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Research lead"))?;
    lead.client_id = Some(client_id);
    lead.contact_id = contact_id;
    lead.status = CONVERTED;
    lead.updated_at = now;
    let lead = lead.clone();
    debug!(lead_id = id, client_id, "lead promoted");
    Ok(Json(lead_view(&store, &lead)))
}

async fn list_themes(State(db): State<Db>) -> Json<Vec<ResearchTheme>> {
    let store = db.read().await;
    Json(store.themes.values().cloned().collect())
}

async fn create_theme(
    State(db): State<Db>,
    Json(input): Json<ThemeInput>,
) -> ApiResult<(StatusCode, Json<ResearchTheme>)> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    let id = store.next_id();
    let theme = ResearchTheme {
        research_theme_id: id,
        name: input.name,
        description: input.description,
        created_at: Utc::now(),
    };
    store.themes.insert(id, theme.clone());
    Ok((StatusCode::CREATED, Json(theme)))
}

async fn update_theme(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<ThemeInput>,
) -> ApiResult<Json<ResearchTheme>> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    let theme = store
        .themes
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Research theme"))?;
    theme.name = input.name;
    theme.description = input.description;
    Ok(Json(theme.clone()))
}

/// Leads filed under the theme are kept and unfiled.
async fn delete_theme(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if store.themes.remove(&id).is_none() {
        return Err(ApiFailure::not_found("Research theme"));
    }
    for lead in store.leads.values_mut() {
        if lead.research_theme_id == Some(id) {
            lead.research_theme_id = None;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
