use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{StatusBody, StatusFilter};
use crate::store::{Job, Store};
use crate::{require, ApiFailure, ApiResult, Db};

pub(crate) const JOB_STATUSES: [&str; 5] = ["Lead", "Proposal", "Active", "Completed", "Invoiced"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobInput {
    client_id: i32,
    primary_contact_id: Option<i32>,
    title: String,
    description: Option<String>,
    status: Option<String>,
    billing_type: Option<String>,
    hourly_rate: Option<f64>,
    fixed_price: Option<f64>,
    retainer_amount: Option<f64>,
    estimated_value: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: Option<String>,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/by-client/{id}", get(jobs_by_client))
        .route("/jobs/{id}", get(get_job).put(update_job).delete(delete_job))
        .route("/jobs/{id}/status", patch(update_status))
}

fn check_status(status: &str) -> ApiResult<()> {
    if JOB_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiFailure::bad_request(format!("Unknown job status '{status}'")))
    }
}

pub(crate) fn job_view(store: &Store, job: &Job) -> Job {
    let mut view = job.clone();
    if let Some(client) = store.clients.get(&job.client_id) {
        view.client_name = Some(client.name.clone());
        view.client_type = Some(client.client_type.clone());
    }
    if let Some(contact) = job.primary_contact_id.and_then(|id| store.contacts.get(&id)) {
        view.contact_first_name = Some(contact.first_name.clone());
        view.contact_last_name = Some(contact.last_name.clone());
        view.contact_email = contact.email.clone();
    }
    let invoices: Vec<_> = store.invoices.values().filter(|i| i.job_id == job.id).collect();
    view.invoice_count = Some(invoices.len() as i32);
    view.total_paid = Some(invoices.iter().map(|i| i.total_paid).sum());
    view
}

async fn list_jobs(State(db): State<Db>, Query(q): Query<StatusFilter>) -> Json<Vec<Job>> {
    let store = db.read().await;
    Json(
        store
            .jobs
            .values()
            .filter(|j| q.status.as_deref().map_or(true, |s| j.status == s))
            .map(|j| job_view(&store, j))
            .collect(),
    )
}

async fn jobs_by_client(State(db): State<Db>, Path(client_id): Path<i32>) -> Json<Vec<Job>> {
    let store = db.read().await;
    Json(
        store
            .jobs
            .values()
            .filter(|j| j.client_id == client_id)
            .map(|j| job_view(&store, j))
            .collect(),
    )
}

async fn get_job(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<Json<Job>> {
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or_else(|| ApiFailure::not_found("Job"))?;
    Ok(Json(job_view(&store, job)))
}

async fn create_job(
    State(db): State<Db>,
    Json(input): Json<JobInput>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    require("Title", &input.title)?;
    let status = input.status.unwrap_or_else(|| "Lead".to_string());
    check_status(&status)?;
    let mut store = db.write().await;
    if !store.clients.contains_key(&input.client_id) {
        return Err(ApiFailure::not_found("Client"));
    }
    let now = Utc::now();
    let id = store.next_id();
    let job = Job {
        id,
        client_id: input.client_id,
        primary_contact_id: input.primary_contact_id,
        title: input.title,
        description: input.description,
        status,
        billing_type: input.billing_type,
        hourly_rate: input.hourly_rate,
        fixed_price: input.fixed_price,
        retainer_amount: input.retainer_amount,
        estimated_value: input.estimated_value,
        start_date: input.start_date,
        end_date: input.end_date,
        notes: input.notes,
        client_name: None,
        client_type: None,
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        invoice_count: None,
        total_paid: None,
        created_at: now,
        updated_at: now,
    };
    store.jobs.insert(id, job.clone());
    debug!(job_id = id, "job created");
    Ok((StatusCode::CREATED, Json(job_view(&store, &job))))
}

async fn update_job(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<JobInput>,
) -> ApiResult<Json<Job>> {
    require("Title", &input.title)?;
    let mut store = db.write().await;
    if !store.clients.contains_key(&input.client_id) {
        return Err(ApiFailure::not_found("Client"));
    }
    let job = store.jobs.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Job"))?;
    job.client_id = input.client_id;
    job.primary_contact_id = input.primary_contact_id;
    job.title = input.title;
    job.description = input.description;
    job.billing_type = input.billing_type;
    job.hourly_rate = input.hourly_rate;
    job.fixed_price = input.fixed_price;
    job.retainer_amount = input.retainer_amount;
    job.estimated_value = input.estimated_value;
    job.start_date = input.start_date;
    job.end_date = input.end_date;
    job.notes = input.notes;
    job.updated_at = Utc::now();
    let job = job.clone();
    Ok(Json(job_view(&store, &job)))
}

async fn update_status(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Job>> {
    check_status(&body.status)?;
    let mut store = db.write().await;
    let job = store.jobs.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Job"))?;
    job.status = body.status;
    job.updated_at = Utc::now();
    let job = job.clone();
    Ok(Json(job_view(&store, &job)))
}

async fn delete_job(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.jobs.contains_key(&id) {
        return Err(ApiFailure::not_found("Job"));
    }
    if store.invoices.values().any(|i| i.job_id == id) {
        return Err(ApiFailure::bad_request("Job has invoices and cannot be deleted"));
    }
    store.jobs.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
