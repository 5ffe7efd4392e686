//! Kiosk punches. Every call carries the worker's employee id and passcode;
//! clock invariants are enforced here, not by the kiosk.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ActiveOnly;
use crate::store::{JobCode, Store, TimePunch, Worker};
use crate::{ApiFailure, ApiResult, Db};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credentials {
    employee_id: String,
    passcode: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClockInInput {
    #[serde(flatten)]
    credentials: Credentials,
    job_code_id: i32,
    job_id: Option<i32>,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClockOutInput {
    #[serde(flatten)]
    credentials: Credentials,
    notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PunchStatus {
    worker_id: i32,
    employee_id: String,
    first_name: String,
    last_name: String,
    is_clocked_in: bool,
    punch_id: Option<i32>,
    job_code_id: Option<i32>,
    job_id: Option<i32>,
    clock_in: Option<DateTime<Utc>>,
    notes: Option<String>,
    job_code_code: Option<i32>,
    job_code_name: Option<String>,
    job_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    worker_id: Option<i32>,
    job_code_id: Option<i32>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/timeclock/status", post(status))
        .route("/timeclock/clock-in", post(clock_in))
        .route("/timeclock/clock-out", post(clock_out))
        .route("/timeclock/switch", post(switch))
        .route("/timeclock/history", get(history))
        .route("/timeclock/job-codes", get(job_codes))
        .route("/timeclock/workers", get(workers))
}

fn authenticate(store: &Store, credentials: &Credentials) -> ApiResult<Worker> {
    store
        .worker_by_credentials(credentials.employee_id.trim(), credentials.passcode.trim())
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Invalid employee ID or passcode"))
}

fn punch_view(store: &Store, punch: &TimePunch) -> TimePunch {
    let mut view = punch.clone();
    if let Some(worker) = store.workers.get(&punch.worker_id) {
        view.worker_first_name = worker.first_name.clone();
        view.worker_last_name = worker.last_name.clone();
    }
    if let Some(code) = store.job_codes.get(&punch.job_code_id) {
        view.job_code_code = code.code;
        view.job_code_name = code.name.clone();
    }
    view.job_title = punch
        .job_id
        .and_then(|id| store.jobs.get(&id))
        .map(|j| j.title.clone());
    view.total_minutes = punch.clock_out.map(|out| (out - punch.clock_in).num_minutes());
    view
}

fn check_job_code(store: &Store, job_code_id: i32, job_id: Option<i32>) -> ApiResult<()> {
    if !store.job_codes.get(&job_code_id).is_some_and(|c| c.is_active) {
        return Err(ApiFailure::not_found("Job code"));
    }
    if let Some(job_id) = job_id {
        if !store.jobs.contains_key(&job_id) {
            return Err(ApiFailure::not_found("Job"));
        }
    }
    Ok(())
}

fn open_punch(
    store: &mut Store,
    worker_id: i32,
    job_code_id: i32,
    job_id: Option<i32>,
    notes: Option<String>,
) -> TimePunch {
    let now = Utc::now();
    let id = store.next_id();
    let punch = TimePunch {
        id,
        worker_id,
        job_code_id,
        job_id,
        clock_in: now,
        clock_out: None,
        notes,
        created_at: now,
        worker_first_name: String::new(),
        worker_last_name: String::new(),
        job_code_code: 0,
        job_code_name: String::new(),
        job_title: None,
        total_minutes: None,
    };
    store.punches.insert(id, punch.clone());
    punch
}

fn close_punch(store: &mut Store, punch_id: i32, notes: Option<String>) -> Option<TimePunch> {
    let punch = store.punches.get_mut(&punch_id)?;
    punch.clock_out = Some(Utc::now());
    if notes.is_some() {
        punch.notes = notes;
    }
    Some(punch.clone())
}

async fn status(State(db): State<Db>, Json(credentials): Json<Credentials>) -> ApiResult<Json<PunchStatus>> {
    let store = db.read().await;
    let worker = authenticate(&store, &credentials)?;
    let open = store
        .open_punch_id(worker.id)
        .and_then(|id| store.punches.get(&id))
        .map(|p| punch_view(&store, p));
    Ok(Json(PunchStatus {
        worker_id: worker.id,
        employee_id: worker.employee_id,
        first_name: worker.first_name,
        last_name: worker.last_name,
        is_clocked_in: open.is_some(),
        punch_id: open.as_ref().map(|p| p.id),
        job_code_id: open.as_ref().map(|p| p.job_code_id),
        job_id: open.as_ref().and_then(|p| p.job_id),
        clock_in: open.as_ref().map(|p| p.clock_in),
        notes: open.as_ref().and_then(|p| p.notes.clone()),
        job_code_code: open.as_ref().map(|p| p.job_code_code),
        job_code_name: open.as_ref().map(|p| p.job_code_name.clone()),
        job_title: open.and_then(|p| p.job_title),
    }))
}

async fn clock_in(State(db): State<Db>, Json(input): Json<ClockInInput>) -> ApiResult<Json<TimePunch>> {
    let mut store = db.write().await;
    let worker = authenticate(&store, &input.credentials)?;
    if store.open_punch_id(worker.id).is_some() {
        return Err(ApiFailure::bad_request("Worker is already clocked in"));
    }
    check_job_code(&store, input.job_code_id, input.job_id)?;
    let punch = open_punch(&mut store, worker.id, input.job_code_id, input.job_id, input.notes);
    info!(worker_id = worker.id, punch_id = punch.id, "clocked in");
    Ok(Json(punch_view(&store, &punch)))
}

async fn clock_out(State(db): State<Db>, Json(input): Json<ClockOutInput>) -> ApiResult<Json<TimePunch>> {
    let mut store = db.write().await;
    let worker = authenticate(&store, &input.credentials)?;
    let open = store
        .open_punch_id(worker.id)
        .ok_or_else(|| ApiFailure::bad_request("Worker is not clocked in"))?;
    let punch = close_punch(&mut store, open, input.notes)
        .ok_or_else(|| ApiFailure::not_found("Time punch"))?;
    info!(worker_id = worker.id, punch_id = punch.id, "clocked out");
    Ok(Json(punch_view(&store, &punch)))
}

/// Close the open punch and open a new one under another job code.
async fn switch(State(db): State<Db>, Json(input): Json<ClockInInput>) -> ApiResult<Json<TimePunch>> {
    let mut store = db.write().await;
    let worker = authenticate(&store, &input.credentials)?;
    let open = store
        .open_punch_id(worker.id)
        .ok_or_else(|| ApiFailure::bad_request("Worker is not clocked in"))?;
    check_job_code(&store, input.job_code_id, input.job_id)?;
    if store.punches.get(&open).is_some_and(|p| p.job_code_id == input.job_code_id) {
        return Err(ApiFailure::bad_request("Already clocked in under that job code"));
    }
    close_punch(&mut store, open, None);
    let punch = open_punch(&mut store, worker.id, input.job_code_id, input.job_id, input.notes);
    info!(worker_id = worker.id, punch_id = punch.id, "switched job code");
    Ok(Json(punch_view(&store, &punch)))
}

async fn history(State(db): State<Db>, Query(q): Query<HistoryQuery>) -> Json<Vec<TimePunch>> {
    let store = db.read().await;
    let mut punches: Vec<TimePunch> = store
        .punches
        .values()
        .filter(|p| q.worker_id.map_or(true, |id| p.worker_id == id))
        .filter(|p| q.job_code_id.map_or(true, |id| p.job_code_id == id))
        .filter(|p| q.from_date.map_or(true, |d| p.clock_in.date_naive() >= d))
        .filter(|p| q.to_date.map_or(true, |d| p.clock_in.date_naive() <= d))
        .map(|p| punch_view(&store, p))
        .collect();
    punches.sort_by(|a, b| b.clock_in.cmp(&a.clock_in).then(b.id.cmp(&a.id)));
    Json(punches)
}

async fn job_codes(State(db): State<Db>, Query(q): Query<ActiveOnly>) -> Json<Vec<JobCode>> {
    let store = db.read().await;
    let mut codes: Vec<JobCode> = store
        .job_codes
        .values()
        .filter(|c| !q.active_only || c.is_active)
        .cloned()
        .collect();
    codes.sort_by_key(|c| c.code);
    Json(codes)
}

async fn workers(State(db): State<Db>, Query(q): Query<ActiveOnly>) -> Json<Vec<Worker>> {
    let store = db.read().await;
    Json(
        store
            .workers
            .values()
            .filter(|w| !q.active_only || w.is_active)
            .cloned()
            .collect(),
    )
}
