use axum::Router;
use serde::Deserialize;

use crate::Db;

mod clients;
mod dashboard;
mod expenses;
mod invoices;
mod jobs;
mod notes;
mod research;
mod timeclock;

pub(crate) fn router() -> Router<Db> {
    Router::new()
        .merge(clients::routes())
        .merge(jobs::routes())
        .merge(invoices::routes())
        .merge(expenses::routes())
        .merge(notes::routes())
        .merge(research::routes())
        .merge(timeclock::routes())
        .merge(dashboard::routes())
}

/// `?active_only=true`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActiveOnly {
    #[serde(default)]
    pub active_only: bool,
}

/// `?status=...`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusFilter {
    pub status: Option<String>,
}

/// Body of the `PATCH .../status` routes.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    pub status: String,
}
