use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::invoices::OPEN_STATUSES;
use super::jobs::JOB_STATUSES;
use crate::Db;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevenueSummary {
    total_revenue: f64,
    outstanding: f64,
    overdue: f64,
    draft: f64,
    paid_invoice_count: i32,
    pending_invoice_count: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobPipelineEntry {
    status: &'static str,
    count: i32,
    total_value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobIncome {
    job_id: i32,
    job_title: String,
    paid_amount: f64,
    invoiced_amount: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentActivity {
    entity_type: &'static str,
    entity_id: i32,
    summary: String,
    status: String,
    activity_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Limit {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/dashboard/revenue-summary", get(revenue_summary))
        .route("/dashboard/job-pipeline", get(job_pipeline))
        .route("/dashboard/income-by-job", get(income_by_job))
        .route("/dashboard/recent-activity", get(recent_activity))
}

async fn revenue_summary(State(db): State<Db>) -> Json<RevenueSummary> {
    let store = db.read().await;
    let mut summary = RevenueSummary {
        total_revenue: store.payments.values().map(|p| p.amount).sum(),
        outstanding: 0.0,
        overdue: 0.0,
        draft: 0.0,
        paid_invoice_count: 0,
        pending_invoice_count: 0,
    };
    for invoice in store.invoices.values() {
        let balance = invoice.amount - invoice.total_paid;
        match invoice.status.as_str() {
            "Paid" => summary.paid_invoice_count += 1,
            "Draft" => summary.draft += invoice.amount,
            status if OPEN_STATUSES.contains(&status) => {
                summary.pending_invoice_count += 1;
                summary.outstanding += balance;
                if status == "Overdue" {
                    summary.overdue += balance;
                }
            }
            _ => {}
        }
    }
    Json(summary)
}

/// One entry per job status, in pipeline order, including empty stages.
async fn job_pipeline(State(db): State<Db>) -> Json<Vec<JobPipelineEntry>> {
    let store = db.read().await;
    Json(
        JOB_STATUSES
            .iter()
            .map(|&status| {
                let jobs = store.jobs.values().filter(|j| j.status == status);
                let (count, total_value) = jobs.fold((0, 0.0), |(n, v), j| {
                    (n + 1, v + j.estimated_value.unwrap_or(0.0))
                });
                JobPipelineEntry {
                    status,
                    count,
                    total_value,
                }
            })
            .collect(),
    )
}

/// Paid and still-owed amounts per job, for jobs with any money in play.
async fn income_by_job(State(db): State<Db>) -> Json<Vec<JobIncome>> {
    let store = db.read().await;
    let mut rows: Vec<JobIncome> = store
        .jobs
        .values()
        .map(|job| {
            let invoices = store.invoices.values().filter(|i| i.job_id == job.id);
            let (paid, owed) = invoices.fold((0.0, 0.0), |(paid, owed), i| {
                let open = OPEN_STATUSES.contains(&i.status.as_str());
                let balance = if open { i.amount - i.total_paid } else { 0.0 };
                (paid + i.total_paid, owed + balance)
            });
            JobIncome {
                job_id: job.id,
                job_title: job.title.clone(),
                paid_amount: paid,
                invoiced_amount: owed,
            }
        })
        .filter(|row| row.paid_amount > 0.0 || row.invoiced_amount > 0.0)
        .collect();
    rows.sort_by(|a, b| {
        (b.paid_amount + b.invoiced_amount).total_cmp(&(a.paid_amount + a.invoiced_amount))
    });
    Json(rows)
}

async fn recent_activity(State(db): State<Db>, Query(q): Query<Limit>) -> Json<Vec<RecentActivity>> {
    let store = db.read().await;
    let jobs = store.jobs.values().map(|j| RecentActivity {
        entity_type: "Job",
        entity_id: j.id,
        summary: j.title.clone(),
        status: j.status.clone(),
        activity_date: j.updated_at,
    });
    let invoices = store.invoices.values().map(|i| RecentActivity {
        entity_type: "Invoice",
        entity_id: i.id,
        summary: format!("{}-{}", i.invoice_number, i.iteration),
        status: i.status.clone(),
        activity_date: i.updated_at,
    });
    let mut activity: Vec<RecentActivity> = jobs.chain(invoices).collect();
    activity.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
    activity.truncate(q.limit);
    Json(activity)
}
