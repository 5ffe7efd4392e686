use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{StatusBody, StatusFilter};
use crate::store::{Invoice, LineItem, Payment, Store};
use crate::{require, ApiFailure, ApiResult, Db};

pub(crate) const INVOICE_STATUSES: [&str; 6] =
    ["Draft", "Sent", "Partially Paid", "Paid", "Overdue", "Cancelled"];

/// Statuses whose unpaid balance is still owed.
pub(crate) const OPEN_STATUSES: [&str; 3] = ["Sent", "Partially Paid", "Overdue"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceInput {
    job_id: Option<i32>,
    amount: f64,
    issued_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentInput {
    amount: f64,
    paid_date: NaiveDate,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemInput {
    invoice_id: Option<i32>,
    description: String,
    quantity: f64,
    unit_price: f64,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/by-job/{id}", get(invoices_by_job))
        .route("/invoices/by-client/{id}", get(invoices_by_client))
        .route("/invoices/line-items", post(add_line_item))
        .route(
            "/invoices/line-items/{id}",
            put(update_line_item).delete(delete_line_item),
        )
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/{id}/status", patch(update_status))
        .route("/invoices/{id}/payments", get(list_payments).post(record_payment))
        .route("/invoices/{id}/line-items", get(list_line_items))
}

pub(crate) fn invoice_view(store: &Store, invoice: &Invoice) -> Invoice {
    let mut view = invoice.clone();
    if let Some(job) = store.jobs.get(&invoice.job_id) {
        view.job_title = Some(job.title.clone());
        view.billing_type = job.billing_type.clone();
        if let Some(client) = store.clients.get(&job.client_id) {
            view.client_name = Some(client.name.clone());
            view.address_line1 = client.address_line1.clone();
            view.address_line2 = client.address_line2.clone();
            view.city = client.city.clone();
            view.state = client.state.clone();
            view.zip = client.zip.clone();
        }
    }
    view
}

fn views<'a>(store: &Store, invoices: impl Iterator<Item = &'a Invoice>) -> Vec<Invoice> {
    invoices.map(|i| invoice_view(store, i)).collect()
}

/// Invoice amount follows its line items once it has any.
fn recompute_amount(store: &mut Store, invoice_id: i32) {
    let items: Vec<f64> = store
        .line_items
        .values()
        .filter(|li| li.invoice_id == invoice_id)
        .map(|li| li.line_total)
        .collect();
    if items.is_empty() {
        return;
    }
    if let Some(invoice) = store.invoices.get_mut(&invoice_id) {
        invoice.amount = items.iter().sum();
        invoice.updated_at = Utc::now();
    }
}

async fn list_invoices(State(db): State<Db>, Query(q): Query<StatusFilter>) -> Json<Vec<Invoice>> {
    let store = db.read().await;
    let status = q.status.as_deref();
    Json(views(
        &store,
        store
            .invoices
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s)),
    ))
}

async fn invoices_by_job(State(db): State<Db>, Path(job_id): Path<i32>) -> Json<Vec<Invoice>> {
    let store = db.read().await;
    Json(views(&store, store.invoices.values().filter(|i| i.job_id == job_id)))
}

async fn invoices_by_client(State(db): State<Db>, Path(client_id): Path<i32>) -> Json<Vec<Invoice>> {
    let store = db.read().await;
    Json(views(
        &store,
        store.invoices.values().filter(|i| {
            store
                .jobs
                .get(&i.job_id)
                .is_some_and(|j| j.client_id == client_id)
        }),
    ))
}

async fn get_invoice(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<Json<Invoice>> {
    let store = db.read().await;
    let invoice = store.invoices.get(&id).ok_or_else(|| ApiFailure::not_found("Invoice"))?;
    Ok(Json(invoice_view(&store, invoice)))
}

async fn create_invoice(
    State(db): State<Db>,
    Json(input): Json<InvoiceInput>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let job_id = input
        .job_id
        .ok_or_else(|| ApiFailure::bad_request("Job is required"))?;
    if input.amount < 0.0 {
        return Err(ApiFailure::bad_request("Amount cannot be negative"));
    }
    let mut store = db.write().await;
    if !store.jobs.contains_key(&job_id) {
        return Err(ApiFailure::not_found("Job"));
    }
    let iteration = store.invoices.values().filter(|i| i.job_id == job_id).count() as i32 + 1;
    let now = Utc::now();
    let id = store.next_id();
    let invoice = Invoice {
        id,
        job_id,
        invoice_number: format!("INV-{job_id:04}"),
        iteration,
        status: "Draft".to_string(),
        amount: input.amount,
        issued_date: input.issued_date,
        due_date: input.due_date,
        paid_date: None,
        notes: input.notes,
        job_title: None,
        billing_type: None,
        client_name: None,
        address_line1: None,
        address_line2: None,
        city: None,
        state: None,
        zip: None,
        total_paid: 0.0,
        network_file_path: None,
        created_at: now,
        updated_at: now,
    };
    store.invoices.insert(id, invoice.clone());
    debug!(invoice_id = id, job_id, "invoice created");
    Ok((StatusCode::CREATED, Json(invoice_view(&store, &invoice))))
}

async fn update_invoice(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<InvoiceInput>,
) -> ApiResult<Json<Invoice>> {
    let mut store = db.write().await;
    let invoice = store.invoices.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Invoice"))?;
    invoice.amount = input.amount;
    invoice.issued_date = input.issued_date;
    invoice.due_date = input.due_date;
    invoice.notes = input.notes;
    invoice.updated_at = Utc::now();
    let invoice = invoice.clone();
    Ok(Json(invoice_view(&store, &invoice)))
}

async fn update_status(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Invoice>> {
    if !INVOICE_STATUSES.contains(&body.status.as_str()) {
        return Err(ApiFailure::bad_request(format!(
            "Unknown invoice status '{}'",
            body.status
        )));
    }
    let mut store = db.write().await;
    let invoice = store.invoices.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Invoice"))?;
    if body.status == "Paid" && invoice.paid_date.is_none() {
        invoice.paid_date = Some(Utc::now().date_naive());
    }
    invoice.status = body.status;
    invoice.updated_at = Utc::now();
    let invoice = invoice.clone();
    Ok(Json(invoice_view(&store, &invoice)))
}

async fn delete_invoice(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if store.invoices.remove(&id).is_none() {
        return Err(ApiFailure::not_found("Invoice"));
    }
    store.payments.retain(|_, p| p.invoice_id != id);
    store.line_items.retain(|_, li| li.invoice_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_payments(State(db): State<Db>, Path(invoice_id): Path<i32>) -> ApiResult<Json<Vec<Payment>>> {
    let store = db.read().await;
    if !store.invoices.contains_key(&invoice_id) {
        return Err(ApiFailure::not_found("Invoice"));
    }
    Ok(Json(
        store
            .payments
            .values()
            .filter(|p| p.invoice_id == invoice_id)
            .cloned()
            .collect(),
    ))
}

/// Payments move the invoice to "Partially Paid" or, once covered, "Paid".
async fn record_payment(
    State(db): State<Db>,
    Path(invoice_id): Path<i32>,
    Json(input): Json<PaymentInput>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    if input.amount <= 0.0 {
        return Err(ApiFailure::bad_request("Payment amount must be positive"));
    }
    let mut store = db.write().await;
    let status = store
        .invoices
        .get(&invoice_id)
        .map(|i| i.status.clone())
        .ok_or_else(|| ApiFailure::not_found("Invoice"))?;
    if status == "Paid" || status == "Cancelled" {
        return Err(ApiFailure::bad_request(format!(
            "Invoice is {status} and cannot take payments"
        )));
    }

    let id = store.next_id();
    let payment = Payment {
        id,
        invoice_id,
        amount: input.amount,
        paid_date: input.paid_date,
        notes: input.notes,
        created_at: Utc::now(),
    };
    store.payments.insert(id, payment.clone());

    if let Some(invoice) = store.invoices.get_mut(&invoice_id) {
        invoice.total_paid += payment.amount;
        if invoice.total_paid + 0.005 >= invoice.amount {
            invoice.status = "Paid".to_string();
            invoice.paid_date = Some(payment.paid_date);
        } else {
            invoice.status = "Partially Paid".to_string();
        }
        invoice.updated_at = Utc::now();
    }
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn list_line_items(
    State(db): State<Db>,
    Path(invoice_id): Path<i32>,
) -> ApiResult<Json<Vec<LineItem>>> {
    let store = db.read().await;
    if !store.invoices.contains_key(&invoice_id) {
        return Err(ApiFailure::not_found("Invoice"));
    }
    Ok(Json(
        store
            .line_items
            .values()
            .filter(|li| li.invoice_id == invoice_id)
            .cloned()
            .collect(),
    ))
}

async fn add_line_item(
    State(db): State<Db>,
    Json(input): Json<LineItemInput>,
) -> ApiResult<(StatusCode, Json<LineItem>)> {
    require("Description", &input.description)?;
    let invoice_id = input
        .invoice_id
        .ok_or_else(|| ApiFailure::bad_request("Invoice is required"))?;
    let mut store = db.write().await;
    if !store.invoices.contains_key(&invoice_id) {
        return Err(ApiFailure::not_found("Invoice"));
    }
    let id = store.next_id();
    let item = LineItem {
        id,
        invoice_id,
        description: input.description,
        quantity: input.quantity,
        unit_price: input.unit_price,
        line_total: input.quantity * input.unit_price,
        created_at: Utc::now(),
    };
    store.line_items.insert(id, item.clone());
    recompute_amount(&mut store, invoice_id);
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_line_item(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<LineItemInput>,
) -> ApiResult<StatusCode> {
    require("Description", &input.description)?;
    let mut store = db.write().await;
    let item = store
        .line_items
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Line item"))?;
    item.description = input.description;
    item.quantity = input.quantity;
    item.unit_price = input.unit_price;
    item.line_total = input.quantity * input.unit_price;
    let invoice_id = item.invoice_id;
    recompute_amount(&mut store, invoice_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_line_item(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let item = store
        .line_items
        .remove(&id)
        .ok_or_else(|| ApiFailure::not_found("Line item"))?;
    recompute_amount(&mut store, item.invoice_id);
    Ok(StatusCode::NO_CONTENT)
}
