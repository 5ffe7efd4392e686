use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Expense, ExpenseCategory, Store};
use crate::{require, ApiFailure, ApiResult, Db};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseInput {
    job_id: Option<i32>,
    category_id: i32,
    vendor: String,
    description: Option<String>,
    amount: f64,
    expense_date: NaiveDate,
    #[serde(default)]
    is_reimbursable: bool,
    receipt_file_path: Option<String>,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryInput {
    name: String,
    description: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseQuery {
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    category_id: Option<i32>,
    job_id: Option<i32>,
    is_reimbursable: Option<bool>,
}

impl ExpenseQuery {
    fn matches(&self, e: &Expense) -> bool {
        self.date_from.map_or(true, |d| e.expense_date >= d)
            && self.date_to.map_or(true, |d| e.expense_date <= d)
            && self.category_id.map_or(true, |id| e.category_id == id)
            && self.job_id.map_or(true, |id| e.job_id == Some(id))
            && self.is_reimbursable.map_or(true, |r| e.is_reimbursable == r)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseSummary {
    this_month_total: f64,
    this_month_reimbursable: f64,
    this_month_net: f64,
    year_to_date_total: f64,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/summary", get(summary))
        .route("/expenses/by-job/{id}", get(expenses_by_job))
        .route("/expenses/categories", get(list_categories).post(create_category))
        .route(
            "/expenses/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

fn expense_view(store: &Store, expense: &Expense) -> Expense {
    let mut view = expense.clone();
    view.category_name = store
        .categories
        .get(&expense.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    if let Some(job) = expense.job_id.and_then(|id| store.jobs.get(&id)) {
        view.job_title = Some(job.title.clone());
        view.client_name = store.clients.get(&job.client_id).map(|c| c.name.clone());
    }
    view
}

fn check_references(store: &Store, input: &ExpenseInput) -> ApiResult<()> {
    require("Vendor", &input.vendor)?;
    if !store.categories.contains_key(&input.category_id) {
        return Err(ApiFailure::bad_request("Unknown expense category"));
    }
    if let Some(job_id) = input.job_id {
        if !store.jobs.contains_key(&job_id) {
            return Err(ApiFailure::not_found("Job"));
        }
    }
    Ok(())
}

async fn list_expenses(State(db): State<Db>, Query(q): Query<ExpenseQuery>) -> Json<Vec<Expense>> {
    let store = db.read().await;
    let mut expenses: Vec<Expense> = store
        .expenses
        .values()
        .filter(|e| q.matches(e))
        .map(|e| expense_view(&store, e))
        .collect();
    expenses.sort_by(|a, b| b.expense_date.cmp(&a.expense_date));
    Json(expenses)
}

async fn expenses_by_job(State(db): State<Db>, Path(job_id): Path<i32>) -> Json<Vec<Expense>> {
    let store = db.read().await;
    Json(
        store
            .expenses
            .values()
            .filter(|e| e.job_id == Some(job_id))
            .map(|e| expense_view(&store, e))
            .collect(),
    )
}

async fn get_expense(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<Json<Expense>> {
    let store = db.read().await;
    let expense = store.expenses.get(&id).ok_or_else(|| ApiFailure::not_found("Expense"))?;
    Ok(Json(expense_view(&store, expense)))
}

async fn create_expense(
    State(db): State<Db>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let mut store = db.write().await;
    check_references(&store, &input)?;
    let now = Utc::now();
    let id = store.next_id();
    let expense = Expense {
        id,
        job_id: input.job_id,
        category_id: input.category_id,
        vendor: input.vendor,
        description: input.description,
        amount: input.amount,
        expense_date: input.expense_date,
        is_reimbursable: input.is_reimbursable,
        receipt_file_path: input.receipt_file_path,
        notes: input.notes,
        created_at: now,
        updated_at: now,
        category_name: String::new(),
        job_title: None,
        client_name: None,
    };
    store.expenses.insert(id, expense.clone());
    Ok((StatusCode::CREATED, Json(expense_view(&store, &expense))))
}

async fn update_expense(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<Json<Expense>> {
    let mut store = db.write().await;
    check_references(&store, &input)?;
    let expense = store.expenses.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Expense"))?;
    expense.job_id = input.job_id;
    expense.category_id = input.category_id;
    expense.vendor = input.vendor;
    expense.description = input.description;
    expense.amount = input.amount;
    expense.expense_date = input.expense_date;
    expense.is_reimbursable = input.is_reimbursable;
    expense.receipt_file_path = input.receipt_file_path;
    expense.notes = input.notes;
    expense.updated_at = Utc::now();
    let expense = expense.clone();
    Ok(Json(expense_view(&store, &expense)))
}

async fn delete_expense(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .expenses
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("Expense"))
}

async fn summary(State(db): State<Db>) -> Json<ExpenseSummary> {
    let store = db.read().await;
    let today = Utc::now().date_naive();
    let mut summary = ExpenseSummary {
        this_month_total: 0.0,
        this_month_reimbursable: 0.0,
        this_month_net: 0.0,
        year_to_date_total: 0.0,
    };
    for e in store.expenses.values() {
        if e.expense_date.year() != today.year() || e.expense_date > today {
            continue;
        }
        summary.year_to_date_total += e.amount;
        if e.expense_date.month() == today.month() {
            summary.this_month_total += e.amount;
            if e.is_reimbursable {
                summary.this_month_reimbursable += e.amount;
            }
        }
    }
    summary.this_month_net = summary.this_month_total - summary.this_month_reimbursable;
    Json(summary)
}

async fn list_categories(State(db): State<Db>) -> Json<Vec<ExpenseCategory>> {
    let store = db.read().await;
    Json(store.categories.values().cloned().collect())
}

async fn create_category(
    State(db): State<Db>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<ExpenseCategory>)> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    if store.categories.values().any(|c| c.name.eq_ignore_ascii_case(&input.name)) {
        return Err(ApiFailure::bad_request(format!(
            "Category '{}' already exists",
            input.name
        )));
    }
    let id = store.next_id();
    let category = ExpenseCategory {
        id,
        name: input.name,
        description: input.description,
        is_active: input.is_active.unwrap_or(true),
        created_at: Utc::now(),
    };
    store.categories.insert(id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<Json<ExpenseCategory>> {
    require("Name", &input.name)?;
    let mut store = db.write().await;
    let category = store
        .categories
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Category"))?;
    category.name = input.name;
    category.description = input.description;
    if let Some(active) = input.is_active {
        category.is_active = active;
    }
    Ok(Json(category.clone()))
}

async fn delete_category(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.categories.contains_key(&id) {
        return Err(ApiFailure::not_found("Category"));
    }
    if store.expenses.values().any(|e| e.category_id == id) {
        return Err(ApiFailure::bad_request("Category is in use by expenses"));
    }
    store.categories.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
