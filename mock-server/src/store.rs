//! Records held by the mock backend, in their wire shape.
//!
//! Joined display fields (`clientName`, `jobTitle`, ...) are left `None` in
//! storage and filled in by the route that serves the record.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    pub website: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub job_count: Option<i32>,
    pub contact_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub is_primary: bool,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub client_id: i32,
    pub primary_contact_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub billing_type: Option<String>,
    pub hourly_rate: Option<f64>,
    pub fixed_price: Option<f64>,
    pub retainer_amount: Option<f64>,
    pub estimated_value: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub client_name: Option<String>,
    pub client_type: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_email: Option<String>,
    pub invoice_count: Option<i32>,
    pub total_paid: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub job_id: i32,
    pub invoice_number: String,
    pub iteration: i32,
    pub status: String,
    pub amount: f64,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub job_title: Option<String>,
    pub billing_type: Option<String>,
    pub client_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub total_paid: f64,
    pub network_file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub invoice_id: i32,
    pub amount: f64,
    pub paid_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: i32,
    pub invoice_id: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i32,
    pub job_id: Option<i32>,
    pub category_id: i32,
    pub vendor: String,
    pub description: Option<String>,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub is_reimbursable: bool,
    pub receipt_file_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
    pub job_title: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: Option<String>,
    pub is_global: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

/// `status` is 0..=4 (New..Closed), `would_pay` 0..=2 (No, Maybe, Yes).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchLead {
    pub research_lead_id: i32,
    pub client_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub research_theme_id: Option<i32>,
    pub business_name: String,
    pub date_contacted: NaiveDate,
    pub pain_points: Option<String>,
    pub interest_level: i32,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub would_pay: i32,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub theme_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchTheme {
    pub research_theme_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: i32,
    pub employee_id: String,
    #[serde(skip_serializing, default)]
    pub passcode: String,
    pub first_name: String,
    pub last_name: String,
    pub hourly_rate: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCode {
    pub id: i32,
    pub code: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePunch {
    pub id: i32,
    pub worker_id: i32,
    pub job_code_id: i32,
    pub job_id: Option<i32>,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub worker_first_name: String,
    pub worker_last_name: String,
    pub job_code_code: i32,
    pub job_code_name: String,
    pub job_title: Option<String>,
    pub total_minutes: Option<i64>,
}

/// Every table of the mock backend. Ids come from one shared counter.
#[derive(Debug, Default)]
pub struct Store {
    next_id: i32,
    pub clients: BTreeMap<i32, Client>,
    pub contacts: BTreeMap<i32, Contact>,
    pub jobs: BTreeMap<i32, Job>,
    pub invoices: BTreeMap<i32, Invoice>,
    pub payments: BTreeMap<i32, Payment>,
    pub line_items: BTreeMap<i32, LineItem>,
    pub expenses: BTreeMap<i32, Expense>,
    pub categories: BTreeMap<i32, ExpenseCategory>,
    pub notes: BTreeMap<i32, Note>,
    pub leads: BTreeMap<i32, ResearchLead>,
    pub themes: BTreeMap<i32, ResearchTheme>,
    pub workers: BTreeMap<i32, Worker>,
    pub job_codes: BTreeMap<i32, JobCode>,
    pub punches: BTreeMap<i32, TimePunch>,
}

impl Store {
    /// One kiosk worker (`1001` / `4321`), two job codes and two expense
    /// categories. No clients, jobs or invoices.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        let now = Utc::now();

        let id = store.next_id();
        store.workers.insert(
            id,
            Worker {
                id,
                employee_id: "1001".to_string(),
                passcode: "4321".to_string(),
                first_name: "Pat".to_string(),
                last_name: "Kim".to_string(),
                hourly_rate: Some(32.5),
                is_active: true,
                created_at: now,
            },
        );

        for (code, name) in [(100, "Install"), (200, "Travel")] {
            let id = store.next_id();
            store.job_codes.insert(
                id,
                JobCode {
                    id,
                    code,
                    name: name.to_string(),
                    description: None,
                    is_active: true,
                    created_at: now,
                },
            );
        }

        for name in ["Materials", "Fuel"] {
            let id = store.next_id();
            store.categories.insert(
                id,
                ExpenseCategory {
                    id,
                    name: name.to_string(),
                    description: None,
                    is_active: true,
                    created_at: now,
                },
            );
        }

        store
    }

    pub fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn worker_by_credentials(&self, employee_id: &str, passcode: &str) -> Option<&Worker> {
        self.workers
            .values()
            .find(|w| w.is_active && w.employee_id == employee_id && w.passcode == passcode)
    }

    pub fn open_punch_id(&self, worker_id: i32) -> Option<i32> {
        self.punches
            .values()
            .find(|p| p.worker_id == worker_id && p.clock_out.is_none())
            .map(|p| p.id)
    }
}
