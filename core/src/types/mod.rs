//! Domain DTOs for the job tracker API.
//!
//! # Design
//! These types mirror the backend schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift. All of them
//! use camelCase on the wire. Request types skip `None` fields and expose a
//! `validate` method for the required-field checks done before dispatch.

mod clients;
mod dashboard;
mod expenses;
mod invoices;
mod jobs;
mod notes;
mod research;
mod timeclock;
mod timestamp;

pub use clients::{Client, Contact, CreateClient, CreateContact, UpdateClient, UpdateContact};
pub use dashboard::{DashboardSnapshot, JobIncome, JobPipelineEntry, RecentActivity, RevenueSummary};
pub use expenses::{
    CreateExpenseCategory, Expense, ExpenseCategory, ExpenseFilter, ExpenseInput, ExpenseSummary,
    UpdateExpenseCategory,
};
pub use invoices::{
    line_items_total, CreateInvoice, CreateLineItem, CreatePayment, Invoice, InvoiceStatus,
    InvoiceStatusUpdate, LineItem, Payment, UpdateInvoice, UpdateLineItem,
};
pub use jobs::{CreateJob, Job, JobStatus, JobStatusUpdate, UpdateJob};
pub use notes::{Note, NoteInput};
pub use research::{
    LeadStatus, PromoteLead, ResearchLead, ResearchLeadInput, ResearchTheme, ThemeInput, WouldPay,
};
pub use timeclock::{
    format_hours_minutes, summarize_by_job_code, ClockIn, ClockOut, HistoryFilter, JobCode,
    JobCodeSummary, PunchCredentials, PunchStatus, SwitchJobCode, TimePunch, Worker,
};

use crate::error::{ApiError, Result};

/// Fail with `ApiError::Validation` when a required text field is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}
