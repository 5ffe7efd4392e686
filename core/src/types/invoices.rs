use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::PartiallyPaid => "Partially Paid",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether a payment can still be recorded against an invoice in this state.
    pub fn accepts_payments(&self) -> bool {
        !matches!(
            self,
            InvoiceStatus::Paid | InvoiceStatus::Cancelled | InvoiceStatus::Draft
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub job_id: i32,
    pub invoice_number: String,
    #[serde(default)]
    pub iteration: i32,
    pub status: InvoiceStatus,
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
    #[serde(default)]
    pub total_paid: f64,
    pub network_file_path: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn display_number(&self) -> String {
        format!("{}-{}", self.invoice_number, self.iteration)
    }

    pub fn balance_remaining(&self) -> f64 {
        self.amount - self.total_paid
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub job_id: i32,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateInvoice {
    pub fn validate(&self) -> Result<()> {
        if self.job_id <= 0 {
            return Err(ApiError::Validation("job is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoice {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InvoiceStatusUpdate {
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub invoice_id: i32,
    pub amount: f64,
    pub paid_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub amount: f64,
    pub paid_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreatePayment {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0.0 {
            return Err(ApiError::Validation("amount must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: i32,
    pub invoice_id: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineItem {
    pub invoice_id: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl CreateLineItem {
    pub fn new(invoice_id: i32, description: impl Into<String>, unit_price: f64) -> Self {
        Self {
            invoice_id,
            description: description.into(),
            quantity: 1.0,
            unit_price,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("description", &self.description)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl UpdateLineItem {
    pub fn validate(&self) -> Result<()> {
        require("description", &self.description)
    }
}

/// Grand total of an invoice's line items.
pub fn line_items_total(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.line_total).sum()
}
