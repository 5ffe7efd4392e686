use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i32,
    pub job_id: Option<i32>,
    pub category_id: i32,
    pub vendor: String,
    pub description: Option<String>,
    pub amount: f64,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub is_reimbursable: bool,
    pub receipt_file_path: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub category_name: String,
    pub job_title: Option<String>,
    pub client_name: Option<String>,
}

impl Expense {
    /// `"{job} ({client})"`, or `"— General —"` for expenses not tied to a job.
    pub fn job_display(&self) -> String {
        match &self.job_title {
            Some(title) => format!("{title} ({})", self.client_name.as_deref().unwrap_or_default()),
            None => "— General —".to_string(),
        }
    }
}

/// Payload for both `POST /expenses` and `PUT /expenses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i32>,
    pub category_id: i32,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub is_reimbursable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpenseInput {
    pub fn validate(&self) -> Result<()> {
        require("vendor", &self.vendor)?;
        if self.category_id <= 0 {
            return Err(ApiError::Validation("category is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateExpenseCategory {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

impl UpdateExpenseCategory {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub this_month_total: f64,
    pub this_month_reimbursable: f64,
    pub this_month_net: f64,
    pub year_to_date_total: f64,
}

/// Query filters for `GET /expenses`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub job_id: Option<i32>,
    pub is_reimbursable: Option<bool>,
}

impl ExpenseFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(d) = self.date_from {
            pairs.push(("dateFrom", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.date_to {
            pairs.push(("dateTo", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        if let Some(id) = self.job_id {
            pairs.push(("jobId", id.to_string()));
        }
        if let Some(r) = self.is_reimbursable {
            pairs.push(("isReimbursable", r.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_pairs() {
        assert!(ExpenseFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn filter_pairs_use_backend_names() {
        let filter = ExpenseFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            job_id: Some(4),
            is_reimbursable: Some(false),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("dateFrom", "2024-01-01".to_string()),
                ("jobId", "4".to_string()),
                ("isReimbursable", "false".to_string()),
            ]
        );
    }

    #[test]
    fn general_expense_display() {
        let expense: Expense = serde_json::from_value(serde_json::json!({
            "id": 1, "categoryId": 2, "vendor": "Staples", "amount": 12.5,
            "expenseDate": "2024-02-03", "createdAt": "2024-02-03T10:00:00Z",
            "updatedAt": "2024-02-03T10:00:00Z", "categoryName": "Office"
        }))
        .unwrap();
        assert_eq!(expense.job_display(), "— General —");

        let tied = Expense {
            job_title: Some("Roof".to_string()),
            client_name: Some("Acme".to_string()),
            ..expense
        };
        assert_eq!(tied.job_display(), "Roof (Acme)");
    }
}
