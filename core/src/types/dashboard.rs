use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub outstanding: f64,
    pub overdue: f64,
    pub draft: f64,
    pub paid_invoice_count: i32,
    pub pending_invoice_count: i32,
}

/// Job count and value for one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPipelineEntry {
    pub status: String,
    pub count: i32,
    #[serde(default)]
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobIncome {
    pub job_id: i32,
    pub job_title: String,
    pub paid_amount: f64,
    pub invoiced_amount: f64,
}

impl JobIncome {
    pub fn total(&self) -> f64 {
        self.paid_amount + self.invoiced_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub entity_type: String,
    pub entity_id: i32,
    pub summary: String,
    pub status: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub activity_date: DateTime<Utc>,
}

/// Everything the dashboard screen shows, fetched in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub revenue: RevenueSummary,
    pub pipeline: Vec<JobPipelineEntry>,
    pub income_by_job: Vec<JobIncome>,
}
