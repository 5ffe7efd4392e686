use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;

/// Pipeline stage of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Lead,
    Proposal,
    Active,
    Completed,
    Invoiced,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Lead,
        JobStatus::Proposal,
        JobStatus::Active,
        JobStatus::Completed,
        JobStatus::Invoiced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Lead => "Lead",
            JobStatus::Proposal => "Proposal",
            JobStatus::Active => "Active",
            JobStatus::Completed => "Completed",
            JobStatus::Invoiced => "Invoiced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub client_id: i32,
    pub primary_contact_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub status: JobStatus,
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
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    pub client_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_id: Option<i32>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retainer_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateJob {
    pub fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}

/// Payload for `PUT /jobs/{id}`. Status changes go through
/// `JobStatusUpdate` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJob {
    pub client_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_id: Option<i32>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retainer_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateJob {
    pub fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct JobStatusUpdate {
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_plain_name() {
        let json = serde_json::to_string(&JobStatusUpdate {
            status: JobStatus::Proposal,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"Proposal"}"#);
    }

    #[test]
    fn new_jobs_start_as_leads() {
        let input = CreateJob {
            client_id: 3,
            title: "Website rebuild".to_string(),
            ..CreateJob::default()
        };
        assert_eq!(input.status, JobStatus::Lead);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["clientId"], 3);
        assert!(json.get("hourlyRate").is_none());
    }

    #[test]
    fn every_status_round_trips_through_as_str() {
        for status in JobStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }
}
