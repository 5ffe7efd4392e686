use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;

/// Employee id and passcode, sent with every kiosk call.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PunchCredentials {
    pub employee_id: String,
    pub passcode: String,
}

impl PunchCredentials {
    pub fn new(employee_id: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            passcode: passcode.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.employee_id.trim().is_empty() || self.passcode.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        require("employee id", &self.employee_id)?;
        require("passcode", &self.passcode)
    }
}

impl fmt::Debug for PunchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PunchCredentials")
            .field("employee_id", &self.employee_id)
            .field("passcode", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockIn {
    #[serde(flatten)]
    pub credentials: PunchCredentials,
    pub job_code_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockOut {
    #[serde(flatten)]
    pub credentials: PunchCredentials,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Close the open punch and open a new one under another job code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchJobCode {
    #[serde(flatten)]
    pub credentials: PunchCredentials,
    pub job_code_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Answer to `POST /timeclock/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PunchStatus {
    pub worker_id: i32,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_clocked_in: bool,
    pub punch_id: Option<i32>,
    pub job_code_id: Option<i32>,
    pub job_id: Option<i32>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub clock_in: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub job_code_code: Option<i32>,
    pub job_code_name: Option<String>,
    pub job_title: Option<String>,
}

impl PunchStatus {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn job_code_display(&self) -> Option<String> {
        self.job_code_code.map(|code| {
            format!("{code} — {}", self.job_code_name.as_deref().unwrap_or_default())
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimePunch {
    pub id: i32,
    pub worker_id: i32,
    pub job_code_id: i32,
    pub job_id: Option<i32>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub clock_in: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub clock_out: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub worker_first_name: String,
    #[serde(default)]
    pub worker_last_name: String,
    #[serde(default)]
    pub job_code_code: i32,
    #[serde(default)]
    pub job_code_name: String,
    pub job_title: Option<String>,
    pub total_minutes: Option<i64>,
}

impl TimePunch {
    pub fn worker_name(&self) -> String {
        format!("{} {}", self.worker_first_name, self.worker_last_name)
    }

    pub fn job_code_display(&self) -> String {
        format!("{} — {}", self.job_code_code, self.job_code_name)
    }

    pub fn total_hours_display(&self) -> String {
        match self.total_minutes {
            Some(minutes) => format_hours_minutes(minutes),
            None => "—".to_string(),
        }
    }
}

/// `"{h}h {m}m"` when at least an hour, otherwise `"{m}m"`.
pub fn format_hours_minutes(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobCode {
    pub id: i32,
    pub code: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl JobCode {
    pub fn display_name(&self) -> String {
        format!("{} — {}", self.code, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobCodeSummary {
    pub job_code_id: i32,
    pub job_code_code: i32,
    pub job_code_name: String,
    pub punch_count: i32,
    pub total_hours: f64,
}

/// Roll closed punches up per job code, ordered by code. Open punches count
/// toward `punch_count` but add no hours.
pub fn summarize_by_job_code(punches: &[TimePunch]) -> Vec<JobCodeSummary> {
    let mut summaries: Vec<JobCodeSummary> = Vec::new();
    for punch in punches {
        let minutes = punch.total_minutes.unwrap_or(0);
        match summaries.iter_mut().find(|s| s.job_code_id == punch.job_code_id) {
            Some(summary) => {
                summary.punch_count += 1;
                summary.total_hours += minutes as f64 / 60.0;
            }
            None => summaries.push(JobCodeSummary {
                job_code_id: punch.job_code_id,
                job_code_code: punch.job_code_code,
                job_code_name: punch.job_code_name.clone(),
                punch_count: 1,
                total_hours: minutes as f64 / 60.0,
            }),
        }
    }
    summaries.sort_by_key(|s| s.job_code_code);
    summaries
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: i32,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Worker {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Query filters for `GET /timeclock/history`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub worker_id: Option<i32>,
    pub job_code_id: Option<i32>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.worker_id {
            pairs.push(("worker_id", id.to_string()));
        }
        if let Some(id) = self.job_code_id {
            pairs.push(("job_code_id", id.to_string()));
        }
        if let Some(d) = self.from_date {
            pairs.push(("from_date", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.to_date {
            pairs.push(("to_date", d.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_in_flattens_credentials() {
        let req = ClockIn {
            credentials: PunchCredentials::new("1001", "4321"),
            job_code_id: 2,
            job_id: None,
            notes: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"employeeId": "1001", "passcode": "4321", "jobCodeId": 2})
        );
    }

    #[test]
    fn debug_hides_passcode() {
        let creds = PunchCredentials::new("1001", "4321");
        let shown = format!("{creds:?}");
        assert!(shown.contains("1001"));
        assert!(!shown.contains("4321"));
    }

    #[test]
    fn hours_display() {
        assert_eq!(format_hours_minutes(45), "45m");
        assert_eq!(format_hours_minutes(60), "1h 0m");
        assert_eq!(format_hours_minutes(135), "2h 15m");
    }

    #[test]
    fn open_punch_has_no_total() {
        let punch: TimePunch = serde_json::from_value(serde_json::json!({
            "id": 1, "workerId": 1, "jobCodeId": 1,
            "clockIn": "2024-06-01T13:00:00Z", "createdAt": "2024-06-01T13:00:00Z",
            "workerFirstName": "Pat", "workerLastName": "Kim",
            "jobCodeCode": 100, "jobCodeName": "Install"
        }))
        .unwrap();
        assert_eq!(punch.total_hours_display(), "—");
        assert_eq!(punch.job_code_display(), "100 — Install");
        assert_eq!(punch.worker_name(), "Pat Kim");
    }

    #[test]
    fn status_job_code_display_only_when_clocked_in() {
        let mut status: PunchStatus = serde_json::from_value(serde_json::json!({
            "workerId": 1, "employeeId": "1001", "firstName": "Pat", "lastName": "Kim",
            "isClockedIn": false
        }))
        .unwrap();
        assert!(status.job_code_display().is_none());
        status.job_code_code = Some(200);
        status.job_code_name = Some("Travel".to_string());
        assert_eq!(status.job_code_display().as_deref(), Some("200 — Travel"));
    }

    #[test]
    fn summary_groups_by_job_code() {
        let punch = |id: i32, code_id: i32, code: i32, minutes: Option<i64>| TimePunch {
            id,
            worker_id: 1,
            job_code_id: code_id,
            job_id: None,
            clock_in: "2024-06-01T13:00:00Z".parse().unwrap(),
            clock_out: None,
            notes: None,
            created_at: "2024-06-01T13:00:00Z".parse().unwrap(),
            worker_first_name: "Pat".to_string(),
            worker_last_name: "Kim".to_string(),
            job_code_code: code,
            job_code_name: format!("code {code}"),
            job_title: None,
            total_minutes: minutes,
        };
        let punches = vec![
            punch(1, 7, 200, Some(30)),
            punch(2, 3, 100, Some(90)),
            punch(3, 7, 200, Some(60)),
            punch(4, 3, 100, None),
        ];
        let summary = summarize_by_job_code(&punches);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].job_code_code, 100);
        assert_eq!(summary[0].punch_count, 2);
        assert_eq!(summary[0].total_hours, 1.5);
        assert_eq!(summary[1].job_code_id, 7);
        assert_eq!(summary[1].total_hours, 1.5);
    }
}
