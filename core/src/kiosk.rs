//! Time-clock kiosk flow.
//!
//! # Design
//! The kiosk is a linear request/response flow: enter employee id and
//! passcode, look up the worker's punch status, then clock in, clock out or
//! switch job code. The server owns every clock invariant (no double
//! clock-in, no clock-out without an open punch); this type only tracks
//! which step the screen is on and refuses calls that make no sense from the
//! current step. The state lives in an `Observable` so a view can subscribe.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::client::ResourceClient;
use crate::codec;
use crate::credentials::CredentialProvider;
use crate::error::{ApiError, Result};
use crate::observable::Observable;
use crate::types::{ClockIn, ClockOut, PunchCredentials, PunchStatus, SwitchJobCode, TimePunch};

/// The panel the kiosk is showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum KioskState {
    #[default]
    PasscodeEntry,
    NotClockedIn {
        worker_name: String,
    },
    ClockedIn {
        worker_name: String,
        job_code_display: String,
        job_title: Option<String>,
        clock_in: Option<DateTime<Utc>>,
    },
    Success {
        message: String,
    },
}

impl KioskState {
    pub fn name(&self) -> &'static str {
        match self {
            KioskState::PasscodeEntry => "PasscodeEntry",
            KioskState::NotClockedIn { .. } => "NotClockedIn",
            KioskState::ClockedIn { .. } => "ClockedIn",
            KioskState::Success { .. } => "Success",
        }
    }

    fn from_status(status: &PunchStatus) -> Self {
        if status.is_clocked_in {
            KioskState::ClockedIn {
                worker_name: status.full_name(),
                job_code_display: status.job_code_display().unwrap_or_default(),
                job_title: status.job_title.clone(),
                clock_in: status.clock_in,
            }
        } else {
            KioskState::NotClockedIn {
                worker_name: status.full_name(),
            }
        }
    }
}

pub struct Kiosk<P> {
    client: ResourceClient<P>,
    state: Observable<KioskState>,
    credentials: Option<PunchCredentials>,
    last_error: Option<String>,
}

impl<P: CredentialProvider> Kiosk<P> {
    pub fn new(client: ResourceClient<P>) -> Self {
        Self {
            client,
            state: Observable::new(KioskState::PasscodeEntry),
            credentials: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> KioskState {
        self.state.get()
    }

    /// Subscribe here to follow panel changes.
    pub fn observable(&self) -> &Observable<KioskState> {
        &self.state
    }

    /// User-facing message for the most recent failed call.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Look up the worker. Blank input is ignored. Allowed from passcode
    /// entry and from the success panel, which starts the next worker's turn.
    pub async fn check_passcode(&mut self, employee_id: &str, passcode: &str) -> Result<()> {
        let credentials = PunchCredentials::new(employee_id.trim(), passcode.trim());
        if credentials.is_blank() {
            return Ok(());
        }
        self.expect_state("check a passcode", |s| {
            matches!(s, KioskState::PasscodeEntry | KioskState::Success { .. })
        })?;
        self.last_error = None;

        let status = self
            .client
            .punch_status(&credentials)
            .await
            .map_err(|e| self.record_failure(e, "Invalid passcode."))?;

        let next = KioskState::from_status(&status);
        info!(employee_id = %credentials.employee_id, state = next.name(), "kiosk worker identified");
        self.credentials = Some(credentials);
        self.state.set(next);
        Ok(())
    }

    pub async fn clock_in(
        &mut self,
        job_code_id: i32,
        job_id: Option<i32>,
        notes: Option<String>,
    ) -> Result<TimePunch> {
        self.expect_state("clock in", |s| matches!(s, KioskState::NotClockedIn { .. }))?;
        let request = ClockIn {
            credentials: self.retained_credentials()?,
            job_code_id,
            job_id,
            notes,
        };
        self.last_error = None;

        let punch = self
            .client
            .clock_in(&request)
            .await
            .map_err(|e| self.record_failure(e, "Failed to clock in."))?;

        info!(punch_id = punch.id, "kiosk clock-in recorded");
        self.state.set(KioskState::Success {
            message: "Clocked in successfully!".to_string(),
        });
        Ok(punch)
    }

    pub async fn clock_out(&mut self, notes: Option<String>) -> Result<TimePunch> {
        self.expect_state("clock out", |s| matches!(s, KioskState::ClockedIn { .. }))?;
        let request = ClockOut {
            credentials: self.retained_credentials()?,
            notes,
        };
        self.last_error = None;

        let punch = self
            .client
            .clock_out(&request)
            .await
            .map_err(|e| self.record_failure(e, "Failed to clock out."))?;

        info!(punch_id = punch.id, "kiosk clock-out recorded");
        self.state.set(KioskState::Success {
            message: "Clocked out successfully!".to_string(),
        });
        Ok(punch)
    }

    /// Move the open punch to another job code. The kiosk stays clocked in,
    /// showing the new punch.
    pub async fn switch_job_code(
        &mut self,
        job_code_id: i32,
        job_id: Option<i32>,
        notes: Option<String>,
    ) -> Result<TimePunch> {
        self.expect_state("switch job code", |s| matches!(s, KioskState::ClockedIn { .. }))?;
        let request = SwitchJobCode {
            credentials: self.retained_credentials()?,
            job_code_id,
            job_id,
            notes,
        };
        self.last_error = None;

        let punch = self
            .client
            .switch_job_code(&request)
            .await
            .map_err(|e| self.record_failure(e, "Failed to switch job code."))?;

        info!(punch_id = punch.id, job_code_id, "kiosk job code switched");
        self.state.update(|state| {
            if let KioskState::ClockedIn {
                job_code_display,
                job_title,
                clock_in,
                ..
            } = state
            {
                *job_code_display = punch.job_code_display();
                *job_title = punch.job_title.clone();
                *clock_in = Some(punch.clock_in);
            }
        });
        Ok(punch)
    }

    /// Back to passcode entry, forgetting the worker's credentials.
    pub fn reset(&mut self) {
        self.credentials = None;
        self.last_error = None;
        self.state.set(KioskState::PasscodeEntry);
    }

    /// Time on the clock as of `now`, when clocked in.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<String> {
        self.state.with(|state| match state {
            KioskState::ClockedIn {
                clock_in: Some(start),
                ..
            } => Some(format_elapsed((now - *start).to_std().unwrap_or_default())),
            _ => None,
        })
    }

    fn expect_state(&self, action: &str, allowed: impl Fn(&KioskState) -> bool) -> Result<()> {
        self.state.with(|state| {
            if allowed(state) {
                Ok(())
            } else {
                Err(ApiError::Validation(format!(
                    "cannot {action} from {}",
                    state.name()
                )))
            }
        })
    }

    fn retained_credentials(&self) -> Result<PunchCredentials> {
        self.credentials
            .clone()
            .ok_or_else(|| ApiError::Validation("no worker identified".to_string()))
    }

    fn record_failure(&mut self, error: ApiError, fallback: &str) -> ApiError {
        self.last_error = Some(failure_message(&error, fallback));
        error
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Message shown to the worker for a failed kiosk call. Client errors use
/// the server's `detail` when present, else `fallback`.
pub fn failure_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Request { status, body } if (400..500).contains(status) => {
            codec::decode::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| fallback.to_string())
        }
        other => format!("Error: {other}"),
    }
}

/// `"{h}h {mm}m {ss}s"` from one hour up, otherwise `"{m}m {ss}s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours >= 1 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::credentials::StaticToken;

    fn kiosk() -> Kiosk<StaticToken> {
        // Port 9 (discard) is never contacted: every call below is rejected
        // before dispatch.
        let client = ResourceClient::new(&ClientConfig::new("http://127.0.0.1:9"), StaticToken::new("t")).unwrap();
        Kiosk::new(client)
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_elapsed(Duration::from_secs(3600 + 2 * 60 + 3)), "1h 02m 03s");
        assert_eq!(format_elapsed(Duration::ZERO), "0m 00s");
    }

    #[test]
    fn failure_message_prefers_server_detail() {
        let err = ApiError::Request {
            status: 400,
            body: r#"{"detail":"Worker is already clocked in"}"#.to_string(),
        };
        assert_eq!(failure_message(&err, "Failed"), "Worker is already clocked in");

        let err = ApiError::Request {
            status: 400,
            body: r#"{"Detail":"Already clocked in under that job code"}"#.to_string(),
        };
        assert_eq!(
            failure_message(&err, "Failed"),
            "Already clocked in under that job code"
        );

        let err = ApiError::Request {
            status: 404,
            body: "nope".to_string(),
        };
        assert_eq!(failure_message(&err, "Invalid passcode."), "Invalid passcode.");

        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(failure_message(&err, "x"), "Error: network error: connection refused");
    }

    #[tokio::test]
    async fn blank_passcode_is_a_no_op() {
        let mut k = kiosk();
        k.check_passcode("1001", "   ").await.unwrap();
        assert_eq!(k.state(), KioskState::PasscodeEntry);
    }

    #[tokio::test]
    async fn clock_in_from_passcode_entry_is_rejected() {
        let mut k = kiosk();
        let err = k.clock_in(1, None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "validation failed: cannot clock in from PasscodeEntry");
    }

    #[tokio::test]
    async fn clock_out_requires_clocked_in() {
        let mut k = kiosk();
        assert!(matches!(k.clock_out(None).await, Err(ApiError::Validation(_))));
        assert!(matches!(
            k.switch_job_code(2, None, None).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn passcode_check_refused_mid_session() {
        let mut k = kiosk();
        k.state.set(KioskState::NotClockedIn {
            worker_name: "Pat Kim".to_string(),
        });
        let err = k.check_passcode("1001", "4321").await.unwrap_err();
        assert_eq!(err.to_string(), "validation failed: cannot check a passcode from NotClockedIn");
    }

    #[test]
    fn elapsed_only_when_clocked_in() {
        let mut k = kiosk();
        assert!(k.elapsed(Utc::now()).is_none());
        let start = Utc::now();
        k.state.set(KioskState::ClockedIn {
            worker_name: "Pat Kim".to_string(),
            job_code_display: "100 — Install".to_string(),
            job_title: None,
            clock_in: Some(start),
        });
        let later = start + chrono::Duration::seconds(125);
        assert_eq!(k.elapsed(later).as_deref(), Some("2m 05s"));
        k.reset();
        assert_eq!(k.state(), KioskState::PasscodeEntry);
    }
}
