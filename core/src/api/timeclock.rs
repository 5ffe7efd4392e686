use super::with_query;
use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{
    ClockIn, ClockOut, HistoryFilter, JobCode, PunchCredentials, PunchStatus, SwitchJobCode,
    TimePunch, Worker,
};

impl<P: CredentialProvider> ResourceClient<P> {
    /// Check a worker's passcode and current punch.
    pub async fn punch_status(&self, credentials: &PunchCredentials) -> Result<PunchStatus> {
        credentials.validate()?;
        self.post("/timeclock/status", credentials).await
    }

    pub async fn clock_in(&self, input: &ClockIn) -> Result<TimePunch> {
        input.credentials.validate()?;
        self.post("/timeclock/clock-in", input).await
    }

    pub async fn clock_out(&self, input: &ClockOut) -> Result<TimePunch> {
        input.credentials.validate()?;
        self.post("/timeclock/clock-out", input).await
    }

    /// Returns the newly opened punch.
    pub async fn switch_job_code(&self, input: &SwitchJobCode) -> Result<TimePunch> {
        input.credentials.validate()?;
        self.post("/timeclock/switch", input).await
    }

    pub async fn punch_history(&self, filter: &HistoryFilter) -> Result<Vec<TimePunch>> {
        self.get_list(&with_query("/timeclock/history", &filter.query_pairs())?)
            .await
    }

    pub async fn job_codes(&self, active_only: bool) -> Result<Vec<JobCode>> {
        if active_only {
            self.get_list("/timeclock/job-codes?active_only=true").await
        } else {
            self.get_list("/timeclock/job-codes").await
        }
    }

    pub async fn workers(&self, active_only: bool) -> Result<Vec<Worker>> {
        if active_only {
            self.get_list("/timeclock/workers?active_only=true").await
        } else {
            self.get_list("/timeclock/workers").await
        }
    }
}
