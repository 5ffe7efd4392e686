use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{DashboardSnapshot, JobIncome, JobPipelineEntry, RecentActivity, RevenueSummary};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn revenue_summary(&self) -> Result<RevenueSummary> {
        self.get("/dashboard/revenue-summary").await
    }

    pub async fn job_pipeline(&self) -> Result<Vec<JobPipelineEntry>> {
        self.get_list("/dashboard/job-pipeline").await
    }

    pub async fn income_by_job(&self) -> Result<Vec<JobIncome>> {
        self.get_list("/dashboard/income-by-job").await
    }

    pub async fn recent_activity(&self, limit: u32) -> Result<Vec<RecentActivity>> {
        self.get_list(&format!("/dashboard/recent-activity?limit={limit}"))
            .await
    }

    /// Fetch revenue, pipeline and per-job income concurrently. Completion
    /// order is unspecified; the first failure fails the whole snapshot.
    pub async fn dashboard_snapshot(&self) -> Result<DashboardSnapshot> {
        let (revenue, pipeline, income_by_job) =
            tokio::try_join!(self.revenue_summary(), self.job_pipeline(), self.income_by_job())?;
        Ok(DashboardSnapshot {
            revenue,
            pipeline,
            income_by_job,
        })
    }
}
