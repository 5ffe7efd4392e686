use super::with_query;
use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{CreateJob, Job, JobStatus, JobStatusUpdate, UpdateJob};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>> {
        let pairs: Vec<(&str, String)> = status
            .map(|s| ("status", s.as_str().to_string()))
            .into_iter()
            .collect();
        self.get_list(&with_query("/jobs", &pairs)?).await
    }

    pub async fn jobs_by_client(&self, client_id: i32) -> Result<Vec<Job>> {
        self.get_list(&format!("/jobs/by-client/{client_id}")).await
    }

    pub async fn get_job(&self, id: i32) -> Result<Job> {
        self.get(&format!("/jobs/{id}")).await
    }

    pub async fn create_job(&self, input: &CreateJob) -> Result<Job> {
        input.validate()?;
        self.post("/jobs", input).await
    }

    pub async fn update_job(&self, id: i32, input: &UpdateJob) -> Result<Job> {
        input.validate()?;
        self.put(&format!("/jobs/{id}"), input).await
    }

    pub async fn update_job_status(&self, id: i32, status: JobStatus) -> Result<Job> {
        self.patch(&format!("/jobs/{id}/status"), &JobStatusUpdate { status })
            .await
    }

    pub async fn delete_job(&self, id: i32) -> Result<()> {
        self.delete(&format!("/jobs/{id}")).await
    }
}
