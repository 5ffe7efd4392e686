use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{PromoteLead, ResearchLead, ResearchLeadInput, ResearchTheme, ThemeInput};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn list_leads(&self) -> Result<Vec<ResearchLead>> {
        self.get_list("/research").await
    }

    pub async fn get_lead(&self, id: i32) -> Result<ResearchLead> {
        self.get(&format!("/research/{id}")).await
    }

    pub async fn create_lead(&self, input: &ResearchLeadInput) -> Result<ResearchLead> {
        input.validate()?;
        self.post("/research", input).await
    }

    pub async fn update_lead(&self, id: i32, input: &ResearchLeadInput) -> Result<ResearchLead> {
        input.validate()?;
        self.put(&format!("/research/{id}"), input).await
    }

    pub async fn delete_lead(&self, id: i32) -> Result<()> {
        self.delete(&format!("/research/{id}")).await
    }

    /// Create a client from the lead; the returned lead is linked to it.
    pub async fn promote_lead(&self, id: i32, input: &PromoteLead) -> Result<ResearchLead> {
        input.validate()?;
        self.post(&format!("/research/{id}/promote"), input).await
    }

    pub async fn research_themes(&self) -> Result<Vec<ResearchTheme>> {
        self.get_list("/research/themes").await
    }

    pub async fn create_theme(&self, input: &ThemeInput) -> Result<ResearchTheme> {
        input.validate()?;
        self.post("/research/themes", input).await
    }

    pub async fn update_theme(&self, id: i32, input: &ThemeInput) -> Result<ResearchTheme> {
        input.validate()?;
        self.put(&format!("/research/themes/{id}"), input).await
    }

    pub async fn delete_theme(&self, id: i32) -> Result<()> {
        self.delete(&format!("/research/themes/{id}")).await
    }
}
