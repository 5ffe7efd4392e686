use super::with_query;
use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{
    CreateExpenseCategory, Expense, ExpenseCategory, ExpenseFilter, ExpenseInput, ExpenseSummary,
    UpdateExpenseCategory,
};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        self.get_list(&with_query("/expenses", &filter.query_pairs())?)
            .await
    }

    pub async fn expenses_by_job(&self, job_id: i32) -> Result<Vec<Expense>> {
        self.get_list(&format!("/expenses/by-job/{job_id}")).await
    }

    pub async fn get_expense(&self, id: i32) -> Result<Expense> {
        self.get(&format!("/expenses/{id}")).await
    }

    pub async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense> {
        input.validate()?;
        self.post("/expenses", input).await
    }

    pub async fn update_expense(&self, id: i32, input: &ExpenseInput) -> Result<Expense> {
        input.validate()?;
        self.put(&format!("/expenses/{id}"), input).await
    }

    pub async fn delete_expense(&self, id: i32) -> Result<()> {
        self.delete(&format!("/expenses/{id}")).await
    }

    pub async fn expense_summary(&self) -> Result<ExpenseSummary> {
        self.get("/expenses/summary").await
    }

    pub async fn expense_categories(&self) -> Result<Vec<ExpenseCategory>> {
        self.get_list("/expenses/categories").await
    }

    pub async fn create_expense_category(&self, input: &CreateExpenseCategory) -> Result<ExpenseCategory> {
        input.validate()?;
        self.post("/expenses/categories", input).await
    }

    pub async fn update_expense_category(
        &self,
        id: i32,
        input: &UpdateExpenseCategory,
    ) -> Result<ExpenseCategory> {
        input.validate()?;
        self.put(&format!("/expenses/categories/{id}"), input).await
    }

    pub async fn delete_expense_category(&self, id: i32) -> Result<()> {
        self.delete(&format!("/expenses/categories/{id}")).await
    }
}
