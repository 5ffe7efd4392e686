use super::with_query;
use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{
    CreateInvoice, CreateLineItem, CreatePayment, Invoice, InvoiceStatus, InvoiceStatusUpdate,
    LineItem, Payment, UpdateInvoice, UpdateLineItem,
};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn list_invoices(&self, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>> {
        let pairs: Vec<(&str, String)> = status
            .map(|s| ("status", s.as_str().to_string()))
            .into_iter()
            .collect();
        self.get_list(&with_query("/invoices", &pairs)?).await
    }

    pub async fn invoices_by_job(&self, job_id: i32) -> Result<Vec<Invoice>> {
        self.get_list(&format!("/invoices/by-job/{job_id}")).await
    }

    pub async fn invoices_by_client(&self, client_id: i32) -> Result<Vec<Invoice>> {
        self.get_list(&format!("/invoices/by-client/{client_id}")).await
    }

    pub async fn get_invoice(&self, id: i32) -> Result<Invoice> {
        self.get(&format!("/invoices/{id}")).await
    }

    pub async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice> {
        input.validate()?;
        self.post("/invoices", input).await
    }

    pub async fn update_invoice(&self, id: i32, input: &UpdateInvoice) -> Result<Invoice> {
        self.put(&format!("/invoices/{id}"), input).await
    }

    pub async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> Result<Invoice> {
        self.patch(&format!("/invoices/{id}/status"), &InvoiceStatusUpdate { status })
            .await
    }

    pub async fn delete_invoice(&self, id: i32) -> Result<()> {
        self.delete(&format!("/invoices/{id}")).await
    }

    pub async fn list_payments(&self, invoice_id: i32) -> Result<Vec<Payment>> {
        self.get_list(&format!("/invoices/{invoice_id}/payments")).await
    }

    pub async fn record_payment(&self, invoice_id: i32, input: &CreatePayment) -> Result<Payment> {
        input.validate()?;
        self.post(&format!("/invoices/{invoice_id}/payments"), input)
            .await
    }

    pub async fn line_items(&self, invoice_id: i32) -> Result<Vec<LineItem>> {
        self.get_list(&format!("/invoices/{invoice_id}/line-items")).await
    }

    pub async fn add_line_item(&self, input: &CreateLineItem) -> Result<LineItem> {
        input.validate()?;
        self.post("/invoices/line-items", input).await
    }

    pub async fn update_line_item(&self, id: i32, input: &UpdateLineItem) -> Result<()> {
        input.validate()?;
        self.put_no_content(&format!("/invoices/line-items/{id}"), input)
            .await
    }

    pub async fn delete_line_item(&self, id: i32) -> Result<()> {
        self.delete(&format!("/invoices/line-items/{id}")).await
    }
}
