use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{Client, Contact, CreateClient, CreateContact, UpdateClient, UpdateContact};

impl<P: CredentialProvider> ResourceClient<P> {
    pub async fn list_clients(&self, active_only: bool) -> Result<Vec<Client>> {
        if active_only {
            self.get_list("/clients?active_only=true").await
        } else {
            self.get_list("/clients").await
        }
    }

    pub async fn get_client(&self, id: i32) -> Result<Client> {
        self.get(&format!("/clients/{id}")).await
    }

    pub async fn create_client(&self, input: &CreateClient) -> Result<Client> {
        input.validate()?;
        self.post("/clients", input).await
    }

    pub async fn update_client(&self, id: i32, input: &UpdateClient) -> Result<Client> {
        input.validate()?;
        self.put(&format!("/clients/{id}"), input).await
    }

    /// Soft-delete: the client drops out of `active_only` listings.
    pub async fn deactivate_client(&self, id: i32) -> Result<()> {
        self.patch_empty(&format!("/clients/{id}/deactivate")).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.get_list("/contacts").await
    }

    pub async fn contacts_by_client(&self, client_id: i32) -> Result<Vec<Contact>> {
        self.get_list(&format!("/contacts/by-client/{client_id}")).await
    }

    pub async fn create_contact(&self, input: &CreateContact) -> Result<Contact> {
        input.validate()?;
        self.post("/contacts", input).await
    }

    pub async fn update_contact(&self, id: i32, input: &UpdateContact) -> Result<Contact> {
        input.validate()?;
        self.put(&format!("/contacts/{id}"), input).await
    }

    /// Detach a contact from its client.
    pub async fn remove_contact(&self, id: i32) -> Result<()> {
        self.patch_empty(&format!("/contacts/{id}/remove")).await
    }
}
