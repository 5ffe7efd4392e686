use crate::client::ResourceClient;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::types::{Note, NoteInput};

impl<P: CredentialProvider> ResourceClient<P> {
    /// The caller's private notes plus every global note.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.get_list("/notes").await
    }

    pub async fn create_note(&self, input: &NoteInput) -> Result<Note> {
        input.validate()?;
        self.post("/notes", input).await
    }

    pub async fn update_note(&self, note_id: i32, input: &NoteInput) -> Result<Note> {
        input.validate()?;
        self.put(&format!("/notes/{note_id}"), input).await
    }

    pub async fn delete_note(&self, note_id: i32) -> Result<()> {
        self.delete(&format!("/notes/{note_id}")).await
    }
}
