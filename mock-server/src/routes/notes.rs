use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::store::Note;
use crate::{require, ApiFailure, ApiResult, Db};

/// Every note belongs to the single mock user.
const USER_ID: i32 = 1;
const AUTHOR: &str = "Mock User";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteInput {
    title: String,
    content: Option<String>,
    #[serde(default)]
    is_global: bool,
}

pub(super) fn routes() -> Router<Db> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
}

async fn list_notes(State(db): State<Db>) -> Json<Vec<Note>> {
    let store = db.read().await;
    let mut notes: Vec<Note> = store.notes.values().cloned().collect();
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Json(notes)
}

async fn create_note(
    State(db): State<Db>,
    Json(input): Json<NoteInput>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    require("Title", &input.title)?;
    let mut store = db.write().await;
    let now = Utc::now();
    let note_id = store.next_id();
    let note = Note {
        note_id,
        user_id: USER_ID,
        title: input.title,
        content: input.content,
        is_global: input.is_global,
        created_at: now,
        updated_at: now,
        author_name: Some(AUTHOR.to_string()),
    };
    store.notes.insert(note_id, note.clone());
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<NoteInput>,
) -> ApiResult<Json<Note>> {
    require("Title", &input.title)?;
    let mut store = db.write().await;
    let note = store.notes.get_mut(&id).ok_or_else(|| ApiFailure::not_found("Note"))?;
    note.title = input.title;
    note.content = input.content;
    note.is_global = input.is_global;
    note.updated_at = Utc::now();
    Ok(Json(note.clone()))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .notes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("Note"))
}
