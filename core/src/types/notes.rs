use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

impl Note {
    pub fn scope_display(&self) -> &'static str {
        if self.is_global {
            "Global"
        } else {
            "Private"
        }
    }
}

/// Payload for creating and updating notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub is_global: bool,
}

impl NoteInput {
    pub fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}
