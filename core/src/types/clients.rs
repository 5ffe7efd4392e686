use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;

/// A customer record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    /// `"Company"` or `"Individual"`.
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    pub website: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub job_count: Option<i32>,
    pub contact_count: Option<i32>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /clients`. `email` and `phone` seed a primary contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Default for CreateClient {
    fn default() -> Self {
        Self {
            client_type: "Company".to_string(),
            name: String::new(),
            website: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            zip: None,
            notes: None,
            email: None,
            phone: None,
        }
    }
}

impl CreateClient {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// Payload for `PUT /clients/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateClient {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

impl From<&Client> for UpdateClient {
    fn from(client: &Client) -> Self {
        Self {
            client_type: client.client_type.clone(),
            name: client.name.clone(),
            website: client.website.clone(),
            address_line1: client.address_line1.clone(),
            address_line2: client.address_line2.clone(),
            city: client.city.clone(),
            state: client.state.clone(),
            zip: client.zip.clone(),
            notes: client.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub client_name: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateContact {
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub is_primary: bool,
}

impl CreateContact {
    pub fn validate(&self) -> Result<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContact {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub is_primary: bool,
}

impl UpdateContact {
    pub fn validate(&self) -> Result<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn create_client_defaults_to_company() {
        let input = CreateClient::default();
        assert_eq!(input.client_type, "Company");
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "Company");
        assert!(json.get("website").is_none());
    }

    #[test]
    fn client_decodes_from_any_key_case_and_naive_timestamps() {
        let client: Client = crate::codec::decode(
            r#"{"ID":5,"TYPE":"Individual","name":"Jo","ISACTIVE":true,
                "createdat":"2024-03-01T12:00:00","UpdatedAt":"2024-03-01T12:00:00.5"}"#,
        )
        .unwrap();
        assert_eq!(client.id, 5);
        assert_eq!(client.client_type, "Individual");
        assert!(client.is_active);
        assert_eq!(client.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert!(client.updated_at > client.created_at);
    }

    #[test]
    fn blank_name_fails_validation() {
        let input = CreateClient {
            name: "   ".to_string(),
            ..CreateClient::default()
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn contact_requires_both_names() {
        let input = CreateContact {
            client_id: 1,
            first_name: "Ada".to_string(),
            ..CreateContact::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "validation failed: last name is required");
    }
}
