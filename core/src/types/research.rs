use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;

/// Progress of a research lead. Sent on the wire as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    FollowingUp,
    Converted,
    Closed,
}

impl LeadStatus {
    pub fn display(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::FollowingUp => "Following Up",
            LeadStatus::Converted => "Converted",
            LeadStatus::Closed => "Closed",
        }
    }
}

impl TryFrom<i32> for LeadStatus {
    type Error = String;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(LeadStatus::New),
            1 => Ok(LeadStatus::Contacted),
            2 => Ok(LeadStatus::FollowingUp),
            3 => Ok(LeadStatus::Converted),
            4 => Ok(LeadStatus::Closed),
            other => Err(format!("unknown lead status {other}")),
        }
    }
}

impl From<LeadStatus> for i32 {
    fn from(status: LeadStatus) -> Self {
        status as i32
    }
}

/// Whether the prospect said they would pay for a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum WouldPay {
    #[default]
    No,
    Maybe,
    Yes,
}

impl WouldPay {
    pub fn display(&self) -> &'static str {
        match self {
            WouldPay::No => "No",
            WouldPay::Maybe => "Maybe",
            WouldPay::Yes => "Yes",
        }
    }
}

impl TryFrom<i32> for WouldPay {
    type Error = String;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(WouldPay::No),
            1 => Ok(WouldPay::Maybe),
            2 => Ok(WouldPay::Yes),
            other => Err(format!("unknown would-pay value {other}")),
        }
    }
}

impl From<WouldPay> for i32 {
    fn from(value: WouldPay) -> Self {
        value as i32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchLead {
    pub research_lead_id: i32,
    pub client_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub research_theme_id: Option<i32>,
    pub business_name: String,
    pub date_contacted: NaiveDate,
    pub pain_points: Option<String>,
    pub interest_level: i32,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub would_pay: WouldPay,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub theme_name: Option<String>,
}

impl ResearchLead {
    pub fn contact_display(&self) -> String {
        match self.contact_first_name.as_deref() {
            Some(first) if !first.trim().is_empty() => {
                format!("{first} {}", self.contact_last_name.as_deref().unwrap_or_default())
                    .trim()
                    .to_string()
            }
            _ => "—".to_string(),
        }
    }

    pub fn is_linked_to_client(&self) -> bool {
        self.client_id.is_some()
    }
}

/// Payload for creating and updating research leads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchLeadInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_theme_id: Option<i32>,
    pub business_name: String,
    pub date_contacted: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_points: Option<String>,
    pub interest_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub would_pay: WouldPay,
    pub status: LeadStatus,
}

impl ResearchLeadInput {
    pub fn new(business_name: impl Into<String>, date_contacted: NaiveDate) -> Self {
        Self {
            client_id: None,
            contact_id: None,
            research_theme_id: None,
            business_name: business_name.into(),
            date_contacted,
            pain_points: None,
            interest_level: 3,
            follow_up_date: None,
            notes: None,
            would_pay: WouldPay::No,
            status: LeadStatus::New,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("business name", &self.business_name)
    }
}

/// Payload for `POST /research/{id}/promote`, which turns a lead into a
/// client (and optionally a contact) on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromoteLead {
    pub client_type: String,
    pub client_name: String,
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
    pub client_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_job_title: Option<String>,
}

impl PromoteLead {
    /// Prefill from a lead: company client named after the business, with the
    /// lead's contact details carried over.
    pub fn from_lead(lead: &ResearchLead) -> Self {
        Self {
            client_type: "Company".to_string(),
            client_name: lead.business_name.clone(),
            website: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            zip: None,
            client_notes: lead.notes.clone(),
            contact_first_name: lead.contact_first_name.clone(),
            contact_last_name: lead.contact_last_name.clone(),
            contact_email: lead.contact_email.clone(),
            contact_phone: lead.contact_phone.clone(),
            contact_job_title: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("client name", &self.client_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchTheme {
    pub research_theme_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ThemeInput {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> ResearchLead {
        serde_json::from_value(serde_json::json!({
            "researchLeadId": 5,
            "businessName": "Corner Bakery",
            "dateContacted": "2024-04-10",
            "interestLevel": 4,
            "wouldPay": 1,
            "status": 2,
            "contactFirstName": "Sam",
            "contactLastName": "Lee",
            "createdAt": "2024-04-10T08:00:00Z",
            "updatedAt": "2024-04-10T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn integer_codes_map_to_enums() {
        let l = lead();
        assert_eq!(l.status, LeadStatus::FollowingUp);
        assert_eq!(l.status.display(), "Following Up");
        assert_eq!(l.would_pay.display(), "Maybe");
        assert!(!l.is_linked_to_client());
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let err = serde_json::from_value::<LeadStatus>(serde_json::json!(9)).unwrap_err();
        assert!(err.to_string().contains("unknown lead status 9"));
    }

    #[test]
    fn input_serializes_codes_as_integers() {
        let mut input = ResearchLeadInput::new("Corner Bakery", NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
        input.status = LeadStatus::Converted;
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["status"], 3);
        assert_eq!(json["wouldPay"], 0);
        assert_eq!(json["interestLevel"], 3);
    }

    #[test]
    fn contact_display_falls_back_to_dash() {
        let mut l = lead();
        assert_eq!(l.contact_display(), "Sam Lee");
        l.contact_first_name = None;
        assert_eq!(l.contact_display(), "—");
    }

    #[test]
    fn promote_prefills_from_lead() {
        let req = PromoteLead::from_lead(&lead());
        assert_eq!(req.client_name, "Corner Bakery");
        assert_eq!(req.contact_first_name.as_deref(), Some("Sam"));
        assert!(req.validate().is_ok());
    }
}
