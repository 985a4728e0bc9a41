use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::ChecklistProgress;
use super::preferences::ClientPreferences;

/// Pipeline stage of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientStatus {
    Prospect,
    Active,
    Inactive,
    Closed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Prospect => "PROSPECT",
            ClientStatus::Active => "ACTIVE",
            ClientStatus::Inactive => "INACTIVE",
            ClientStatus::Closed => "CLOSED",
        }
    }

    /// Rows are only ever written via `as_str`, so unknown values fall back
    /// to the initial stage.
    pub fn parse(value: &str) -> Self {
        match value {
            "ACTIVE" => ClientStatus::Active,
            "INACTIVE" => ClientStatus::Inactive,
            "CLOSED" => ClientStatus::Closed,
            _ => ClientStatus::Prospect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub agent_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub status: ClientStatus,
    pub onboarding_completed: bool,
    pub onboarding_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Row shape of the clients list screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: ClientStatus,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub preferences_set: bool,
    pub checklist_completion: i64,
}

/// Full client detail, with preferences and document checklist when present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub status: ClientStatus,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub preferences: Option<ClientPreferences>,
    pub checklist: Option<ChecklistProgress>,
}

impl ClientDetail {
    pub fn new(
        client: Client,
        preferences: Option<ClientPreferences>,
        checklist: Option<ChecklistProgress>,
    ) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone_number: client.phone_number,
            status: client.status,
            onboarding_completed: client.onboarding_completed,
            created_at: client.created_at,
            preferences,
            checklist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ClientStatus::Prospect,
            ClientStatus::Active,
            ClientStatus::Inactive,
            ClientStatus::Closed,
        ] {
            assert_eq!(ClientStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_prospect() {
        assert_eq!(ClientStatus::parse("ARCHIVED"), ClientStatus::Prospect);
    }
}
