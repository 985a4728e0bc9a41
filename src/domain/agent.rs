use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An agent account, keyed by the hosted identity provider's user id.
/// The row is bootstrapped empty on first sign-in and filled in later
/// through settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub external_user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub brokerage: Option<String>,
    pub license_number: Option<String>,
    pub phone_number: Option<String>,
    pub workspace_name: Option<String>,
    pub mls_integration_enabled: bool,
    pub feature_flags: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The settings surface exposed to the settings screen. `mls_provider`
/// lives inside the `feature_flags` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    pub workspace_name: Option<String>,
    pub mls_integration_enabled: bool,
    pub mls_provider: Option<String>,
}

impl Agent {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn settings(&self) -> AgentSettings {
        AgentSettings {
            workspace_name: self.workspace_name.clone(),
            mls_integration_enabled: self.mls_integration_enabled,
            mls_provider: self
                .feature_flags
                .get("mlsProvider")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}
