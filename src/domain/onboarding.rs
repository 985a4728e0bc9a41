use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Links expire this many days after creation.
pub const LINK_TTL_DAYS: i64 = 30;

/// A shareable, single-client onboarding link. The token is the link's
/// identity; it appears verbatim in the client-facing URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLink {
    pub token: String,
    pub agent_id: String,
    pub client_id: String,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OnboardingLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// The client-facing URL for a token, rooted at the configured public
/// origin.
pub fn onboarding_url(app_url: &str, token: &str) -> String {
    format!("{}/clients/onboard/{}", app_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_onboarding_url_normalizes_trailing_slash() {
        assert_eq!(
            onboarding_url("https://app.agentpro.app/", "abc"),
            "https://app.agentpro.app/clients/onboard/abc"
        );
        assert_eq!(
            onboarding_url("http://localhost:3000", "abc"),
            "http://localhost:3000/clients/onboard/abc"
        );
    }

    #[test]
    fn test_expiry_is_exclusive_of_the_deadline() {
        let now = Utc::now();
        let link = OnboardingLink {
            token: "t".into(),
            agent_id: "a".into(),
            client_id: "c".into(),
            expires_at: now,
            is_used: false,
            used_at: None,
            created_at: now - Duration::days(1),
        };
        assert!(!link.is_expired(now));
        assert!(link.is_expired(now + Duration::seconds(1)));
    }
}
