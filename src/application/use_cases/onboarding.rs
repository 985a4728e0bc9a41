use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::import_clients::PLACEHOLDER_EMAIL_DOMAIN;
use crate::domain::agent::Agent;
use crate::domain::client::{Client, ClientStatus};
use crate::domain::error::{AppError, Result};
use crate::domain::onboarding::{onboarding_url, OnboardingLink, LINK_TTL_DAYS};
use crate::domain::preferences::{ClientPreferences, FlexibilityLevel};
use crate::infrastructure::db::agents::AgentRepository;
use crate::infrastructure::db::clients::ClientRepository;
use crate::infrastructure::db::onboarding::OnboardingLinkRepository;
use crate::infrastructure::db::preferences::PreferenceRepository;

/// Details for the client a link is being created for. Only the first name
/// is truly required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClientInput {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOnboarding {
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub client_id: String,
    pub client_name: String,
    pub agent_name: String,
    pub is_expired: bool,
}

/// Intake-form preference payload. The form calls the flexibility question
/// "timeline"; prices arrive as typed by the buyer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePreferences {
    #[serde(rename = "propertyType", default)]
    pub property_types: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub desired_move_date: Option<DateTime<Utc>>,
    pub has_pool: Option<bool>,
    pub pet_friendly: Option<bool>,
    pub school_districts: Option<Vec<String>>,
    pub timeline: Option<FlexibilityLevel>,
}

pub struct OnboardingUseCase {
    agents: Arc<AgentRepository>,
    clients: Arc<ClientRepository>,
    links: Arc<OnboardingLinkRepository>,
    preferences: Arc<PreferenceRepository>,
    app_url: String,
}

impl OnboardingUseCase {
    pub fn new(
        agents: Arc<AgentRepository>,
        clients: Arc<ClientRepository>,
        links: Arc<OnboardingLinkRepository>,
        preferences: Arc<PreferenceRepository>,
        app_url: String,
    ) -> Self {
        Self {
            agents,
            clients,
            links,
            preferences,
            app_url,
        }
    }

    /// Create (or reuse) a client and hand back a fresh 30-day onboarding
    /// link for them.
    pub async fn create_link(&self, agent: &Agent, input: NewClientInput) -> Result<CreatedOnboarding> {
        if input.first_name.trim().is_empty() {
            return Err(AppError::ValidationError("First name is required".to_string()));
        }

        let client = match &input.email {
            Some(email) => self.clients.find_by_email(&agent.id, email).await?,
            None => None,
        };

        let client = match client {
            Some(existing) => existing,
            None => {
                let now = Utc::now();
                let email = input.email.clone().unwrap_or_else(|| {
                    format!(
                        "{}{}",
                        input.first_name.trim().to_lowercase(),
                        PLACEHOLDER_EMAIL_DOMAIN
                    )
                });
                let client = Client {
                    id: Uuid::new_v4().to_string(),
                    agent_id: agent.id.clone(),
                    first_name: input.first_name.trim().to_string(),
                    last_name: input.last_name.trim().to_string(),
                    email,
                    phone_number: input.phone_number.clone().filter(|p| !p.trim().is_empty()),
                    status: ClientStatus::Prospect,
                    onboarding_completed: false,
                    onboarding_completed_at: None,
                    created_at: now,
                    updated_at: now,
                };
                self.clients.create(&client).await?;
                client
            }
        };

        let now = Utc::now();
        let link = OnboardingLink {
            token: Uuid::new_v4().to_string(),
            agent_id: agent.id.clone(),
            client_id: client.id.clone(),
            expires_at: now + Duration::days(LINK_TTL_DAYS),
            is_used: false,
            used_at: None,
            created_at: now,
        };
        self.links.create(&link).await?;

        info!(client_id = %client.id, "created onboarding link");

        Ok(CreatedOnboarding {
            url: onboarding_url(&self.app_url, &link.token),
            token: link.token,
            expires_at: link.expires_at,
        })
    }

    /// Resolve a token for the public onboarding page.
    pub async fn validate_token(&self, token: &str) -> Result<TokenValidation> {
        let link = self
            .links
            .find(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid token".to_string()))?;

        let client = self
            .clients
            .get(&link.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        let agent = self.agents.get(&client.agent_id).await?;

        Ok(TokenValidation {
            client_id: client.id.clone(),
            client_name: client.display_name(),
            agent_name: agent.display_name(),
            is_expired: link.is_expired(Utc::now()),
        })
    }

    /// Accept an intake submission: save preferences, mark the client
    /// onboarded and active, and consume the link.
    pub async fn submit_intake(&self, token: &str, preferences: IntakePreferences) -> Result<()> {
        let now = Utc::now();
        let link = match self.links.find(token).await? {
            Some(link) if !link.is_expired(now) => link,
            _ => {
                return Err(AppError::ValidationError(
                    "Invalid or expired token".to_string(),
                ))
            }
        };

        let stored = ClientPreferences {
            client_id: link.client_id.clone(),
            property_types: preferences.property_types,
            min_price: normalize_price(preferences.min_price),
            max_price: normalize_price(preferences.max_price),
            desired_move_date: preferences.desired_move_date,
            has_pool: preferences.has_pool,
            pet_friendly: preferences.pet_friendly,
            school_districts: preferences.school_districts,
            flexibility_level: preferences.timeline.unwrap_or_default(),
        };
        self.preferences.upsert(&stored).await?;

        self.clients
            .mark_onboarding_complete(&link.client_id, now)
            .await?;
        self.links.mark_used(token, now).await?;

        info!(client_id = %link.client_id, "intake submitted");

        Ok(())
    }
}

/// Buyers often type prices in thousands; treat small values as such, and
/// zero as "not answered".
pub fn normalize_price(value: Option<i64>) -> Option<i64> {
    match value {
        None | Some(0) => None,
        Some(v) if v < 10_000 => Some(v * 1000),
        Some(v) => Some(v),
    }
}
