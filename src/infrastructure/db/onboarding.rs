use crate::domain::error::{AppError, Result};
use crate::domain::onboarding::OnboardingLink;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct OnboardingLinkRepository {
    pool: SqlitePool,
}

impl OnboardingLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, link: &OnboardingLink) -> Result<()> {
        sqlx::query(
            "INSERT INTO onboarding_links (token, agent_id, client_id, expires_at, is_used, \
             used_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&link.token)
        .bind(&link.agent_id)
        .bind(&link.client_id)
        .bind(link.expires_at)
        .bind(link.is_used)
        .bind(link.used_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create onboarding link: {e}")))?;

        Ok(())
    }

    pub async fn find(&self, token: &str) -> Result<Option<OnboardingLink>> {
        let row = sqlx::query_as::<_, LinkEntity>(
            "SELECT token, agent_id, client_id, expires_at, is_used, used_at, created_at \
             FROM onboarding_links WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch onboarding link: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    pub async fn mark_used(&self, token: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE onboarding_links SET is_used = 1, used_at = ? WHERE token = ?")
            .bind(at)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to mark link used: {e}")))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct LinkEntity {
    token: String,
    agent_id: String,
    client_id: String,
    expires_at: chrono::DateTime<chrono::Utc>,
    is_used: bool,
    used_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<LinkEntity> for OnboardingLink {
    fn from(e: LinkEntity) -> Self {
        Self {
            token: e.token,
            agent_id: e.agent_id,
            client_id: e.client_id,
            expires_at: e.expires_at,
            is_used: e.is_used,
            used_at: e.used_at,
            created_at: e.created_at,
        }
    }
}
