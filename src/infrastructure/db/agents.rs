use crate::domain::agent::Agent;
use crate::domain::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct AgentRepository {
    pool: SqlitePool,
}

impl AgentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// First sign-in bootstraps an empty agent row; later requests reuse it.
    pub async fn get_or_create(&self, external_user_id: &str) -> Result<Agent> {
        if let Some(agent) = self.find_by_external_id(external_user_id).await? {
            return Ok(agent);
        }

        let agent = Agent {
            id: Uuid::new_v4().to_string(),
            external_user_id: external_user_id.to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            brokerage: None,
            license_number: None,
            phone_number: None,
            workspace_name: None,
            mls_integration_enabled: false,
            feature_flags: serde_json::json!({}),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO agents (id, external_user_id, email, first_name, last_name, \
             mls_integration_enabled, feature_flags, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&agent.id)
        .bind(&agent.external_user_id)
        .bind(&agent.email)
        .bind(&agent.first_name)
        .bind(&agent.last_name)
        .bind(agent.mls_integration_enabled)
        .bind(agent.feature_flags.to_string())
        .bind(agent.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create agent: {e}")))?;

        Ok(agent)
    }

    pub async fn find_by_external_id(&self, external_user_id: &str) -> Result<Option<Agent>> {
        let row = sqlx::query_as::<_, AgentEntity>(
            "SELECT id, external_user_id, email, first_name, last_name, brokerage, \
             license_number, phone_number, workspace_name, mls_integration_enabled, \
             feature_flags, created_at FROM agents WHERE external_user_id = ?",
        )
        .bind(external_user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch agent: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    pub async fn get(&self, id: &str) -> Result<Agent> {
        let row = sqlx::query_as::<_, AgentEntity>(
            "SELECT id, external_user_id, email, first_name, last_name, brokerage, \
             license_number, phone_number, workspace_name, mls_integration_enabled, \
             feature_flags, created_at FROM agents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch agent: {e}")))?;

        match row {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound("Agent not found".to_string())),
        }
    }

    pub async fn update_settings(
        &self,
        id: &str,
        workspace_name: Option<String>,
        mls_integration_enabled: bool,
        mls_provider: Option<String>,
    ) -> Result<Agent> {
        let feature_flags = serde_json::json!({ "mlsProvider": mls_provider });

        sqlx::query(
            "UPDATE agents SET workspace_name = ?, mls_integration_enabled = ?, \
             feature_flags = ? WHERE id = ?",
        )
        .bind(&workspace_name)
        .bind(mls_integration_enabled)
        .bind(feature_flags.to_string())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update settings: {e}")))?;

        self.get(id).await
    }
}

#[derive(sqlx::FromRow)]
struct AgentEntity {
    id: String,
    external_user_id: String,
    email: String,
    first_name: String,
    last_name: String,
    brokerage: Option<String>,
    license_number: Option<String>,
    phone_number: Option<String>,
    workspace_name: Option<String>,
    mls_integration_enabled: bool,
    feature_flags: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AgentEntity> for Agent {
    fn from(e: AgentEntity) -> Self {
        Self {
            id: e.id,
            external_user_id: e.external_user_id,
            email: e.email,
            first_name: e.first_name,
            last_name: e.last_name,
            brokerage: e.brokerage,
            license_number: e.license_number,
            phone_number: e.phone_number,
            workspace_name: e.workspace_name,
            mls_integration_enabled: e.mls_integration_enabled,
            feature_flags: serde_json::from_str(&e.feature_flags)
                .unwrap_or_else(|_| serde_json::json!({})),
            created_at: e.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::test_pool;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let repo = AgentRepository::new(test_pool().await);

        let first = repo.get_or_create("user_1").await.unwrap();
        let second = repo.get_or_create("user_1").await.unwrap();
        assert_eq!(first.id, second.id);

        let other = repo.get_or_create("user_2").await.unwrap();
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn test_settings_round_trip_through_feature_flags() {
        let repo = AgentRepository::new(test_pool().await);
        let agent = repo.get_or_create("user_1").await.unwrap();

        let updated = repo
            .update_settings(
                &agent.id,
                Some("Mitchell Realty".to_string()),
                true,
                Some("mls-grid".to_string()),
            )
            .await
            .unwrap();

        let settings = updated.settings();
        assert_eq!(settings.workspace_name.as_deref(), Some("Mitchell Realty"));
        assert!(settings.mls_integration_enabled);
        assert_eq!(settings.mls_provider.as_deref(), Some("mls-grid"));
    }
}
