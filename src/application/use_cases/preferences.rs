use std::sync::Arc;

use crate::domain::agent::Agent;
use crate::domain::error::{AppError, Result};
use crate::domain::preferences::{ClientPreferences, PreferenceInput};
use crate::infrastructure::db::audit::{AuditEntry, AuditLogRepository};
use crate::infrastructure::db::clients::ClientRepository;
use crate::infrastructure::db::preferences::PreferenceRepository;

/// Agent-side preference editing, with an audit trail.
pub struct UpdatePreferencesUseCase {
    clients: Arc<ClientRepository>,
    preferences: Arc<PreferenceRepository>,
    audit: Arc<AuditLogRepository>,
}

impl UpdatePreferencesUseCase {
    pub fn new(
        clients: Arc<ClientRepository>,
        preferences: Arc<PreferenceRepository>,
        audit: Arc<AuditLogRepository>,
    ) -> Self {
        Self {
            clients,
            preferences,
            audit,
        }
    }

    pub async fn execute(
        &self,
        agent: &Agent,
        client_id: &str,
        input: PreferenceInput,
    ) -> Result<ClientPreferences> {
        let client = self
            .clients
            .get(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        if client.agent_id != agent.id {
            return Err(AppError::Forbidden("Unauthorized".to_string()));
        }

        let preferences = input.into_preferences(client.id.clone());
        self.preferences.upsert(&preferences).await?;

        self.audit
            .record(
                AuditEntry::new(&agent.id, "UPDATE_CLIENT_PREFERENCES")
                    .client(&client.id)
                    .metadata(serde_json::json!({
                        "updatedAt": chrono::Utc::now().to_rfc3339(),
                    })),
            )
            .await?;

        Ok(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::agents::AgentRepository;
    use crate::infrastructure::db::clients::tests::sample_client;
    use crate::infrastructure::db::test_pool;
    use sqlx::SqlitePool;

    fn use_case(pool: SqlitePool) -> UpdatePreferencesUseCase {
        UpdatePreferencesUseCase::new(
            Arc::new(ClientRepository::new(pool.clone())),
            Arc::new(PreferenceRepository::new(pool.clone())),
            Arc::new(AuditLogRepository::new(pool)),
        )
    }

    #[tokio::test]
    async fn test_foreign_clients_are_forbidden() {
        let pool = test_pool().await;
        let agents = AgentRepository::new(pool.clone());
        let owner = agents.get_or_create("owner").await.unwrap();
        let intruder = agents.get_or_create("intruder").await.unwrap();

        let client = sample_client(&owner.id, "john@x.com");
        ClientRepository::new(pool.clone()).create(&client).await.unwrap();

        let err = use_case(pool)
            .execute(&intruder, &client.id, PreferenceInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_writes_preferences_and_audit() {
        let pool = test_pool().await;
        let owner = AgentRepository::new(pool.clone())
            .get_or_create("owner")
            .await
            .unwrap();
        let client = sample_client(&owner.id, "john@x.com");
        ClientRepository::new(pool.clone()).create(&client).await.unwrap();

        let input = PreferenceInput {
            property_types: vec!["TOWNHOUSE".to_string()],
            min_price: Some(300_000),
            ..PreferenceInput::default()
        };
        let stored = use_case(pool.clone())
            .execute(&owner, &client.id, input)
            .await
            .unwrap();
        assert_eq!(stored.property_types, ["TOWNHOUSE"]);

        let audits: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audit_logs WHERE action = 'UPDATE_CLIENT_PREFERENCES'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(audits, 1);
    }
}
