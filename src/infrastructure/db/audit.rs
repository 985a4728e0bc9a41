use crate::domain::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// One append-only audit entry. `metadata` is free-form JSON.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub agent_id: String,
    pub action: String,
    pub client_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(agent_id: &str, action: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            action: action.to_string(),
            client_id: None,
            resource_type: None,
            resource_id: None,
            metadata: None,
        }
    }

    pub fn client(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self
    }

    pub fn resource(mut self, resource_type: &str, resource_id: &str) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, entry: AuditEntry) -> Result<()> {
        info!(
            agent_id = %entry.agent_id,
            action = %entry.action,
            "recording audit entry"
        );

        sqlx::query(
            "INSERT INTO audit_logs (id, agent_id, action, client_id, resource_type, \
             resource_id, metadata, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.agent_id)
        .bind(&entry.action)
        .bind(&entry.client_id)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(entry.metadata.as_ref().map(|m| m.to_string()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to record audit entry: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::agents::AgentRepository;
    use crate::infrastructure::db::test_pool;

    #[tokio::test]
    async fn test_record_inserts_a_row() {
        let pool = test_pool().await;
        let agent = AgentRepository::new(pool.clone())
            .get_or_create("user_1")
            .await
            .unwrap();

        let repo = AuditLogRepository::new(pool.clone());
        repo.record(
            AuditEntry::new(&agent.id, "CREATE_CHECKLIST")
                .resource("ChecklistTemplate", "template-1")
                .metadata(serde_json::json!({ "itemCount": 3 })),
        )
        .await
        .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
