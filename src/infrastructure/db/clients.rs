use crate::domain::client::{Client, ClientStatus, ClientSummary};
use crate::domain::error::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(
            "INSERT INTO clients (id, agent_id, first_name, last_name, email, phone_number, \
             status, onboarding_completed, onboarding_completed_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&client.id)
        .bind(&client.agent_id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone_number)
        .bind(client.status.as_str())
        .bind(client.onboarding_completed)
        .bind(client.onboarding_completed_at)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create client: {e}")))?;

        Ok(())
    }

    pub async fn get(&self, client_id: &str) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientEntity>(&select_clients("WHERE id = ?"))
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch client: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    /// A client visible to the given agent, or None (foreign clients look
    /// the same as missing ones to the caller).
    pub async fn get_owned(&self, agent_id: &str, client_id: &str) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientEntity>(&select_clients(
            "WHERE id = ? AND agent_id = ?",
        ))
        .bind(client_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch client: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    pub async fn find_by_email(&self, agent_id: &str, email: &str) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientEntity>(&select_clients(
            "WHERE agent_id = ? AND email = ? LIMIT 1",
        ))
        .bind(agent_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch client by email: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    /// List-screen summaries, newest first, with the preference and
    /// checklist joins the screen needs.
    pub async fn list_summaries(&self, agent_id: &str) -> Result<Vec<ClientSummary>> {
        let rows = sqlx::query_as::<_, ClientSummaryEntity>(
            "SELECT c.id, c.first_name, c.last_name, c.email, c.status, \
             c.onboarding_completed, c.created_at, \
             (p.client_id IS NOT NULL) AS preferences_set, \
             COALESCE(d.completion_percentage, 0) AS checklist_completion \
             FROM clients c \
             LEFT JOIN client_preferences p ON p.client_id = c.id \
             LEFT JOIN document_checklists d ON d.client_id = c.id \
             WHERE c.agent_id = ? ORDER BY c.created_at DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list clients: {e}")))?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    /// Intake completion: flips the client into the active pipeline.
    pub async fn mark_onboarding_complete(
        &self,
        client_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE clients SET onboarding_completed = 1, onboarding_completed_at = ?, \
             status = 'ACTIVE', updated_at = ? WHERE id = ?",
        )
        .bind(at)
        .bind(at)
        .bind(client_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to complete onboarding: {e}")))?;

        Ok(())
    }

    pub async fn count(&self, agent_id: &str) -> Result<i64> {
        self.count_where("SELECT COUNT(*) FROM clients WHERE agent_id = ?", agent_id)
            .await
    }

    pub async fn count_active(&self, agent_id: &str) -> Result<i64> {
        self.count_where(
            "SELECT COUNT(*) FROM clients WHERE agent_id = ? AND status = 'ACTIVE'",
            agent_id,
        )
        .await
    }

    pub async fn count_onboarding_incomplete(&self, agent_id: &str) -> Result<i64> {
        self.count_where(
            "SELECT COUNT(*) FROM clients WHERE agent_id = ? AND onboarding_completed = 0",
            agent_id,
        )
        .await
    }

    async fn count_where(&self, sql: &str, agent_id: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(agent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count clients: {e}")))
    }
}

fn select_clients(filter: &str) -> String {
    format!(
        "SELECT id, agent_id, first_name, last_name, email, phone_number, status, \
         onboarding_completed, onboarding_completed_at, created_at, updated_at \
         FROM clients {filter}"
    )
}

#[derive(sqlx::FromRow)]
struct ClientEntity {
    id: String,
    agent_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    status: String,
    onboarding_completed: bool,
    onboarding_completed_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ClientEntity> for Client {
    fn from(e: ClientEntity) -> Self {
        Self {
            id: e.id,
            agent_id: e.agent_id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone_number: e.phone_number,
            status: ClientStatus::parse(&e.status),
            onboarding_completed: e.onboarding_completed,
            onboarding_completed_at: e.onboarding_completed_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClientSummaryEntity {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    status: String,
    onboarding_completed: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    preferences_set: bool,
    checklist_completion: i64,
}

impl From<ClientSummaryEntity> for ClientSummary {
    fn from(e: ClientSummaryEntity) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            status: ClientStatus::parse(&e.status),
            onboarding_completed: e.onboarding_completed,
            created_at: e.created_at,
            preferences_set: e.preferences_set,
            checklist_completion: e.checklist_completion,
        }
    }
}
