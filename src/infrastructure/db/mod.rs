pub mod agents;
pub mod audit;
pub mod checklists;
pub mod clients;
pub mod import_store;
pub mod onboarding;
pub mod preferences;

use crate::domain::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

/// Open the application database, creating the file and schema on first
/// run.
pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse connection string: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

    migrate(&pool).await?;

    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;
    }

    Ok(())
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS agents (
        id TEXT PRIMARY KEY,
        external_user_id TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL DEFAULT '',
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        brokerage TEXT,
        license_number TEXT,
        phone_number TEXT,
        workspace_name TEXT,
        mls_integration_enabled INTEGER NOT NULL DEFAULT 0,
        feature_flags TEXT NOT NULL DEFAULT '{}',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        agent_id TEXT NOT NULL REFERENCES agents(id),
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone_number TEXT,
        status TEXT NOT NULL DEFAULT 'PROSPECT',
        onboarding_completed INTEGER NOT NULL DEFAULT 0,
        onboarding_completed_at DATETIME,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_clients_agent ON clients(agent_id)",
    "CREATE INDEX IF NOT EXISTS idx_clients_agent_email ON clients(agent_id, email)",
    "CREATE TABLE IF NOT EXISTS client_preferences (
        client_id TEXT PRIMARY KEY REFERENCES clients(id),
        property_types TEXT NOT NULL DEFAULT '[]',
        min_price INTEGER,
        max_price INTEGER,
        desired_move_date DATETIME,
        has_pool INTEGER,
        pet_friendly INTEGER,
        school_districts TEXT,
        flexibility_level TEXT NOT NULL DEFAULT 'MEDIUM'
    )",
    "CREATE TABLE IF NOT EXISTS checklist_templates (
        id TEXT PRIMARY KEY,
        agent_id TEXT NOT NULL REFERENCES agents(id),
        name TEXT NOT NULL,
        description TEXT,
        is_default INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS checklist_template_items (
        id TEXT PRIMARY KEY,
        template_id TEXT NOT NULL REFERENCES checklist_templates(id),
        name TEXT NOT NULL,
        description TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS document_checklists (
        id TEXT PRIMARY KEY,
        client_id TEXT NOT NULL UNIQUE REFERENCES clients(id),
        template_id TEXT NOT NULL REFERENCES checklist_templates(id),
        completion_percentage INTEGER NOT NULL DEFAULT 0,
        is_complete INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS document_checklist_items (
        id TEXT PRIMARY KEY,
        checklist_id TEXT NOT NULL REFERENCES document_checklists(id),
        template_item_id TEXT NOT NULL REFERENCES checklist_template_items(id),
        is_completed INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS onboarding_links (
        token TEXT PRIMARY KEY,
        agent_id TEXT NOT NULL REFERENCES agents(id),
        client_id TEXT NOT NULL REFERENCES clients(id),
        expires_at DATETIME NOT NULL,
        is_used INTEGER NOT NULL DEFAULT 0,
        used_at DATETIME,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS audit_logs (
        id TEXT PRIMARY KEY,
        agent_id TEXT NOT NULL REFERENCES agents(id),
        action TEXT NOT NULL,
        client_id TEXT,
        resource_type TEXT,
        resource_id TEXT,
        metadata TEXT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
];

// A pooled :memory: database is per-connection, so tests pin the pool to a
// single connection.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory database should open");

    migrate(&pool).await.expect("schema should apply");
    pool
}
