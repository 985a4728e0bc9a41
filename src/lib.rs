pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::sync::Arc;
use tracing::info;

use crate::application::{
    BatchImportUseCase, ChecklistUseCase, OnboardingUseCase, UpdatePreferencesUseCase,
};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::agents::AgentRepository;
use crate::infrastructure::db::audit::AuditLogRepository;
use crate::infrastructure::db::checklists::ChecklistRepository;
use crate::infrastructure::db::clients::ClientRepository;
use crate::infrastructure::db::import_store::SqliteImportStore;
use crate::infrastructure::db::onboarding::OnboardingLinkRepository;
use crate::infrastructure::db::preferences::PreferenceRepository;
use crate::interfaces::http::{auth, start_server, AppState};

pub async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = AppConfig::load()?;

    let pool = infrastructure::db::init_db(&config.database_url).await?;
    info!(database_url = %config.database_url, "database ready");

    let agents = Arc::new(AgentRepository::new(pool.clone()));
    let clients = Arc::new(ClientRepository::new(pool.clone()));
    let preferences = Arc::new(PreferenceRepository::new(pool.clone()));
    let checklist_repo = Arc::new(ChecklistRepository::new(pool.clone()));
    let links = Arc::new(OnboardingLinkRepository::new(pool.clone()));
    let audit = Arc::new(AuditLogRepository::new(pool.clone()));

    let batch_import = BatchImportUseCase::new(
        Arc::new(SqliteImportStore::new(pool.clone())),
        config.app_url.clone(),
    );
    let onboarding = OnboardingUseCase::new(
        agents.clone(),
        clients.clone(),
        links.clone(),
        preferences.clone(),
        config.app_url.clone(),
    );
    let update_preferences =
        UpdatePreferencesUseCase::new(clients.clone(), preferences.clone(), audit.clone());
    let checklists = ChecklistUseCase::new(checklist_repo.clone(), clients.clone(), audit);

    let auth = auth::verifier_from_config(&config.auth)?;
    let bind_address = config.bind_address.clone();

    let state = AppState {
        config,
        auth,
        agents,
        clients,
        preferences,
        checklist_repo,
        batch_import,
        onboarding,
        update_preferences,
        checklists,
    };

    let server = start_server(state)?;
    info!(%bind_address, "HTTP server started");

    server.await?;
    Ok(())
}
