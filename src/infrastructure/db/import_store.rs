use async_trait::async_trait;
use sqlx::SqlitePool;

use super::clients::ClientRepository;
use super::onboarding::OnboardingLinkRepository;
use crate::application::use_cases::import_clients::ImportStore;
use crate::domain::client::Client;
use crate::domain::error::Result;
use crate::domain::onboarding::OnboardingLink;

/// Sqlite-backed persistence for the batch importer.
pub struct SqliteImportStore {
    clients: ClientRepository,
    links: OnboardingLinkRepository,
}

impl SqliteImportStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            links: OnboardingLinkRepository::new(pool),
        }
    }
}

#[async_trait]
impl ImportStore for SqliteImportStore {
    async fn find_client_by_email(&self, agent_id: &str, email: &str) -> Result<Option<Client>> {
        self.clients.find_by_email(agent_id, email).await
    }

    async fn create_client(&self, client: &Client) -> Result<()> {
        self.clients.create(client).await
    }

    async fn create_onboarding_link(&self, link: &OnboardingLink) -> Result<()> {
        self.links.create(link).await
    }
}
