use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::client::{Client, ClientStatus};
use crate::domain::error::{AppError, Result};
use crate::domain::import::{
    CandidateRecord, ImportOutcome, ImportReport, ImportedClient, RejectedRecord, MAX_BATCH_SIZE,
};
use crate::domain::onboarding::{onboarding_url, OnboardingLink, LINK_TTL_DAYS};

/// Domain suffix of generated placeholder addresses. A duplicate match on a
/// placeholder address never blocks creation.
pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "@pending.agentpro.app";

/// Persistence boundary of the batch importer.
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn find_client_by_email(&self, agent_id: &str, email: &str) -> Result<Option<Client>>;
    async fn create_client(&self, client: &Client) -> Result<()>;
    async fn create_onboarding_link(&self, link: &OnboardingLink) -> Result<()>;
}

pub struct BatchImportUseCase {
    store: Arc<dyn ImportStore>,
    app_url: String,
}

enum RecordOutcome {
    Created(String),
    Duplicate,
}

impl BatchImportUseCase {
    pub fn new(store: Arc<dyn ImportStore>, app_url: String) -> Self {
        Self { store, app_url }
    }

    /// Import a batch of candidates for one agent.
    ///
    /// Records are processed strictly in input order: duplicate detection
    /// for a record must observe clients created earlier in the same
    /// batch. One record's failure never aborts its siblings; it lands in
    /// the `failed` bucket with a reason and the loop moves on.
    pub async fn execute(
        &self,
        agent_id: &str,
        candidates: &[CandidateRecord],
    ) -> Result<ImportReport> {
        if candidates.is_empty() {
            return Err(AppError::ValidationError("No clients to import".to_string()));
        }
        if candidates.len() > MAX_BATCH_SIZE {
            return Err(AppError::ValidationError(format!(
                "Maximum {} clients per batch",
                MAX_BATCH_SIZE
            )));
        }

        let expires_at = Utc::now() + Duration::days(LINK_TTL_DAYS);
        let mut outcome = ImportOutcome::default();

        for candidate in candidates {
            let first_name = candidate.first_name.trim();
            if first_name.is_empty() {
                outcome.failed.push(RejectedRecord {
                    name: "(empty)".to_string(),
                    reason: "Missing first name".to_string(),
                });
                continue;
            }

            let last_name = match candidate.last_name.trim() {
                "" => "—".to_string(),
                trimmed => trimmed.to_string(),
            };
            let email = match candidate.email.trim() {
                "" => placeholder_email(first_name, &last_name),
                trimmed => trimmed.to_string(),
            };
            let phone_number = match candidate.phone_number.trim() {
                "" => None,
                trimmed => Some(trimmed.to_string()),
            };
            let name = format!("{} {}", first_name, last_name);

            match self
                .import_one(agent_id, first_name, &last_name, &email, phone_number, expires_at)
                .await
            {
                Ok(RecordOutcome::Created(url)) => {
                    outcome.success.push(ImportedClient { name, url });
                }
                Ok(RecordOutcome::Duplicate) => {
                    outcome.skipped.push(RejectedRecord {
                        name,
                        reason: "Client with this email already exists".to_string(),
                    });
                }
                Err(err) => {
                    warn!(client = %name, error = %err, "client import failed");
                    outcome.failed.push(RejectedRecord {
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            imported = outcome.success.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failed.len(),
            "batch import finished"
        );

        Ok(ImportReport::from(outcome))
    }

    async fn import_one(
        &self,
        agent_id: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let existing = self.store.find_client_by_email(agent_id, email).await?;
        if existing.is_some() && !email.contains(PLACEHOLDER_EMAIL_DOMAIN) {
            return Ok(RecordOutcome::Duplicate);
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone_number,
            status: ClientStatus::Prospect,
            onboarding_completed: false,
            onboarding_completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store.create_client(&client).await?;

        let link = OnboardingLink {
            token: Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            client_id: client.id.clone(),
            expires_at,
            is_used: false,
            used_at: None,
            created_at: now,
        };
        self.store.create_onboarding_link(&link).await?;

        Ok(RecordOutcome::Created(onboarding_url(&self.app_url, &link.token)))
    }
}

/// Placeholder address for records imported without an email. A missing
/// last name ("—") reads as "client" in the local part.
fn placeholder_email(first_name: &str, last_name: &str) -> String {
    format!(
        "{}.{}{}",
        first_name.to_lowercase(),
        last_name.to_lowercase().replacen('—', "client", 1),
        PLACEHOLDER_EMAIL_DOMAIN
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        clients: Mutex<Vec<Client>>,
        links: Mutex<Vec<OnboardingLink>>,
        lookups: AtomicUsize,
        creates: AtomicUsize,
        /// 0-based create index that should fail.
        fail_create_at: Option<usize>,
    }

    impl MockStore {
        fn failing_at(index: usize) -> Self {
            Self {
                fail_create_at: Some(index),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ImportStore for MockStore {
        async fn find_client_by_email(
            &self,
            agent_id: &str,
            email: &str,
        ) -> Result<Option<Client>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .clients
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.agent_id == agent_id && c.email == email)
                .cloned())
        }

        async fn create_client(&self, client: &Client) -> Result<()> {
            let index = self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail_create_at == Some(index) {
                return Err(AppError::DatabaseError("disk is full".to_string()));
            }
            self.clients.lock().unwrap().push(client.clone());
            Ok(())
        }

        async fn create_onboarding_link(&self, link: &OnboardingLink) -> Result<()> {
            self.links.lock().unwrap().push(link.clone());
            Ok(())
        }
    }

    fn candidate(first: &str, last: &str, email: &str, phone: &str) -> CandidateRecord {
        CandidateRecord {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone_number: phone.to_string(),
        }
    }

    fn use_case(store: Arc<MockStore>) -> BatchImportUseCase {
        BatchImportUseCase::new(store, "http://localhost:3000".to_string())
    }

    #[tokio::test]
    async fn test_successful_import_creates_clients_and_links() {
        let store = Arc::new(MockStore::default());
        let report = use_case(store.clone())
            .execute(
                "agent-1",
                &[
                    candidate("John", "Doe", "john@x.com", "555-0100"),
                    candidate("Jane", "Smith", "jane@x.com", ""),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.results.success[0].name, "John Doe");
        assert!(report.results.success[0]
            .url
            .starts_with("http://localhost:3000/clients/onboard/"));
        assert_eq!(store.links.lock().unwrap().len(), 2);
        assert_eq!(store.clients.lock().unwrap()[1].phone_number, None);
    }

    #[tokio::test]
    async fn test_one_failing_record_does_not_abort_the_batch() {
        let store = Arc::new(MockStore::failing_at(1));
        let report = use_case(store.clone())
            .execute(
                "agent-1",
                &[
                    candidate("A", "One", "a@x.com", ""),
                    candidate("B", "Two", "b@x.com", ""),
                    candidate("C", "Three", "c@x.com", ""),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results.failed[0].name, "B Two");
        assert!(report.results.failed[0].reason.contains("disk is full"));

        let names: Vec<String> = report
            .results
            .success
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["A One", "C Three"]);
        for entry in &report.results.success {
            assert!(entry.url.contains("/clients/onboard/"));
        }
    }

    #[tokio::test]
    async fn test_batch_above_the_cap_is_rejected_before_any_store_call() {
        let store = Arc::new(MockStore::default());
        let oversized: Vec<CandidateRecord> = (0..201)
            .map(|i| candidate(&format!("P{i}"), "", "", ""))
            .collect();

        let err = use_case(store.clone())
            .execute("agent-1", &oversized)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Maximum 200 clients per batch");
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let store = Arc::new(MockStore::default());
        assert!(use_case(store).execute("agent-1", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_first_name_fails_that_record_only() {
        let store = Arc::new(MockStore::default());
        let report = use_case(store)
            .execute(
                "agent-1",
                &[
                    candidate("  ", "Doe", "x@x.com", ""),
                    candidate("Jane", "", "", ""),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.results.failed[0].name, "(empty)");
        assert_eq!(report.results.failed[0].reason, "Missing first name");
        assert_eq!(report.imported, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_skipped_within_one_batch() {
        let store = Arc::new(MockStore::default());
        let report = use_case(store)
            .execute(
                "agent-1",
                &[
                    candidate("John", "Doe", "john@x.com", ""),
                    candidate("Johnny", "Doe", "john@x.com", ""),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.results.skipped[0].reason,
            "Client with this email already exists"
        );
    }

    #[tokio::test]
    async fn test_placeholder_emails_bypass_duplicate_detection() {
        let store = Arc::new(MockStore::default());
        let report = use_case(store.clone())
            .execute(
                "agent-1",
                &[candidate("John", "", "", ""), candidate("John", "", "", "")],
            )
            .await
            .unwrap();

        // Both derive the same placeholder address yet both are created.
        assert_eq!(report.imported, 2);
        let clients = store.clients.lock().unwrap();
        assert_eq!(clients[0].email, "john.client@pending.agentpro.app");
        assert_eq!(clients[0].last_name, "—");
    }

    #[tokio::test]
    async fn test_fields_are_trimmed_before_persistence() {
        let store = Arc::new(MockStore::default());
        use_case(store.clone())
            .execute(
                "agent-1",
                &[candidate(" John ", " Doe ", " john@x.com ", " 555-0100 ")],
            )
            .await
            .unwrap();

        let clients = store.clients.lock().unwrap();
        assert_eq!(clients[0].first_name, "John");
        assert_eq!(clients[0].last_name, "Doe");
        assert_eq!(clients[0].email, "john@x.com");
        assert_eq!(clients[0].phone_number.as_deref(), Some("555-0100"));
    }
}
