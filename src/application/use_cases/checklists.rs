use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::checklist::{
    ChecklistProgress, ChecklistTemplate, TemplateDetail, TemplateItemInput, TemplateItemView,
    TemplateSummary,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::audit::{AuditEntry, AuditLogRepository};
use crate::infrastructure::db::checklists::ChecklistRepository;
use crate::infrastructure::db::clients::ClientRepository;

/// Checklist template management plus per-client document checklists.
pub struct ChecklistUseCase {
    checklists: Arc<ChecklistRepository>,
    clients: Arc<ClientRepository>,
    audit: Arc<AuditLogRepository>,
}

impl ChecklistUseCase {
    pub fn new(
        checklists: Arc<ChecklistRepository>,
        clients: Arc<ClientRepository>,
        audit: Arc<AuditLogRepository>,
    ) -> Self {
        Self {
            checklists,
            clients,
            audit,
        }
    }

    pub async fn list_templates(&self, agent: &Agent) -> Result<Vec<TemplateSummary>> {
        self.checklists.list_templates(&agent.id).await
    }

    pub async fn create_template(
        &self,
        agent: &Agent,
        name: String,
        description: Option<String>,
        items: Vec<TemplateItemInput>,
    ) -> Result<TemplateSummary> {
        let template = ChecklistTemplate {
            id: Uuid::new_v4().to_string(),
            agent_id: agent.id.clone(),
            name,
            description,
            is_default: false,
            created_at: Utc::now(),
        };
        self.checklists.create_template(&template, &items).await?;

        Ok(TemplateSummary {
            id: template.id,
            name: template.name,
            description: template.description,
            is_default: template.is_default,
            item_count: items.len() as i64,
        })
    }

    /// Create a template from one of the built-in starter lists (a plain
    /// list of item names), and audit the creation.
    pub async fn create_from_template(
        &self,
        agent: &Agent,
        name: String,
        description: Option<String>,
        item_names: Vec<String>,
    ) -> Result<TemplateSummary> {
        let items: Vec<TemplateItemInput> = item_names
            .into_iter()
            .map(|name| TemplateItemInput {
                name,
                description: None,
            })
            .collect();

        let summary = self
            .create_template(agent, name, description, items)
            .await?;

        self.audit
            .record(
                AuditEntry::new(&agent.id, "CREATE_CHECKLIST")
                    .resource("ChecklistTemplate", &summary.id)
                    .metadata(serde_json::json!({
                        "createdAt": Utc::now().to_rfc3339(),
                    })),
            )
            .await?;

        Ok(summary)
    }

    pub async fn get_template(&self, agent: &Agent, template_id: &str) -> Result<TemplateDetail> {
        let template = self.owned_template(agent, template_id).await?;
        let items = self.checklists.list_template_items(template_id).await?;

        Ok(TemplateDetail {
            id: template.id,
            name: template.name,
            description: template.description,
            is_default: template.is_default,
            items: items
                .into_iter()
                .map(|item| TemplateItemView {
                    id: item.id,
                    name: item.name,
                    order: item.sort_order,
                })
                .collect(),
            created_at: template.created_at,
        })
    }

    pub async fn delete_template(&self, agent: &Agent, template_id: &str) -> Result<()> {
        let template = self.owned_template(agent, template_id).await?;
        self.checklists.delete_template(&template.id).await?;

        self.audit
            .record(
                AuditEntry::new(&agent.id, "DELETE_CHECKLIST")
                    .resource("ChecklistTemplate", &template.id)
                    .metadata(serde_json::json!({
                        "deletedAt": Utc::now().to_rfc3339(),
                        "checklistName": template.name,
                    })),
            )
            .await?;

        Ok(())
    }

    pub async fn reorder_items(
        &self,
        agent: &Agent,
        template_id: &str,
        ordered_ids: Vec<String>,
    ) -> Result<TemplateDetail> {
        self.owned_template(agent, template_id).await?;
        self.checklists
            .reorder_items(template_id, &ordered_ids)
            .await?;
        self.get_template(agent, template_id).await
    }

    /// Instantiate a template for one of the agent's clients. A client has
    /// at most one document checklist.
    pub async fn assign_to_client(
        &self,
        agent: &Agent,
        client_id: &str,
        template_id: &str,
    ) -> Result<ChecklistProgress> {
        let client = self.owned_client(agent, client_id).await?;
        self.owned_template(agent, template_id).await?;

        if self.checklists.find_for_client(&client.id).await?.is_some() {
            return Err(AppError::ValidationError(
                "Client already has a document checklist".to_string(),
            ));
        }

        self.checklists
            .create_for_client(&client.id, template_id)
            .await?;
        self.progress(&client.id).await
    }

    pub async fn toggle_item(
        &self,
        agent: &Agent,
        client_id: &str,
        item_id: &str,
        is_completed: bool,
    ) -> Result<ChecklistProgress> {
        let client = self.owned_client(agent, client_id).await?;
        let checklist = self
            .checklists
            .find_for_client(&client.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist not found".to_string()))?;

        let item = self
            .checklists
            .get_item(item_id)
            .await?
            .filter(|item| item.checklist_id == checklist.id)
            .ok_or_else(|| AppError::NotFound("Checklist item not found".to_string()))?;

        self.checklists
            .set_item_completed(&item.id, is_completed)
            .await?;
        self.progress(&client.id).await
    }

    async fn progress(&self, client_id: &str) -> Result<ChecklistProgress> {
        self.checklists
            .progress_for_client(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist not found".to_string()))
    }

    async fn owned_template(&self, agent: &Agent, template_id: &str) -> Result<ChecklistTemplate> {
        let template = self
            .checklists
            .get_template(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist not found".to_string()))?;
        if template.agent_id != agent.id {
            return Err(AppError::Forbidden("Unauthorized".to_string()));
        }
        Ok(template)
    }

    async fn owned_client(
        &self,
        agent: &Agent,
        client_id: &str,
    ) -> Result<crate::domain::client::Client> {
        self.clients
            .get_owned(&agent.id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }
}
