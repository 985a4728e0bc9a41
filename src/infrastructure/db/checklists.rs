use crate::domain::checklist::{
    completion, ChecklistItemView, ChecklistProgress, ChecklistTemplate, ChecklistTemplateItem,
    DocumentChecklist, DocumentChecklistItem, TemplateItemInput, TemplateSummary,
};
use crate::domain::error::{AppError, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct ChecklistRepository {
    pool: SqlitePool,
}

impl ChecklistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---- templates ----

    pub async fn create_template(
        &self,
        template: &ChecklistTemplate,
        items: &[TemplateItemInput],
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO checklist_templates (id, agent_id, name, description, is_default, \
             created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&template.id)
        .bind(&template.agent_id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(template.is_default)
        .bind(template.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create checklist: {e}")))?;

        for (index, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO checklist_template_items (id, template_id, name, description, \
                 sort_order) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&template.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(index as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create checklist item: {e}")))?;
        }

        Ok(())
    }

    pub async fn list_templates(&self, agent_id: &str) -> Result<Vec<TemplateSummary>> {
        let rows = sqlx::query_as::<_, TemplateSummaryEntity>(
            "SELECT t.id, t.name, t.description, t.is_default, COUNT(i.id) AS item_count \
             FROM checklist_templates t \
             LEFT JOIN checklist_template_items i ON i.template_id = t.id \
             WHERE t.agent_id = ? GROUP BY t.id ORDER BY t.created_at DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list checklists: {e}")))?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    pub async fn get_template(&self, template_id: &str) -> Result<Option<ChecklistTemplate>> {
        let row = sqlx::query_as::<_, TemplateEntity>(
            "SELECT id, agent_id, name, description, is_default, created_at \
             FROM checklist_templates WHERE id = ?",
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch checklist: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    pub async fn list_template_items(
        &self,
        template_id: &str,
    ) -> Result<Vec<ChecklistTemplateItem>> {
        let rows = sqlx::query_as::<_, TemplateItemEntity>(
            "SELECT id, template_id, name, description, sort_order \
             FROM checklist_template_items WHERE template_id = ? ORDER BY sort_order ASC",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list checklist items: {e}")))?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    /// Items first, then the template, mirroring the cascade the schema
    /// does not do for us.
    pub async fn delete_template(&self, template_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM checklist_template_items WHERE template_id = ?")
            .bind(template_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete checklist items: {e}")))?;

        sqlx::query("DELETE FROM checklist_templates WHERE id = ?")
            .bind(template_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete checklist: {e}")))?;

        Ok(())
    }

    /// Reassign item order from a caller-supplied id list. Every item of
    /// the template must appear exactly once.
    pub async fn reorder_items(&self, template_id: &str, ordered_ids: &[String]) -> Result<()> {
        let items = self.list_template_items(template_id).await?;

        if items.len() != ordered_ids.len()
            || !items.iter().all(|item| ordered_ids.contains(&item.id))
        {
            return Err(AppError::ValidationError(
                "Item list does not match the checklist".to_string(),
            ));
        }

        for (index, item_id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE checklist_template_items SET sort_order = ? WHERE id = ?")
                .bind(index as i64)
                .bind(item_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to reorder checklist items: {e}"))
                })?;
        }

        Ok(())
    }

    // ---- per-client document checklists ----

    pub async fn find_for_client(&self, client_id: &str) -> Result<Option<DocumentChecklist>> {
        let row = sqlx::query_as::<_, DocumentChecklistEntity>(
            "SELECT id, client_id, template_id, completion_percentage, is_complete \
             FROM document_checklists WHERE client_id = ?",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch document checklist: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    /// Instantiate a template for a client: one uncompleted item per
    /// template item.
    pub async fn create_for_client(
        &self,
        client_id: &str,
        template_id: &str,
    ) -> Result<DocumentChecklist> {
        let checklist = DocumentChecklist {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            template_id: template_id.to_string(),
            completion_percentage: 0,
            is_complete: false,
        };

        sqlx::query(
            "INSERT INTO document_checklists (id, client_id, template_id, \
             completion_percentage, is_complete) VALUES (?, ?, ?, 0, 0)",
        )
        .bind(&checklist.id)
        .bind(client_id)
        .bind(template_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create document checklist: {e}")))?;

        for item in self.list_template_items(template_id).await? {
            sqlx::query(
                "INSERT INTO document_checklist_items (id, checklist_id, template_item_id, \
                 is_completed) VALUES (?, ?, ?, 0)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&checklist.id)
            .bind(&item.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create document checklist item: {e}"))
            })?;
        }

        Ok(checklist)
    }

    pub async fn get_item(&self, item_id: &str) -> Result<Option<DocumentChecklistItem>> {
        let row = sqlx::query_as::<_, DocumentItemEntity>(
            "SELECT id, checklist_id, template_item_id, is_completed \
             FROM document_checklist_items WHERE id = ?",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch checklist item: {e}")))?;

        Ok(row.map(|e| e.into()))
    }

    /// Flip one item and fold the new counts back into the checklist row.
    pub async fn set_item_completed(&self, item_id: &str, is_completed: bool) -> Result<()> {
        let item = self
            .get_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist item not found".to_string()))?;

        sqlx::query("UPDATE document_checklist_items SET is_completed = ? WHERE id = ?")
            .bind(is_completed)
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update checklist item: {e}")))?;

        let (completed, total) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(is_completed), 0), COUNT(*) \
             FROM document_checklist_items WHERE checklist_id = ?",
        )
        .bind(&item.checklist_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count checklist items: {e}")))?;

        let (percentage, is_complete) = completion(completed as usize, total as usize);

        sqlx::query(
            "UPDATE document_checklists SET completion_percentage = ?, is_complete = ? \
             WHERE id = ?",
        )
        .bind(percentage)
        .bind(is_complete)
        .bind(&item.checklist_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update completion: {e}")))?;

        Ok(())
    }

    /// Progress view for the client screen: items joined to their template
    /// names, in template order.
    pub async fn progress_for_client(&self, client_id: &str) -> Result<Option<ChecklistProgress>> {
        let Some(checklist) = self.find_for_client(client_id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ProgressItemEntity>(
            "SELECT d.id, t.name, d.is_completed \
             FROM document_checklist_items d \
             JOIN checklist_template_items t ON t.id = d.template_item_id \
             WHERE d.checklist_id = ? ORDER BY t.sort_order ASC",
        )
        .bind(&checklist.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list checklist progress: {e}")))?;

        Ok(Some(ChecklistProgress {
            completion_percentage: checklist.completion_percentage,
            is_complete: checklist.is_complete,
            items: items
                .into_iter()
                .map(|e| ChecklistItemView {
                    id: e.id,
                    name: e.name,
                    is_completed: e.is_completed,
                })
                .collect(),
        }))
    }
}

#[derive(sqlx::FromRow)]
struct TemplateEntity {
    id: String,
    agent_id: String,
    name: String,
    description: Option<String>,
    is_default: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TemplateEntity> for ChecklistTemplate {
    fn from(e: TemplateEntity) -> Self {
        Self {
            id: e.id,
            agent_id: e.agent_id,
            name: e.name,
            description: e.description,
            is_default: e.is_default,
            created_at: e.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateSummaryEntity {
    id: String,
    name: String,
    description: Option<String>,
    is_default: bool,
    item_count: i64,
}

impl From<TemplateSummaryEntity> for TemplateSummary {
    fn from(e: TemplateSummaryEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            is_default: e.is_default,
            item_count: e.item_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateItemEntity {
    id: String,
    template_id: String,
    name: String,
    description: Option<String>,
    sort_order: i64,
}

impl From<TemplateItemEntity> for ChecklistTemplateItem {
    fn from(e: TemplateItemEntity) -> Self {
        Self {
            id: e.id,
            template_id: e.template_id,
            name: e.name,
            description: e.description,
            sort_order: e.sort_order,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentChecklistEntity {
    id: String,
    client_id: String,
    template_id: String,
    completion_percentage: i64,
    is_complete: bool,
}

impl From<DocumentChecklistEntity> for DocumentChecklist {
    fn from(e: DocumentChecklistEntity) -> Self {
        Self {
            id: e.id,
            client_id: e.client_id,
            template_id: e.template_id,
            completion_percentage: e.completion_percentage,
            is_complete: e.is_complete,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentItemEntity {
    id: String,
    checklist_id: String,
    template_item_id: String,
    is_completed: bool,
}

impl From<DocumentItemEntity> for DocumentChecklistItem {
    fn from(e: DocumentItemEntity) -> Self {
        Self {
            id: e.id,
            checklist_id: e.checklist_id,
            template_item_id: e.template_item_id,
            is_completed: e.is_completed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProgressItemEntity {
    id: String,
    name: String,
    is_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::agents::AgentRepository;
    use crate::infrastructure::db::clients::{tests::sample_client, ClientRepository};
    use crate::infrastructure::db::test_pool;
    use chrono::Utc;

    fn template(agent_id: &str, name: &str) -> ChecklistTemplate {
        ChecklistTemplate {
            id: Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            name: name.to_string(),
            description: None,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    fn items(names: &[&str]) -> Vec<TemplateItemInput> {
        names
            .iter()
            .map(|name| TemplateItemInput {
                name: name.to_string(),
                description: None,
            })
            .collect()
    }

    async fn setup() -> (SqlitePool, String) {
        let pool = test_pool().await;
        let agent = AgentRepository::new(pool.clone())
            .get_or_create("user_1")
            .await
            .unwrap();
        (pool, agent.id)
    }

    #[tokio::test]
    async fn test_template_items_keep_input_order() {
        let (pool, agent) = setup().await;
        let repo = ChecklistRepository::new(pool);

        let t = template(&agent, "Buyer documents");
        repo.create_template(&t, &items(&["Pre-approval", "ID", "Proof of funds"]))
            .await
            .unwrap();

        let stored = repo.list_template_items(&t.id).await.unwrap();
        let names: Vec<&str> = stored.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Pre-approval", "ID", "Proof of funds"]);

        let summaries = repo.list_templates(&agent).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].item_count, 3);
    }

    #[tokio::test]
    async fn test_reorder_rejects_foreign_or_partial_id_lists() {
        let (pool, agent) = setup().await;
        let repo = ChecklistRepository::new(pool);

        let t = template(&agent, "Docs");
        repo.create_template(&t, &items(&["a", "b"])).await.unwrap();
        let stored = repo.list_template_items(&t.id).await.unwrap();

        let partial = vec![stored[0].id.clone()];
        assert!(repo.reorder_items(&t.id, &partial).await.is_err());

        let reversed = vec![stored[1].id.clone(), stored[0].id.clone()];
        repo.reorder_items(&t.id, &reversed).await.unwrap();

        let after = repo.list_template_items(&t.id).await.unwrap();
        assert_eq!(after[0].name, "b");
        assert_eq!(after[1].name, "a");
    }

    #[tokio::test]
    async fn test_delete_removes_items_and_template() {
        let (pool, agent) = setup().await;
        let repo = ChecklistRepository::new(pool);

        let t = template(&agent, "Docs");
        repo.create_template(&t, &items(&["a"])).await.unwrap();
        repo.delete_template(&t.id).await.unwrap();

        assert!(repo.get_template(&t.id).await.unwrap().is_none());
        assert!(repo.list_template_items(&t.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_recomputes_completion() {
        let (pool, agent) = setup().await;
        let clients = ClientRepository::new(pool.clone());
        let client = sample_client(&agent, "john@x.com");
        clients.create(&client).await.unwrap();

        let repo = ChecklistRepository::new(pool);
        let t = template(&agent, "Docs");
        repo.create_template(&t, &items(&["a", "b", "c"])).await.unwrap();
        repo.create_for_client(&client.id, &t.id).await.unwrap();

        let progress = repo.progress_for_client(&client.id).await.unwrap().unwrap();
        assert_eq!(progress.completion_percentage, 0);
        assert_eq!(progress.items.len(), 3);

        repo.set_item_completed(&progress.items[0].id, true).await.unwrap();
        let progress = repo.progress_for_client(&client.id).await.unwrap().unwrap();
        assert_eq!(progress.completion_percentage, 33);
        assert!(!progress.is_complete);

        for item in &progress.items {
            repo.set_item_completed(&item.id, true).await.unwrap();
        }
        let progress = repo.progress_for_client(&client.id).await.unwrap().unwrap();
        assert_eq!(progress.completion_percentage, 100);
        assert!(progress.is_complete);
    }
}
