use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable checklist owned by an agent; per-client document checklists
/// are instantiated from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTemplate {
    pub id: String,
    pub agent_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTemplateItem {
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i64,
}

/// Item payload accepted when creating a template; order follows the input
/// position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// List-screen shape for a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub item_count: i64,
}

/// Detail-screen shape for a template, items in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub items: Vec<TemplateItemView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItemView {
    pub id: String,
    pub name: String,
    pub order: i64,
}

/// A client's document checklist instantiated from a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChecklist {
    pub id: String,
    pub client_id: String,
    pub template_id: String,
    pub completion_percentage: i64,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChecklistItem {
    pub id: String,
    pub checklist_id: String,
    pub template_item_id: String,
    pub is_completed: bool,
}

/// Progress view joined against the template item names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    pub completion_percentage: i64,
    pub is_complete: bool,
    pub items: Vec<ChecklistItemView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemView {
    pub id: String,
    pub name: String,
    pub is_completed: bool,
}

/// Completion stats for a checklist. An empty checklist counts as 0% and
/// never as complete.
pub fn completion(completed: usize, total: usize) -> (i64, bool) {
    if total == 0 {
        return (0, false);
    }
    let percentage = ((completed as f64 / total as f64) * 100.0).round() as i64;
    (percentage, completed == total)
}
