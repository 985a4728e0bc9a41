use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::auth::authenticate;
use super::AppState;
use crate::domain::checklist::TemplateItemInput;
use crate::domain::error::Result;

#[get("/checklists")]
pub async fn list_checklists(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let templates = data.checklists.list_templates(&agent).await?;
    Ok(HttpResponse::Ok().json(templates))
}

#[derive(Debug, Deserialize)]
pub struct CreateChecklistRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<TemplateItemInput>,
}

#[post("/checklists")]
pub async fn create_checklist(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateChecklistRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let body = body.into_inner();
    let summary = data
        .checklists
        .create_template(&agent, body.name, body.description, body.items)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[derive(Debug, Deserialize)]
pub struct FromTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

#[post("/checklists/from-template")]
pub async fn create_from_template(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<FromTemplateRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let body = body.into_inner();
    let summary = data
        .checklists
        .create_from_template(&agent, body.name, body.description, body.items)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/checklists/{checklist_id}")]
pub async fn get_checklist(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let detail = data
        .checklists
        .get_template(&agent, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/checklists/{checklist_id}/delete")]
pub async fn delete_checklist(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    data.checklists
        .delete_template(&agent, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub item_ids: Vec<String>,
}

#[put("/checklists/{checklist_id}/reorder")]
pub async fn reorder_checklist(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ReorderRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let detail = data
        .checklists
        .reorder_items(&agent, &path.into_inner(), body.into_inner().item_ids)
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignChecklistRequest {
    pub template_id: String,
}

#[post("/clients/{client_id}/checklist")]
pub async fn assign_checklist(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AssignChecklistRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let progress = data
        .checklists
        .assign_to_client(&agent, &path.into_inner(), &body.template_id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleItemRequest {
    pub is_completed: bool,
}

#[put("/clients/{client_id}/checklist/items/{item_id}")]
pub async fn toggle_checklist_item(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<ToggleItemRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let (client_id, item_id) = path.into_inner();
    let progress = data
        .checklists
        .toggle_item(&agent, &client_id, &item_id, body.is_completed)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}
