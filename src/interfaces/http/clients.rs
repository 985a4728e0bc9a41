use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::auth::authenticate;
use super::AppState;
use crate::domain::client::ClientDetail;
use crate::domain::error::{AppError, Result};
use crate::domain::preferences::PreferenceInput;

#[get("/clients")]
pub async fn list_clients(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let summaries = data.clients.list_summaries(&agent.id).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/clients/{client_id}")]
pub async fn get_client(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let client_id = path.into_inner();

    let client = data
        .clients
        .get_owned(&agent.id, &client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    let preferences = data.preferences.find(&client.id).await?;
    let checklist = data.checklist_repo.progress_for_client(&client.id).await?;

    Ok(HttpResponse::Ok().json(ClientDetail::new(client, preferences, checklist)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub client_id: String,
    pub preferences: PreferenceInput,
}

#[post("/clients/update-preferences")]
pub async fn update_client_preferences(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let body = body.into_inner();

    let preferences = data
        .update_preferences
        .execute(&agent, &body.client_id, body.preferences)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": preferences,
    })))
}
