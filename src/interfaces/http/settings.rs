use actix_web::{get, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use super::auth::authenticate;
use super::AppState;
use crate::domain::error::{AppError, Result};

#[get("/settings")]
pub async fn get_settings(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    Ok(HttpResponse::Ok().json(agent.settings()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(max = 120))]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub mls_integration_enabled: bool,
    pub mls_provider: Option<String>,
}

#[put("/settings")]
pub async fn update_settings(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let updated = data
        .agents
        .update_settings(
            &agent.id,
            body.workspace_name,
            body.mls_integration_enabled,
            body.mls_provider,
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated.settings()))
}
