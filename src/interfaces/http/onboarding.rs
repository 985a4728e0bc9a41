use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use super::auth::authenticate;
use super::AppState;
use crate::application::use_cases::onboarding::{IntakePreferences, NewClientInput};
use crate::domain::error::{AppError, Result};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOnboardingRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[post("/clients/create-onboarding")]
pub async fn create_onboarding(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateOnboardingRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let created = data
        .onboarding
        .create_link(
            &agent,
            NewClientInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                phone_number: body.phone_number,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(created))
}

// Public, token-scoped routes used by the client-facing onboarding pages.

#[get("/validate-onboarding-token/{token}")]
pub async fn validate_token(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let validation = data.onboarding.validate_token(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(validation))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeSubmitRequest {
    pub token: String,
    #[serde(default)]
    pub preferences: IntakePreferences,
}

#[post("/intake-submit")]
pub async fn intake_submit(
    data: web::Data<AppState>,
    body: web::Json<IntakeSubmitRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    data.onboarding
        .submit_intake(&body.token, body.preferences)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
