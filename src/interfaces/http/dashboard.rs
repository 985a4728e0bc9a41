use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Serialize;

use super::auth::authenticate;
use super::AppState;
use crate::domain::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub client_count: i64,
    pub active_clients_count: i64,
    pub onboarding_in_progress: i64,
}

#[get("/dashboard-data")]
pub async fn dashboard_data(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;

    let client_count = data.clients.count(&agent.id).await?;
    let active_clients_count = data.clients.count_active(&agent.id).await?;
    let onboarding_in_progress = data.clients.count_onboarding_incomplete(&agent.id).await?;

    Ok(HttpResponse::Ok().json(DashboardData {
        client_count,
        active_clients_count,
        onboarding_in_progress,
    }))
}
