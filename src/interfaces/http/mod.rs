pub mod auth;
pub mod checklists;
pub mod clients;
pub mod dashboard;
pub mod import;
pub mod onboarding;
pub mod settings;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, ResponseError};
use std::sync::Arc;

use crate::application::{
    BatchImportUseCase, ChecklistUseCase, OnboardingUseCase, UpdatePreferencesUseCase,
};
use crate::domain::error::AppError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::agents::AgentRepository;
use crate::infrastructure::db::checklists::ChecklistRepository;
use crate::infrastructure::db::clients::ClientRepository;
use crate::infrastructure::db::preferences::PreferenceRepository;

pub struct AppState {
    pub config: AppConfig,
    pub auth: Arc<dyn auth::TokenVerifier>,
    pub agents: Arc<AgentRepository>,
    pub clients: Arc<ClientRepository>,
    pub preferences: Arc<PreferenceRepository>,
    pub checklist_repo: Arc<ChecklistRepository>,
    pub batch_import: BatchImportUseCase,
    pub onboarding: OnboardingUseCase,
    pub update_preferences: UpdatePreferencesUseCase,
    pub checklists: ChecklistUseCase,
}

// Map errors onto HTTP responses so handlers can bubble with `?`. Bodies
// follow the `{"error": ...}` shape the web client expects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) | AppError::ParseError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigError(_)
            | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

pub fn start_server(state: AppState) -> std::io::Result<Server> {
    let bind_address = state.config.bind_address.clone();
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // The web client owns its own origin checks

        App::new().wrap(cors).app_data(data.clone()).service(
            web::scope("/api")
                .service(
                    web::scope("/agents")
                        .service(import::parse_paste)
                        .service(import::parse_file)
                        .service(import::batch_import)
                        .service(onboarding::create_onboarding)
                        .service(clients::update_client_preferences)
                        .service(clients::list_clients)
                        .service(checklists::assign_checklist)
                        .service(checklists::toggle_checklist_item)
                        .service(clients::get_client)
                        .service(checklists::list_checklists)
                        .service(checklists::create_checklist)
                        .service(checklists::create_from_template)
                        .service(checklists::reorder_checklist)
                        .service(checklists::delete_checklist)
                        .service(checklists::get_checklist)
                        .service(settings::get_settings)
                        .service(settings::update_settings)
                        .service(dashboard::dashboard_data),
                )
                .service(
                    web::scope("/clients")
                        .service(onboarding::validate_token)
                        .service(onboarding::intake_submit),
                ),
        )
    })
    .bind(bind_address)?
    .run();

    Ok(server)
}
