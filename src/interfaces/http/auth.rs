use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::domain::agent::Agent;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AuthConfig;

/// Resolves bearer tokens to the hosted identity provider's user id.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String>;
}

/// Verifier backed by the provider's token introspection endpoint.
pub struct HostedVerifier {
    client: reqwest::Client,
    verify_url: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    user_id: String,
}

impl HostedVerifier {
    pub fn new(verify_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
        }
    }
}

#[async_trait]
impl TokenVerifier for HostedVerifier {
    async fn verify(&self, token: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.verify_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Identity provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid identity provider response: {e}")))?;

        Ok(body.user_id)
    }
}

/// Single-token verifier for local development and tests.
pub struct StaticVerifier {
    token: String,
    user_id: String,
}

impl StaticVerifier {
    pub fn new(token: String, user_id: String) -> Self {
        Self { token, user_id }
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String> {
        if token == self.token {
            Ok(self.user_id.clone())
        } else {
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}

pub fn verifier_from_config(auth: &AuthConfig) -> Result<Arc<dyn TokenVerifier>> {
    if let Some(verify_url) = &auth.verify_url {
        return Ok(Arc::new(HostedVerifier::new(verify_url.clone())));
    }
    if let (Some(token), Some(user_id)) = (&auth.dev_token, &auth.dev_user_id) {
        return Ok(Arc::new(StaticVerifier::new(
            token.clone(),
            user_id.clone(),
        )));
    }
    Err(AppError::ConfigError(
        "Set auth.verify_url, or auth.dev_token and auth.dev_user_id".to_string(),
    ))
}

/// Resolve the calling agent from the Authorization header, bootstrapping
/// the agent row on first sign-in. Every authenticated route starts here.
pub async fn authenticate(state: &AppState, req: &HttpRequest) -> Result<Agent> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    let user_id = state.auth.verify(token).await?;
    state.agents.get_or_create(&user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier_accepts_only_its_token() {
        let verifier = StaticVerifier::new("dev".to_string(), "user_1".to_string());
        assert_eq!(verifier.verify("dev").await.unwrap(), "user_1");
        assert!(verifier.verify("other").await.is_err());
    }

    #[test]
    fn test_verifier_config_requires_one_mode() {
        assert!(verifier_from_config(&AuthConfig::default()).is_err());

        let dev = AuthConfig {
            verify_url: None,
            dev_token: Some("dev".to_string()),
            dev_user_id: Some("user_1".to_string()),
        };
        assert!(verifier_from_config(&dev).is_ok());
    }
}
