use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use url::Url;

use crate::domain::error::{AppError, Result};

/// Runtime configuration, read from `agentpro.toml` and then overridden by
/// `AGENTPRO_*` environment variables (`AGENTPRO_AUTH__DEV_TOKEN` style for
/// nested keys).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Public origin used when building client-facing onboarding URLs.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Identity provider endpoint that resolves bearer tokens to user ids.
    pub verify_url: Option<String>,
    /// Development fallback: accept this single token for this user id.
    pub dev_token: Option<String>,
    pub dev_user_id: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_database_url() -> String {
    "sqlite://agentpro.db".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file("agentpro.toml"))
            .merge(Env::prefixed("AGENTPRO_").split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;

        Url::parse(&config.app_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid app_url {}: {}", config.app_url, e)))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_as_urls() {
        assert!(Url::parse(&default_app_url()).is_ok());
    }
}
