//! Environment configuration, read once at startup.
//!
//! Secrets are loaded here into an immutable value and injected into the
//! codec and orchestrator; business logic never reads the environment.

use std::env;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub identity_secret: String,
    pub pastaporto_secret: String,
    pub pastaporto_action_secret: String,
    pub service_to_service_secret: String,
    /// Base URL of the user directory service
    pub users_service_url: String,
    /// URL of the federated downstream GraphQL service
    pub downstream_graphql_url: String,
    pub dev_mode: bool,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::config("GATEWAY_PORT must be a valid port number"))?,
            identity_secret: require("IDENTITY_SECRET")?,
            pastaporto_secret: require("PASTAPORTO_SECRET")?,
            pastaporto_action_secret: require("PASTAPORTO_ACTION_SECRET")?,
            service_to_service_secret: require("SERVICE_TO_SERVICE_SECRET")?,
            users_service_url: require("USERS_SERVICE_URL")?,
            downstream_graphql_url: require("DOWNSTREAM_GRAPHQL_URL")?,
            dev_mode: env::var("GATEWAY_ENV")
                .map(|v| v == "local" || v == "dev")
                .unwrap_or(false),
        })
    }

    /// The immutable signing configuration handed to the auth core.
    pub fn security(&self) -> SecurityConfig {
        SecurityConfig::new(
            self.identity_secret.as_bytes(),
            self.pastaporto_secret.as_bytes(),
            self.pastaporto_action_secret.as_bytes(),
            self.service_to_service_secret.as_bytes(),
            self.dev_mode,
        )
    }
}

fn require(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::config(format!("{name} must be set")))
}
