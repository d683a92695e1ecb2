use std::sync::Arc;

use crate::directory::UserDirectory;

use super::security_config::SecurityConfig;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including all token secrets
    pub security: SecurityConfig,
    /// User directory used to resolve identity subjects
    pub directory: Arc<dyn UserDirectory>,
    /// URL of the federated downstream GraphQL service
    pub downstream_url: String,
    /// Shared HTTP client for proxying to the downstream service
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        directory: Arc<dyn UserDirectory>,
        downstream_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            security,
            directory,
            downstream_url: downstream_url.into(),
            http,
        }
    }
}
