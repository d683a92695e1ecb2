use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::debug;

use crate::auth::tokens::mint_service_token;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

use super::{UserDirectory, UserInfo};

/// Header carrying the service-to-service token.
pub const SERVICE_TOKEN_HEADER: &str = "x-service-token";

/// Audience of service tokens minted for the user directory.
pub const USERS_SERVICE_AUDIENCE: &str = "users-service";

/// A hung directory must not hang the whole gateway; requests past this
/// deadline fail closed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the user directory service. Authenticates each call with
/// a fresh 1-minute service token.
pub struct HttpUserDirectory {
    base_url: String,
    client: reqwest::Client,
    security: SecurityConfig,
}

impl HttpUserDirectory {
    pub fn new(
        base_url: impl Into<String>,
        security: SecurityConfig,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build directory client: {e}")))?;

        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            security,
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_user_info(
        &self,
        subject: &str,
        now: SystemTime,
    ) -> Result<Option<UserInfo>, AppError> {
        let token = mint_service_token(USERS_SERVICE_AUDIENCE, now, &self.security)?;
        let url = format!("{}/internal/users/{}", self.base_url, subject);

        let response = self
            .client
            .get(&url)
            .header(SERVICE_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("user directory request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(subject_len = subject.len(), "user directory reported no such user");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "user directory returned {status}"
            )));
        }

        let user = response
            .json::<UserInfo>()
            .await
            .map_err(|e| AppError::upstream(format!("user directory returned bad payload: {e}")))?;

        Ok(Some(user))
    }
}
