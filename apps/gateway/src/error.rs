use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{json, Value};
use thiserror::Error;

use crate::errors::ErrorCode;

/// Application error type for the gateway.
///
/// The auth-related variants map 1:1 to the failure modes of the pastaporto
/// state machine. Who clears cookies on which failure is decided by the
/// orchestrator alone; this type only carries the outcome.
#[derive(Error, Debug)]
pub enum AppError {
    /// Attempted to mint an identity/refresh token with an empty subject.
    #[error("Invalid subject: {detail}")]
    InvalidSubject { detail: String },
    /// Only the expiry check failed. Distinct from `InvalidToken` so the
    /// orchestrator can attempt the refresh flow.
    #[error("Token expired")]
    TokenExpired,
    /// Bad signature, wrong issuer/audience/subject, or disallowed algorithm.
    /// Treated as tampering; always fails closed.
    #[error("Invalid token: {detail}")]
    InvalidToken { detail: String },
    /// Expired identity with no usable refresh token. Cookies are left alone.
    #[error("Identity not valid: {detail}")]
    IdentityNotValid { detail: String },
    /// Refresh failed or the session was deliberately revoked. Cookies are
    /// actively cleared when this is returned by the orchestrator.
    #[error("Not authenticated: {detail}")]
    NotAuthenticated { detail: String },
    /// Unknown action discriminator in an action token.
    #[error("Unsupported action: {action}")]
    UnsupportedAction { action: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Upstream error: {detail}")]
    Upstream { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Canonical error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidSubject { .. } => ErrorCode::InvalidSubject,
            AppError::TokenExpired => ErrorCode::TokenExpired,
            AppError::InvalidToken { .. } => ErrorCode::InvalidToken,
            AppError::IdentityNotValid { .. } => ErrorCode::IdentityNotValid,
            AppError::NotAuthenticated { .. } => ErrorCode::NotAuthenticated,
            AppError::UnsupportedAction { .. } => ErrorCode::UnsupportedAction,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Upstream { .. } => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Human-readable detail for the response payload.
    pub fn detail(&self) -> String {
        match self {
            AppError::InvalidSubject { detail } => detail.clone(),
            AppError::TokenExpired => "Token expired".to_string(),
            AppError::InvalidToken { detail } => detail.clone(),
            AppError::IdentityNotValid { detail } => detail.clone(),
            AppError::NotAuthenticated { detail } => detail.clone(),
            AppError::UnsupportedAction { action } => {
                format!("Unsupported action: {action}")
            }
            AppError::Config { detail } => detail.clone(),
            AppError::Upstream { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
        }
    }

    /// Authentication failures surface as a GraphQL error payload on HTTP
    /// 200; callers must inspect `extensions.code`, not the HTTP status.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TokenExpired
            | AppError::InvalidToken { .. }
            | AppError::IdentityNotValid { .. }
            | AppError::NotAuthenticated { .. }
            | AppError::UnsupportedAction { .. } => StatusCode::OK,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::InvalidSubject { .. }
            | AppError::Config { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for the failure modes of the auth state machine. These must be
    /// answered with a cookie-flushed GraphQL error response.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::TokenExpired
                | AppError::InvalidToken { .. }
                | AppError::IdentityNotValid { .. }
                | AppError::NotAuthenticated { .. }
        )
    }

    /// GraphQL error payload (HTTP body) for this error.
    pub fn to_graphql_body(&self) -> Value {
        json!({
            "data": null,
            "errors": [{
                "message": self.detail(),
                "extensions": { "code": self.code().as_str() },
            }],
        })
    }

    pub fn invalid_subject(detail: impl Into<String>) -> Self {
        Self::InvalidSubject {
            detail: detail.into(),
        }
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken {
            detail: detail.into(),
        }
    }

    pub fn identity_not_valid(detail: impl Into<String>) -> Self {
        Self::IdentityNotValid {
            detail: detail.into(),
        }
    }

    pub fn not_authenticated(detail: impl Into<String>) -> Self {
        Self::NotAuthenticated {
            detail: detail.into(),
        }
    }

    pub fn unsupported_action(action: impl Into<String>) -> Self {
        Self::UnsupportedAction {
            action: action.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::Upstream {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status())
            .content_type("application/json")
            .json(self.to_graphql_body())
    }
}
