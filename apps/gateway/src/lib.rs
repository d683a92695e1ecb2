#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod actions;
pub mod auth;
pub mod config;
pub mod context;
pub mod cookies;
pub mod directory;
pub mod error;
pub mod errors;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod pastaporto;
pub mod routes;
pub mod state;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use actions::{AuthAction, ClearAuthAction, PastaportoAction};
pub use auth::tokens::{
    decode_identity_token, decode_refresh_token, mint_identity_token, mint_refresh_token,
};
pub use config::GatewayConfig;
pub use context::{RequestContext, SetCookie};
pub use directory::{HttpUserDirectory, UserDirectory, UserInfo};
pub use error::AppError;
pub use errors::ErrorCode;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use pastaporto::orchestrator::{can_refresh_identity, create_pastaporto};
pub use pastaporto::{Credential, Pastaporto};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Prelude for test convenience
pub mod prelude {
    pub use super::actions::*;
    pub use super::auth::tokens::*;
    pub use super::context::*;
    pub use super::cookies::*;
    pub use super::directory::*;
    pub use super::error::*;
    pub use super::pastaporto::*;
    pub use super::state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
