//! User directory lookup.
//!
//! The directory is an external collaborator, but its contract is part of
//! the gateway's correctness: user info is fetched fresh on every pastaporto
//! construction and never cached across requests.

pub mod http;

use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use http::HttpUserDirectory;

/// Read-only snapshot of a user record, as reported by the directory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    /// Opaque counter bumped when prior sessions must be invalidated
    /// (e.g. password change).
    pub auth_generation_id: i64,
}

/// Resolves an identity subject to the current user record.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the user for the given subject id. `Ok(None)` means the
    /// directory authoritatively knows no such user; transport failures
    /// propagate as errors and abort pastaporto construction.
    async fn fetch_user_info(
        &self,
        subject: &str,
        now: SystemTime,
    ) -> Result<Option<UserInfo>, AppError>;
}
