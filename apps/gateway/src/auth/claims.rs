//! Claim structures for every token kind the gateway signs or verifies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claims of the short-lived identity token stored in the browser cookie.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdentityClaims {
    /// User id as a string
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Auth generation of the user record at mint time. A mismatch against
    /// the user's current generation invalidates the session.
    pub auth_generation: i64,
}

/// Claims of the long-lived refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub auth_generation: i64,
}

/// Claims of the short-lived service-to-service token sent to the user
/// directory as `x-service-token`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceClaims {
    pub iss: String,
    /// Audience names the callee service
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Options a downstream service may attach to an action token.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ActionOptions {
    /// When false the auth action also sets a refresh cookie. Downstreams
    /// omit this in practice, so the identity cookie is the only mutation.
    #[serde(rename = "identityOnly", default = "default_identity_only")]
    pub identity_only: bool,
}

fn default_identity_only() -> bool {
    true
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self { identity_only: true }
    }
}

/// Raw claims of an action token minted by a downstream service. The
/// `action` discriminator is mapped to a concrete action variant by
/// `actions::PastaportoAction::from_token`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActionClaims {
    pub action: String,
    #[serde(default)]
    pub payload: HashMap<String, String>,
    #[serde(default)]
    pub options: ActionOptions,
    pub iat: i64,
    pub exp: i64,
}
