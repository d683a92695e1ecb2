//! The pastaporto assertion: a derived, short-lived, signed claim bundle
//! handed to downstream federated services.

pub mod orchestrator;

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::auth::tokens::ISSUER;
use crate::directory::UserInfo;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Pastaporto assertions live for 1 minute.
pub const PASTAPORTO_TTL_SECS: i64 = 60;

/// Credentials granted to a request, derived deterministically from the
/// resolved user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credential {
    Authenticated,
    Staff,
}

/// Subset of the user record forwarded to downstream services.
/// `isActive` and the auth generation are gateway-internal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PastaportoUserInfo {
    pub id: i64,
    pub email: String,
    pub is_staff: bool,
}

/// Signed claims of a pastaporto assertion.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PastaportoClaims {
    #[serde(rename = "userInfo")]
    pub user_info: Option<PastaportoUserInfo>,
    pub credentials: Vec<Credential>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// The per-request identity assertion. Constructed once per inbound request,
/// signed once, forwarded, then discarded.
#[derive(Debug, Clone)]
pub struct Pastaporto {
    pub user_info: Option<UserInfo>,
    pub credentials: Vec<Credential>,
}

impl Pastaporto {
    /// The assertion for a request with no (usable) identity. Pure, no I/O.
    pub fn unauthenticated() -> Self {
        Self {
            user_info: None,
            credentials: Vec::new(),
        }
    }

    /// Derive the assertion for a verified user. Credentials are emitted in
    /// a fixed order so signing stays deterministic.
    pub fn from_user(user: UserInfo) -> Self {
        let mut credentials = vec![Credential::Authenticated];
        if user.is_staff {
            credentials.push(Credential::Staff);
        }

        Self {
            user_info: Some(user),
            credentials,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.contains(&Credential::Authenticated)
    }

    /// Sign the assertion for forwarding as the `x-pastaporto` header.
    pub fn sign(&self, now: SystemTime, security: &SecurityConfig) -> Result<String, AppError> {
        let iat = jwt::unix_seconds(now)?;
        let claims = PastaportoClaims {
            user_info: self.user_info.as_ref().map(|u| PastaportoUserInfo {
                id: u.id,
                email: u.email.clone(),
                is_staff: u.is_staff,
            }),
            credentials: self.credentials.clone(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + PASTAPORTO_TTL_SECS,
        };

        jwt::encode_claims(&claims, &security.pastaporto_secret, security.algorithm)
    }
}

/// Verify a pastaporto assertion the way a downstream service would.
pub fn decode_pastaporto(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<PastaportoClaims, AppError> {
    let claims: PastaportoClaims =
        jwt::decode_signed(token, &security.pastaporto_secret, security.algorithm)?;

    if claims.iss != ISSUER {
        return Err(AppError::invalid_token("issuer mismatch"));
    }
    if jwt::is_expired(claims.exp, now)? {
        return Err(AppError::token_expired());
    }

    Ok(claims)
}
