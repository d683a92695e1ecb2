//! Action dispatch: downstream services instruct the edge to mutate auth
//! cookies by embedding a signed action token in a response header.
//!
//! The action set is closed. Extend it by adding an enum variant and a
//! match arm, never by dynamic dispatch on arbitrary strings.

use std::collections::HashMap;
use std::time::SystemTime;

use tracing::warn;

use crate::auth::tokens::{decode_action_token, mint_identity_token, mint_refresh_token};
use crate::context::RequestContext;
use crate::cookies;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Header on a downstream response that triggers dispatch.
pub const ACTION_HEADER: &str = "x-pastaporto-action";

pub const ACTION_AUTH: &str = "auth";
pub const ACTION_CLEAR_AUTH: &str = "clear-auth";

/// Log the user in at the edge: mint a fresh identity token for the subject
/// in the payload and set the identity cookie.
#[derive(Debug)]
pub struct AuthAction {
    payload: HashMap<String, String>,
    identity_only: bool,
}

impl AuthAction {
    pub fn new(payload: HashMap<String, String>, identity_only: bool) -> Self {
        Self {
            payload,
            identity_only,
        }
    }

    pub fn apply(
        &self,
        ctx: &mut RequestContext,
        now: SystemTime,
        security: &SecurityConfig,
    ) -> Result<(), AppError> {
        let sub = self
            .payload
            .get("id")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::invalid_token("auth action payload missing id"))?;
        let auth_generation = self
            .payload
            .get("auth_generation")
            .ok_or_else(|| AppError::invalid_token("auth action payload missing auth_generation"))?
            .parse::<i64>()
            .map_err(|_| AppError::invalid_token("auth action payload has malformed auth_generation"))?;

        let identity = mint_identity_token(sub, auth_generation, now, security)?;
        ctx.set_cookie(cookies::identity_cookie(&identity, security.dev_mode));

        if !self.identity_only {
            let refresh = mint_refresh_token(sub, auth_generation, now, security)?;
            ctx.set_cookie(cookies::refresh_cookie(&refresh, security.dev_mode));
        }

        Ok(())
    }
}

/// Log the user out at the edge: expire both auth cookies.
#[derive(Debug)]
pub struct ClearAuthAction;

impl ClearAuthAction {
    pub fn apply(&self, ctx: &mut RequestContext, security: &SecurityConfig) {
        ctx.set_cookie(cookies::clear_identity_cookie(security.dev_mode));
        ctx.set_cookie(cookies::clear_refresh_cookie(security.dev_mode));
    }
}

/// The closed set of actions a downstream service may request.
#[derive(Debug)]
pub enum PastaportoAction {
    Auth(AuthAction),
    ClearAuth(ClearAuthAction),
}

impl PastaportoAction {
    /// Decode a signed action token and map its discriminator to a concrete
    /// action. Unknown discriminators fail with `UnsupportedAction` and
    /// perform no side effects.
    pub fn from_token(
        token: &str,
        now: SystemTime,
        security: &SecurityConfig,
    ) -> Result<Self, AppError> {
        let claims = decode_action_token(token, now, security)?;

        match claims.action.as_str() {
            ACTION_AUTH => Ok(Self::Auth(AuthAction::new(
                claims.payload,
                claims.options.identity_only,
            ))),
            ACTION_CLEAR_AUTH => Ok(Self::ClearAuth(ClearAuthAction)),
            other => Err(AppError::unsupported_action(other)),
        }
    }

    pub fn apply(
        &self,
        ctx: &mut RequestContext,
        now: SystemTime,
        security: &SecurityConfig,
    ) -> Result<(), AppError> {
        match self {
            PastaportoAction::Auth(action) => action.apply(ctx, now, security),
            PastaportoAction::ClearAuth(action) => {
                action.apply(ctx, security);
                Ok(())
            }
        }
    }
}

/// Apply every action token exactly once, in the order the responses were
/// processed. A token that fails to decode or apply is dropped with a
/// warning; it never aborts the response pipeline.
pub fn dispatch_all<'a>(
    tokens: impl Iterator<Item = &'a str>,
    ctx: &mut RequestContext,
    now: SystemTime,
    security: &SecurityConfig,
) {
    for token in tokens {
        let outcome = PastaportoAction::from_token(token, now, security)
            .and_then(|action| action.apply(ctx, now, security));
        if let Err(err) = outcome {
            warn!(error = %err, "dropping pastaporto action");
        }
    }
}
