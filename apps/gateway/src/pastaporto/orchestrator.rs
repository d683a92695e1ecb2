//! The issuance/refresh state machine.
//!
//! Given the inbound auth cookies, decides whether to mint an
//! unauthenticated assertion, a fresh authenticated one, silently refresh
//! the identity, or reject and revoke. This is the only layer that decides
//! whether cookies get cleared versus left untouched; codec and directory
//! errors propagate through unchanged.

use std::time::SystemTime;

use tracing::{debug, warn};

use crate::auth::claims::RefreshClaims;
use crate::auth::jwt;
use crate::auth::tokens::{decode_identity_token, decode_refresh_token, mint_identity_token};
use crate::context::RequestContext;
use crate::cookies;
use crate::directory::{UserDirectory, UserInfo};
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::state::security_config::SecurityConfig;

use super::Pastaporto;

/// Whether a verified refresh token can still mint a new identity: not
/// expired, same subject, and same auth generation as the current user
/// record.
pub fn can_refresh_identity(
    claims: &RefreshClaims,
    subject: &str,
    user: &UserInfo,
    now: SystemTime,
) -> bool {
    let not_expired = jwt::is_expired(claims.exp, now).map(|e| !e).unwrap_or(false);
    not_expired && claims.sub == subject && claims.auth_generation == user.auth_generation_id
}

/// Build the pastaporto for one inbound request.
///
/// Cookie mutations are confined to `ctx`; callers flush them to the
/// response exactly once, on success and auth-failure paths alike.
pub async fn create_pastaporto(
    ctx: &mut RequestContext,
    directory: &dyn UserDirectory,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<Pastaporto, AppError> {
    let Some(identity) = ctx.identity_token().map(str::to_owned) else {
        return Ok(Pastaporto::unauthenticated());
    };
    let refresh = ctx.refresh_token().map(str::to_owned);

    match decode_identity_token(&identity, false, now, security) {
        Ok(claims) => {
            let user = resolve_user(ctx, directory, security, &claims.sub, now).await?;

            if user.auth_generation_id != claims.auth_generation {
                warn!(
                    user_id = user.id,
                    "auth generation changed under a valid identity, revoking session"
                );
                revoke_session(ctx, security);
                return Err(AppError::not_authenticated("auth generation changed"));
            }

            Ok(Pastaporto::from_user(user))
        }
        Err(AppError::TokenExpired) => {
            refresh_identity(&identity, refresh.as_deref(), ctx, directory, security, now).await
        }
        Err(err) => Err(err),
    }
}

/// The silent-refresh path: the identity cookie is expired but otherwise
/// well-formed.
async fn refresh_identity(
    identity: &str,
    refresh: Option<&str>,
    ctx: &mut RequestContext,
    directory: &dyn UserDirectory,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<Pastaporto, AppError> {
    let Some(refresh) = refresh else {
        return Err(AppError::identity_not_valid("expired token"));
    };

    // Signature already verified above; this read only recovers the subject.
    let expired = decode_identity_token(identity, true, now, security)?;

    let claims = match decode_refresh_token(refresh, &expired.sub, now, security) {
        Ok(claims) => claims,
        Err(AppError::TokenExpired | AppError::InvalidToken { .. }) => {
            warn!(
                subject = %Redacted(&expired.sub),
                "refresh token rejected, revoking session"
            );
            revoke_session(ctx, security);
            return Err(AppError::not_authenticated("refresh token rejected"));
        }
        Err(err) => return Err(err),
    };

    let user = resolve_user(ctx, directory, security, &expired.sub, now).await?;

    if !can_refresh_identity(&claims, &expired.sub, &user, now) {
        warn!(user_id = user.id, "stale refresh token, revoking session");
        revoke_session(ctx, security);
        return Err(AppError::not_authenticated("stale refresh token"));
    }

    let token = mint_identity_token(&expired.sub, user.auth_generation_id, now, security)?;
    ctx.set_cookie(cookies::identity_cookie(&token, security.dev_mode));
    debug!(user_id = user.id, "identity silently refreshed");

    Ok(Pastaporto::from_user(user))
}

/// Fetch the user behind a verified subject. A subject the directory does
/// not know, or an inactive user, is a deliberate revocation; a directory
/// failure propagates without touching cookies.
async fn resolve_user(
    ctx: &mut RequestContext,
    directory: &dyn UserDirectory,
    security: &SecurityConfig,
    subject: &str,
    now: SystemTime,
) -> Result<UserInfo, AppError> {
    let user = directory.fetch_user_info(subject, now).await?;

    match user {
        Some(user) if user.is_active => Ok(user),
        _ => {
            warn!(
                subject = %Redacted(subject),
                "identity subject unknown or inactive, revoking session"
            );
            revoke_session(ctx, security);
            Err(AppError::not_authenticated("unknown or inactive user"))
        }
    }
}

fn revoke_session(ctx: &mut RequestContext, security: &SecurityConfig) {
    ctx.set_cookie(cookies::clear_identity_cookie(security.dev_mode));
    ctx.set_cookie(cookies::clear_refresh_cookie(security.dev_mode));
}
