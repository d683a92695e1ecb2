//! Mint and decode operations for each token kind.

use std::collections::HashMap;
use std::time::SystemTime;

use super::claims::{ActionClaims, ActionOptions, IdentityClaims, RefreshClaims, ServiceClaims};
use super::jwt;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

pub const ISSUER: &str = "gateway";
pub const AUDIENCE_IDENTITY: &str = "identity";
pub const AUDIENCE_REFRESH: &str = "refresh";

/// Identity tokens live for 15 minutes.
pub const IDENTITY_TTL_SECS: i64 = 15 * 60;
/// Refresh tokens live for 84 days.
pub const REFRESH_TTL_SECS: i64 = 84 * 86_400;
/// Service-to-service tokens live for 1 minute.
pub const SERVICE_TTL_SECS: i64 = 60;
/// Action tokens live for 1 minute.
pub const ACTION_TTL_SECS: i64 = 60;

/// Mint a HS256 identity token for the given subject.
///
/// Fails with `InvalidSubject` if the subject is empty.
pub fn mint_identity_token(
    sub: &str,
    auth_generation: i64,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if sub.is_empty() {
        return Err(AppError::invalid_subject(
            "identity token subject must not be empty",
        ));
    }

    let iat = jwt::unix_seconds(now)?;
    let claims = IdentityClaims {
        sub: sub.to_string(),
        iss: ISSUER.to_string(),
        aud: AUDIENCE_IDENTITY.to_string(),
        iat,
        exp: iat + IDENTITY_TTL_SECS,
        auth_generation,
    };

    jwt::encode_claims(&claims, &security.identity_secret, security.algorithm)
}

/// Verify an identity token and return its claims.
///
/// `ignore_expiration` is used only by the refresh path to read a
/// still-identifiable-but-expired identity; signature, issuer and audience
/// are always enforced.
pub fn decode_identity_token(
    token: &str,
    ignore_expiration: bool,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<IdentityClaims, AppError> {
    let claims: IdentityClaims = jwt::decode_claims(
        token,
        &security.identity_secret,
        security.algorithm,
        ISSUER,
        AUDIENCE_IDENTITY,
    )?;

    if !ignore_expiration && jwt::is_expired(claims.exp, now)? {
        return Err(AppError::token_expired());
    }

    Ok(claims)
}

/// Mint a HS256 refresh token for the given subject.
pub fn mint_refresh_token(
    sub: &str,
    auth_generation: i64,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if sub.is_empty() {
        return Err(AppError::invalid_subject(
            "refresh token subject must not be empty",
        ));
    }

    let iat = jwt::unix_seconds(now)?;
    let claims = RefreshClaims {
        sub: sub.to_string(),
        iss: ISSUER.to_string(),
        aud: AUDIENCE_REFRESH.to_string(),
        iat,
        exp: iat + REFRESH_TTL_SECS,
        auth_generation,
    };

    jwt::encode_claims(&claims, &security.identity_secret, security.algorithm)
}

/// Verify a refresh token and additionally enforce that it belongs to
/// `expected_subject`.
pub fn decode_refresh_token(
    token: &str,
    expected_subject: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<RefreshClaims, AppError> {
    let claims: RefreshClaims = jwt::decode_claims(
        token,
        &security.identity_secret,
        security.algorithm,
        ISSUER,
        AUDIENCE_REFRESH,
    )?;

    if jwt::is_expired(claims.exp, now)? {
        return Err(AppError::token_expired());
    }

    if claims.sub != expected_subject {
        return Err(AppError::invalid_token("subject mismatch"));
    }

    Ok(claims)
}

/// Mint a short-lived service-to-service token; the audience names the
/// callee service.
pub fn mint_service_token(
    audience: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = jwt::unix_seconds(now)?;
    let claims = ServiceClaims {
        iss: ISSUER.to_string(),
        aud: audience.to_string(),
        iat,
        exp: iat + SERVICE_TTL_SECS,
    };

    jwt::encode_claims(&claims, &security.service_secret, security.algorithm)
}

/// Mint an action token the way a downstream service would. Used by tests
/// and by downstream SDK code sharing this crate.
pub fn mint_action_token(
    action: &str,
    payload: HashMap<String, String>,
    options: ActionOptions,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = jwt::unix_seconds(now)?;
    let claims = ActionClaims {
        action: action.to_string(),
        payload,
        options,
        iat,
        exp: iat + ACTION_TTL_SECS,
    };

    jwt::encode_claims(&claims, &security.action_secret, security.algorithm)
}

/// Verify an action token with the dedicated action secret and return its
/// raw claims. Discriminator mapping happens in `actions`.
pub fn decode_action_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<ActionClaims, AppError> {
    let claims: ActionClaims =
        jwt::decode_signed(token, &security.action_secret, security.algorithm)?;

    if jwt::is_expired(claims.exp, now)? {
        return Err(AppError::token_expired());
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{
        decode_identity_token, decode_refresh_token, mint_identity_token, mint_refresh_token,
        mint_service_token, IDENTITY_TTL_SECS,
    };
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn test_mint_and_decode_roundtrip() {
        let security = SecurityConfig::for_tests();

        let token = mint_identity_token("42", 7, at(NOW), &security).unwrap();
        let claims = decode_identity_token(&token, false, at(NOW), &security).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.auth_generation, 7);
        assert_eq!(claims.iat, NOW as i64);
        assert_eq!(claims.exp, NOW as i64 + IDENTITY_TTL_SECS);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let security = SecurityConfig::for_tests();

        let identity = mint_identity_token("", 0, at(NOW), &security);
        assert!(matches!(identity, Err(AppError::InvalidSubject { .. })));

        let refresh = mint_refresh_token("", 0, at(NOW), &security);
        assert!(matches!(refresh, Err(AppError::InvalidSubject { .. })));
    }

    #[test]
    fn test_identity_valid_until_expiry_boundary() {
        let security = SecurityConfig::for_tests();
        let token = mint_identity_token("42", 7, at(NOW), &security).unwrap();

        // One second before expiry the token still verifies.
        let just_before = at(NOW + IDENTITY_TTL_SECS as u64 - 1);
        assert!(decode_identity_token(&token, false, just_before, &security).is_ok());

        // At the exact boundary it is expired.
        let boundary = at(NOW + IDENTITY_TTL_SECS as u64);
        let result = decode_identity_token(&token, false, boundary, &security);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_ignore_expiration_reads_expired_identity() {
        let security = SecurityConfig::for_tests();
        let token = mint_identity_token("42", 7, at(NOW), &security).unwrap();

        let much_later = at(NOW + 3_600);
        let claims = decode_identity_token(&token, true, much_later, &security).unwrap();
        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_bad_signature_rejected_even_ignoring_expiry() {
        let security_a = SecurityConfig::new(b"secret-A".to_vec(), b"p".to_vec(), b"a".to_vec(), b"s".to_vec(), false);
        let security_b = SecurityConfig::new(b"secret-B".to_vec(), b"p".to_vec(), b"a".to_vec(), b"s".to_vec(), false);

        let token = mint_identity_token("42", 7, at(NOW), &security_a).unwrap();

        let strict = decode_identity_token(&token, false, at(NOW), &security_b);
        assert!(matches!(strict, Err(AppError::InvalidToken { .. })));

        let lenient = decode_identity_token(&token, true, at(NOW), &security_b);
        assert!(matches!(lenient, Err(AppError::InvalidToken { .. })));
    }

    #[test]
    fn test_refresh_subject_mismatch_rejected() {
        let security = SecurityConfig::for_tests();
        let token = mint_refresh_token("42", 7, at(NOW), &security).unwrap();

        let result = decode_refresh_token(&token, "43", at(NOW), &security);
        assert!(matches!(result, Err(AppError::InvalidToken { .. })));
    }

    #[test]
    fn test_refresh_expired() {
        let security = SecurityConfig::for_tests();
        let token = mint_refresh_token("42", 7, at(NOW), &security).unwrap();

        let after_84_days = at(NOW + 84 * 86_400);
        let result = decode_refresh_token(&token, "42", after_84_days, &security);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_cross_audience_rejected_both_ways() {
        let security = SecurityConfig::for_tests();

        let identity = mint_identity_token("42", 7, at(NOW), &security).unwrap();
        let refresh = mint_refresh_token("42", 7, at(NOW), &security).unwrap();

        let as_refresh = decode_refresh_token(&identity, "42", at(NOW), &security);
        assert!(matches!(as_refresh, Err(AppError::InvalidToken { .. })));

        let as_identity = decode_identity_token(&refresh, false, at(NOW), &security);
        assert!(matches!(as_identity, Err(AppError::InvalidToken { .. })));
    }

    #[test]
    fn test_service_token_names_the_callee() {
        let security = SecurityConfig::for_tests();
        let token = mint_service_token("users-service", at(NOW), &security).unwrap();

        let claims: super::ServiceClaims = crate::auth::jwt::decode_claims(
            &token,
            &security.service_secret,
            security.algorithm,
            super::ISSUER,
            "users-service",
        )
        .unwrap();
        assert_eq!(claims.exp, claims.iat + super::SERVICE_TTL_SECS);
    }
}
