//! HS256 encode/verify core shared by every token kind.
//!
//! Expiry is never delegated to the JWT library: all expiry checks compare
//! the `exp` claim against an explicitly injected `now`, so state-machine
//! transitions stay deterministic under test. Library validation is pinned
//! to signature, algorithm, issuer and audience only.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;

/// Seconds since the Unix epoch for an injected clock value.
pub fn unix_seconds(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("Failed to read current time"))
}

/// A token is expired from its exact expiry second onward.
pub fn is_expired(exp: i64, now: SystemTime) -> Result<bool, AppError> {
    Ok(unix_seconds(now)? >= exp)
}

/// Sign claims with the given symmetric secret.
pub fn encode_claims<C: Serialize>(
    claims: &C,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<String, AppError> {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature, algorithm, issuer and audience, and deserialize claims.
///
/// Expiry is NOT checked here; callers compare the `exp` claim against their
/// injected clock via [`is_expired`].
pub fn decode_claims<C: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    algorithm: Algorithm,
    issuer: &str,
    audience: &str,
) -> Result<C, AppError> {
    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);
    validation.validate_exp = false;

    decode::<C>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(map_decode_error)
}

/// Verify signature and algorithm only, for token kinds without pinned
/// issuer/audience claims (action tokens, pastaporto assertions).
pub fn decode_signed<C: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<C, AppError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;

    decode::<C>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(map_decode_error)
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AppError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AppError::token_expired(),
        ErrorKind::InvalidSignature => AppError::invalid_token("invalid signature"),
        ErrorKind::InvalidAlgorithm => AppError::invalid_token("disallowed algorithm"),
        ErrorKind::InvalidIssuer => AppError::invalid_token("issuer mismatch"),
        ErrorKind::InvalidAudience => AppError::invalid_token("audience mismatch"),
        _ => AppError::invalid_token("malformed token"),
    }
}
