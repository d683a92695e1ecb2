//! Error codes for the gateway API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in GraphQL error extensions.

use core::fmt;

/// Centralized error codes for the gateway API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in the `extensions.code` field of GraphQL error payloads. Clients dispatch
/// on these strings, so they are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Token minting & verification
    /// Attempted to mint a token with an empty subject
    InvalidSubject,
    /// Token is past its expiry (refresh may still be possible)
    TokenExpired,
    /// Bad signature, wrong issuer/audience/subject, or disallowed algorithm
    InvalidToken,

    // Session state
    /// Expired identity with no usable refresh token
    IdentityNotValid,
    /// Refresh rejected or session deliberately revoked
    NotAuthenticated,

    // Action dispatch
    /// Unknown action discriminator in an action token
    UnsupportedAction,

    // System errors
    /// Configuration error
    ConfigError,
    /// Upstream service (user directory / federated service) failure
    UpstreamError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Canonical wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSubject => "INVALID_SUBJECT",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::IdentityNotValid => "IDENTITY_NOT_VALID",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::UnsupportedAction => "UNSUPPORTED_ACTION",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// All codes, for exhaustiveness checks in tests.
    pub fn all() -> &'static [ErrorCode] {
        &[
            ErrorCode::InvalidSubject,
            ErrorCode::TokenExpired,
            ErrorCode::InvalidToken,
            ErrorCode::IdentityNotValid,
            ErrorCode::NotAuthenticated,
            ErrorCode::UnsupportedAction,
            ErrorCode::ConfigError,
            ErrorCode::UpstreamError,
            ErrorCode::Internal,
        ]
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
