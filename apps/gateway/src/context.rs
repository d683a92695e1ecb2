//! Per-request context: inbound auth cookies and the outbound cookie
//! accumulator.
//!
//! Cookie mutations are collected here and flushed to the HTTP response in
//! one explicit call at the boundary; dropping an unflushed context discards
//! them atomically. This keeps the auth core framework-agnostic and lets it
//! run identically in a long-lived server or a single-invocation handler.

use actix_web::cookie::{Cookie, SameSite};
use time::Duration;
use actix_web::{HttpRequest, HttpResponseBuilder};

use crate::cookies::{IDENTITY_COOKIE, IDENTITY_COOKIE_V2, REFRESH_COOKIE};

/// Attributes of a pending cookie mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    /// Max-Age in seconds; negative expires the cookie immediately
    pub max_age: i64,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
}

/// A pending cookie mutation, ordered by insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

/// Request-scoped state for one inbound request.
#[derive(Debug, Default)]
pub struct RequestContext {
    identity_token: Option<String>,
    refresh_token: Option<String>,
    set_cookies: Vec<SetCookie>,
}

impl RequestContext {
    pub fn new(identity_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            identity_token,
            refresh_token,
            set_cookies: Vec::new(),
        }
    }

    /// Read auth cookies off the inbound request. The `identity_v2` name is
    /// preferred; the historical `identity` name is still honored.
    pub fn from_request(req: &HttpRequest) -> Self {
        let identity = req
            .cookie(IDENTITY_COOKIE_V2)
            .or_else(|| req.cookie(IDENTITY_COOKIE))
            .map(|c| c.value().to_string());
        let refresh = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());

        Self::new(identity, refresh)
    }

    pub fn identity_token(&self) -> Option<&str> {
        self.identity_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Queue a cookie mutation for the outbound response.
    pub fn set_cookie(&mut self, cookie: SetCookie) {
        self.set_cookies.push(cookie);
    }

    pub fn set_cookies(&self) -> &[SetCookie] {
        &self.set_cookies
    }

    /// Apply all pending cookie mutations to the response. Consumes the
    /// context: flushing happens exactly once per request.
    pub fn flush(self, builder: &mut HttpResponseBuilder) {
        for sc in self.set_cookies {
            builder.cookie(
                Cookie::build(sc.name, sc.value)
                    .http_only(sc.options.http_only)
                    .secure(sc.options.secure)
                    .same_site(sc.options.same_site)
                    .path(sc.options.path)
                    .max_age(Duration::seconds(sc.options.max_age))
                    .finish(),
            );
        }
    }
}
