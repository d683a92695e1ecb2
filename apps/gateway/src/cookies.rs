//! Auth cookie constructors. All auth cookies share the same flag policy:
//! httpOnly, path `/`, SameSite=Lax, Secure unless running in dev mode.

use actix_web::cookie::SameSite;

use crate::auth::tokens::{IDENTITY_TTL_SECS, REFRESH_TTL_SECS};
use crate::context::{CookieOptions, SetCookie};

pub const IDENTITY_COOKIE: &str = "identity";
/// Inbound-only alias for the identity cookie.
pub const IDENTITY_COOKIE_V2: &str = "identity_v2";
pub const REFRESH_COOKIE: &str = "refreshIdentity";

fn auth_options(max_age: i64, dev_mode: bool) -> CookieOptions {
    CookieOptions {
        http_only: true,
        max_age,
        path: "/".to_string(),
        same_site: SameSite::Lax,
        secure: !dev_mode,
    }
}

pub fn identity_cookie(token: &str, dev_mode: bool) -> SetCookie {
    SetCookie {
        name: IDENTITY_COOKIE.to_string(),
        value: token.to_string(),
        options: auth_options(IDENTITY_TTL_SECS, dev_mode),
    }
}

pub fn refresh_cookie(token: &str, dev_mode: bool) -> SetCookie {
    SetCookie {
        name: REFRESH_COOKIE.to_string(),
        value: token.to_string(),
        options: auth_options(REFRESH_TTL_SECS, dev_mode),
    }
}

pub fn clear_identity_cookie(dev_mode: bool) -> SetCookie {
    SetCookie {
        name: IDENTITY_COOKIE.to_string(),
        value: String::new(),
        options: auth_options(-1, dev_mode),
    }
}

pub fn clear_refresh_cookie(dev_mode: bool) -> SetCookie {
    SetCookie {
        name: REFRESH_COOKIE.to_string(),
        value: String::new(),
        options: auth_options(-1, dev_mode),
    }
}
