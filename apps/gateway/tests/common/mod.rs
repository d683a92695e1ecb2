#![allow(dead_code)]

//! Shared fixtures: fixed clock, fixture secrets, and a mock user directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use gateway::directory::{UserDirectory, UserInfo};
use gateway::error::AppError;
use gateway::state::security_config::SecurityConfig;

/// Fixed base instant for deterministic expiry checks.
pub const BASE_SECS: u64 = 1_700_000_000;

pub fn fixed_now() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(BASE_SECS)
}

/// The fixed instant shifted by `secs` (may be negative).
pub fn at_offset(secs: i64) -> SystemTime {
    if secs >= 0 {
        fixed_now() + Duration::from_secs(secs as u64)
    } else {
        fixed_now() - Duration::from_secs(secs.unsigned_abs())
    }
}

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(
        "identity_secret_for_testing_purposes_only".as_bytes(),
        "pastaporto_secret_for_testing_purposes_only".as_bytes(),
        "action_secret_for_testing_purposes_only".as_bytes(),
        "service_secret_for_testing_purposes_only".as_bytes(),
        false,
    )
}

/// Security config with unrelated secrets, for tamper scenarios.
pub fn other_security() -> SecurityConfig {
    SecurityConfig::new(
        "a_completely_different_identity_secret".as_bytes(),
        "a_completely_different_pastaporto_secret".as_bytes(),
        "a_completely_different_action_secret".as_bytes(),
        "a_completely_different_service_secret".as_bytes(),
        false,
    )
}

pub fn test_user(id: i64, auth_generation_id: i64) -> UserInfo {
    UserInfo {
        id,
        email: format!("user{id}@example.com"),
        is_staff: false,
        is_active: true,
        auth_generation_id,
    }
}

pub fn staff_user(id: i64, auth_generation_id: i64) -> UserInfo {
    UserInfo {
        is_staff: true,
        ..test_user(id, auth_generation_id)
    }
}

/// In-memory user directory with a call counter, so tests can assert both
/// lookup results and the "no directory call" transitions.
#[derive(Default)]
pub struct MockDirectory {
    users: HashMap<String, UserInfo>,
    calls: AtomicUsize,
    fail: bool,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory whose every lookup fails at the transport level.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_user(mut self, subject: &str, user: UserInfo) -> Self {
        self.users.insert(subject.to_string(), user);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn fetch_user_info(
        &self,
        subject: &str,
        _now: SystemTime,
    ) -> Result<Option<UserInfo>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::upstream("user directory unavailable"));
        }
        Ok(self.users.get(subject).cloned())
    }
}
