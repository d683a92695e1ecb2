use jsonwebtoken::Algorithm;

/// Signing material and policy flags for every token kind the gateway
/// handles. Loaded once at startup and treated as immutable for the process
/// lifetime; business logic only ever sees an injected copy.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for identity and refresh tokens (audience separates them)
    pub identity_secret: Vec<u8>,
    /// Secret for the pastaporto assertion forwarded to federated services
    pub pastaporto_secret: Vec<u8>,
    /// Secret shared with downstream services for action tokens
    pub action_secret: Vec<u8>,
    /// Secret for service-to-service tokens (gateway → user directory)
    pub service_secret: Vec<u8>,
    /// JWT algorithm (pinned to HS256)
    pub algorithm: Algorithm,
    /// Dev mode drops the `Secure` cookie flag for plain-http local setups
    pub dev_mode: bool,
}

impl SecurityConfig {
    pub fn new(
        identity_secret: impl Into<Vec<u8>>,
        pastaporto_secret: impl Into<Vec<u8>>,
        action_secret: impl Into<Vec<u8>>,
        service_secret: impl Into<Vec<u8>>,
        dev_mode: bool,
    ) -> Self {
        Self {
            identity_secret: identity_secret.into(),
            pastaporto_secret: pastaporto_secret.into(),
            action_secret: action_secret.into(),
            service_secret: service_secret.into(),
            algorithm: Algorithm::HS256,
            dev_mode,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            b"identity_secret_for_tests_only".to_vec(),
            b"pastaporto_secret_for_tests_only".to_vec(),
            b"action_secret_for_tests_only".to_vec(),
            b"service_secret_for_tests_only".to_vec(),
            false,
        )
    }
}
