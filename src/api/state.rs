//! Admin gate state and configuration.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ConfigError, CookieCodec, RateLimiter};

pub const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOGIN_WINDOW_SECONDS: u64 = 15 * 60;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AdminConfig {
    admin_password: SecretString,
    login_max_attempts: u32,
    login_window: Duration,
    session_ttl: Duration,
    secure_cookie: bool,
}

impl AdminConfig {
    #[must_use]
    pub fn new(admin_password: SecretString) -> Self {
        Self {
            admin_password,
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_window: Duration::from_secs(DEFAULT_LOGIN_WINDOW_SECONDS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS),
            secure_cookie: false,
        }
    }

    #[must_use]
    pub fn with_login_max_attempts(mut self, attempts: u32) -> Self {
        self.login_max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_login_window(mut self, window: Duration) -> Self {
        self.login_window = window;
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Mark the session cookie `Secure`; enable when the site is served over HTTPS.
    #[must_use]
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_password.expose_secret().is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        if self.login_max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.login_window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    pub(crate) fn admin_password(&self) -> &str {
        self.admin_password.expose_secret()
    }

    #[must_use]
    pub fn login_max_attempts(&self) -> u32 {
        self.login_max_attempts
    }

    #[must_use]
    pub fn login_window(&self) -> Duration {
        self.login_window
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[must_use]
    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }
}

#[derive(Debug)]
pub struct AdminState {
    config: AdminConfig,
    codec: CookieCodec,
    limiter: Arc<RateLimiter>,
}

impl AdminState {
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(
        config: AdminConfig,
        codec: CookieCodec,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            codec,
            limiter,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &CookieCodec {
        &self.codec
    }

    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn admin_config_defaults_and_overrides() {
        let config = AdminConfig::new(secret("hunter2"));
        assert_eq!(config.login_max_attempts(), DEFAULT_LOGIN_MAX_ATTEMPTS);
        assert_eq!(
            config.login_window(),
            Duration::from_secs(DEFAULT_LOGIN_WINDOW_SECONDS)
        );
        assert_eq!(
            config.session_ttl(),
            Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS)
        );
        assert!(!config.secure_cookie());
        assert_eq!(config.admin_password(), "hunter2");

        let config = config
            .with_login_max_attempts(3)
            .with_login_window(Duration::from_secs(60))
            .with_session_ttl(Duration::from_secs(120))
            .with_secure_cookie(true);
        assert_eq!(config.login_max_attempts(), 3);
        assert_eq!(config.login_window(), Duration::from_secs(60));
        assert_eq!(config.session_ttl(), Duration::from_secs(120));
        assert!(config.secure_cookie());
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert_eq!(
            AdminConfig::new(secret("")).validate(),
            Err(ConfigError::EmptyPassword)
        );
        assert_eq!(
            AdminConfig::new(secret("pw"))
                .with_login_max_attempts(0)
                .validate(),
            Err(ConfigError::ZeroAttempts)
        );
        assert_eq!(
            AdminConfig::new(secret("pw"))
                .with_login_window(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroWindow)
        );
        assert_eq!(AdminConfig::new(secret("pw")).validate(), Ok(()));
    }

    #[test]
    fn admin_state_rejects_invalid_config() {
        let codec = CookieCodec::new(&secret("s3cr3t")).unwrap();
        let result = AdminState::new(
            AdminConfig::new(secret("")),
            codec,
            Arc::new(RateLimiter::new()),
        );
        assert_eq!(result.err(), Some(ConfigError::EmptyPassword));
    }

    #[test]
    fn config_debug_redacts_password() {
        let rendered = format!("{:?}", AdminConfig::new(secret("hunter2")));
        assert!(!rendered.contains("hunter2"));
    }
}
