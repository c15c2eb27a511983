use thiserror::Error;

/// Rejected startup configuration for the admin gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cookie secret must not be empty")]
    EmptySecret,
    #[error("cookie secret cannot be used as an HMAC key")]
    InvalidSecret,
    #[error("admin password must not be empty")]
    EmptyPassword,
    #[error("login attempts must be greater than zero")]
    ZeroAttempts,
    #[error("login window must be greater than zero")]
    ZeroWindow,
}
