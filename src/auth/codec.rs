//! Tamper-evident session cookie values.
//!
//! A signed token is `<value>.<hex(HMAC-SHA256(secret, value))>`. Nothing is
//! stored server-side; the signature alone proves the value was issued by a
//! holder of the cookie secret. Values must not contain `.`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::fmt;

use super::{compare::constant_time_eq, error::ConfigError};

type HmacSha256 = Hmac<Sha256>;

/// Value signed into the admin cookie after a successful login.
pub const SESSION_MARKER: &str = "authenticated";

const SEPARATOR: char = '.';

pub struct CookieCodec {
    keyed: HmacSha256,
}

impl CookieCodec {
    /// Build a codec keyed with the configured cookie secret.
    ///
    /// # Errors
    /// Returns `ConfigError::EmptySecret` if the secret is empty.
    pub fn new(secret: &SecretString) -> Result<Self, ConfigError> {
        let key = secret.expose_secret().as_bytes();
        if key.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        let keyed = HmacSha256::new_from_slice(key).map_err(|_| ConfigError::InvalidSecret)?;
        Ok(Self { keyed })
    }

    /// Sign `value`, returning `value.signature`.
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        format!("{value}{SEPARATOR}{}", self.signature(value))
    }

    /// Return the signed value if `token` carries a valid signature.
    ///
    /// Malformed and forged tokens both yield `None`.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        let mut parts = token.split(SEPARATOR);
        let (Some(value), Some(signature), None) = (parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        if value.is_empty() || signature.is_empty() {
            return None;
        }

        let expected = self.signature(value);
        constant_time_eq(signature, &expected).then(|| value.to_string())
    }

    /// True when `token` is a valid signature over [`SESSION_MARKER`].
    #[must_use]
    pub fn is_authenticated(&self, token: &str) -> bool {
        self.verify(token)
            .is_some_and(|value| value == SESSION_MARKER)
    }

    fn signature(&self, value: &str) -> String {
        let mut mac = self.keyed.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for CookieCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieCodec").finish_non_exhaustive()
    }
}
