//! Admin authentication primitives.
//!
//! Login flow: the client id is checked against the [`RateLimiter`] first,
//! then the submitted password is compared with [`constant_time_eq`], and on a
//! match [`CookieCodec::sign`] produces the cookie value for
//! [`SESSION_MARKER`]. Later requests present the cookie to
//! [`CookieCodec::verify`].

mod codec;
mod compare;
mod error;
mod rate_limit;

pub use codec::{CookieCodec, SESSION_MARKER};
pub use compare::constant_time_eq;
pub use error::ConfigError;
pub use rate_limit::{Clock, RateLimiter, SystemClock};

#[cfg(test)]
pub(crate) use rate_limit::ManualClock;
