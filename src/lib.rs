//! # Altar (wedding site admin gate)
//!
//! `altar` guards the admin panel of a single-event wedding site. The public
//! pages are open; editing content and reviewing RSVPs requires one shared
//! admin password.
//!
//! ## Sessions
//!
//! A successful login sets an `HttpOnly` cookie holding
//! `authenticated.<hex HMAC-SHA256>`. The signature is the whole session: no
//! session table exists, and rotating the cookie secret logs every admin out.
//!
//! ## Login throttling
//!
//! Attempts are counted per client id (first `X-Forwarded-For` entry, then
//! `X-Real-IP`) in a fixed window, 5 attempts per 15 minutes by default.
//! The counters live in process memory; expired records are swept on an
//! interval and the number of tracked clients can be capped.
//!
//! > **Note:** with several replicas each process keeps its own counters, so
//! > the effective per-client budget grows with the replica count.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
