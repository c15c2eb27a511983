use crate::{
    api::{self, AdminConfig, AdminState},
    auth::{CookieCodec, RateLimiter},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub admin_password: SecretString,
    pub cookie_secret: SecretString,
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub max_tracked_clients: usize,
    pub sweep_interval: Duration,
    pub session_ttl: Duration,
    pub secure_cookie: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let codec = CookieCodec::new(&args.cookie_secret).context("Invalid cookie secret")?;
    let limiter = Arc::new(RateLimiter::new().with_max_tracked_keys(args.max_tracked_clients));

    let config = AdminConfig::new(args.admin_password)
        .with_login_max_attempts(args.login_max_attempts)
        .with_login_window(args.login_window)
        .with_session_ttl(args.session_ttl)
        .with_secure_cookie(args.secure_cookie);

    let state =
        AdminState::new(config, codec, limiter.clone()).context("Invalid admin configuration")?;

    api::new(args.port, Arc::new(state), limiter, args.sweep_interval).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("admin_password", "REDACTED".to_string()),
        ("cookie_secret", "REDACTED".to_string()),
        (
            "login_limit",
            format!(
                "{} per {}s",
                args.login_max_attempts,
                args.login_window.as_secs()
            ),
        ),
        ("max_tracked_clients", tracked_clients(args.max_tracked_clients)),
        ("sweep_interval", format!("{}s", args.sweep_interval.as_secs())),
        ("session_ttl", format!("{}s", args.session_ttl.as_secs())),
        ("secure_cookie", args.secure_cookie.to_string()),
    ];
    log_entries("Startup configuration", &entries);
}

fn tracked_clients(max: usize) -> String {
    if max == 0 {
        "unbounded".to_string()
    } else {
        max.to_string()
    }
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", altar_banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn altar_banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    ALTAR_BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const ALTAR_BANNER: &str = r"
    _____
   /  o  \   _____
  |  / \  | /  o  \
   \_____/ |  / \  |
            \_____/   A L T A R {VERSION}";
