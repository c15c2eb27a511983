use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    // Wrap secrets right away so they never reach a Debug impl in plain text.
    let admin_password = matches
        .get_one::<String>("admin-password")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --admin-password")?;
    let cookie_secret = matches
        .get_one::<String>("cookie-secret")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --cookie-secret")?;

    let seconds = |name: &str, default: u64| {
        Duration::from_secs(matches.get_one::<u64>(name).copied().unwrap_or(default))
    };

    Ok(Action::Server(Args {
        port,
        admin_password,
        cookie_secret,
        login_max_attempts: matches
            .get_one::<u32>("login-max-attempts")
            .copied()
            .unwrap_or(5),
        login_window: seconds("login-window", 900),
        max_tracked_clients: matches
            .get_one::<usize>("max-tracked-clients")
            .copied()
            .unwrap_or(10_000),
        sweep_interval: seconds("sweep-interval", 60),
        session_ttl: seconds("session-ttl", 604_800),
        secure_cookie: matches.get_flag("secure-cookie"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_action() {
        let matches = commands::new().get_matches_from([
            "altar",
            "--port",
            "9000",
            "--admin-password",
            "hunter2",
            "--cookie-secret",
            "s3cr3t",
            "--login-max-attempts",
            "3",
            "--login-window",
            "60",
            "--max-tracked-clients",
            "0",
            "--sweep-interval",
            "30",
            "--session-ttl",
            "3600",
            "--secure-cookie",
        ]);

        let Ok(Action::Server(args)) = handler(&matches) else {
            panic!("expected server action");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.admin_password.expose_secret(), "hunter2");
        assert_eq!(args.cookie_secret.expose_secret(), "s3cr3t");
        assert_eq!(args.login_max_attempts, 3);
        assert_eq!(args.login_window, Duration::from_secs(60));
        assert_eq!(args.max_tracked_clients, 0);
        assert_eq!(args.sweep_interval, Duration::from_secs(30));
        assert_eq!(args.session_ttl, Duration::from_secs(3600));
        assert!(args.secure_cookie);
    }

    #[test]
    fn server_args_debug_redacts_secrets() {
        let matches = commands::new().get_matches_from([
            "altar",
            "--admin-password",
            "hunter2",
            "--cookie-secret",
            "s3cr3t",
        ]);
        let Ok(action) = handler(&matches) else {
            panic!("expected server action");
        };
        let rendered = format!("{action:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
