use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        BoolishValueParser, ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("altar")
        .about("Admin gate for a single-event wedding site")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ALTAR_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("admin-password")
                .long("admin-password")
                .help("Shared password for the admin panel")
                .env("ALTAR_ADMIN_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("cookie-secret")
                .long("cookie-secret")
                .help("Secret key used to sign the admin session cookie")
                .env("ALTAR_COOKIE_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("login-max-attempts")
                .long("login-max-attempts")
                .help("Login attempts allowed per client within the login window")
                .default_value("5")
                .env("ALTAR_LOGIN_MAX_ATTEMPTS")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("login-window")
                .long("login-window")
                .help("Login rate-limit window in seconds")
                .default_value("900")
                .env("ALTAR_LOGIN_WINDOW")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("max-tracked-clients")
                .long("max-tracked-clients")
                .help("Maximum clients tracked by the login rate limiter (0 = unbounded)")
                .default_value("10000")
                .env("ALTAR_MAX_TRACKED_CLIENTS")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("sweep-interval")
                .long("sweep-interval")
                .help("Seconds between sweeps of expired rate-limit records")
                .default_value("60")
                .env("ALTAR_SWEEP_INTERVAL")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("session-ttl")
                .long("session-ttl")
                .help("Admin session cookie lifetime in seconds")
                .default_value("604800")
                .env("ALTAR_SESSION_TTL")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("secure-cookie")
                .long("secure-cookie")
                .help("Mark the admin cookie Secure (serve the site over HTTPS)")
                .env("ALTAR_SECURE_COOKIE")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ALTAR_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "altar",
        "--admin-password",
        "hunter2",
        "--cookie-secret",
        "s3cr3t",
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "altar");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Admin gate for a single-event wedding site"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("ALTAR_PORT", None::<&str>),
                ("ALTAR_LOGIN_MAX_ATTEMPTS", None),
                ("ALTAR_LOGIN_WINDOW", None),
                ("ALTAR_MAX_TRACKED_CLIENTS", None),
                ("ALTAR_SWEEP_INTERVAL", None),
                ("ALTAR_SESSION_TTL", None),
                ("ALTAR_SECURE_COOKIE", None),
            ],
            || {
                let matches = new().get_matches_from(REQUIRED);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<u32>("login-max-attempts").copied(),
                    Some(5)
                );
                assert_eq!(matches.get_one::<u64>("login-window").copied(), Some(900));
                assert_eq!(
                    matches.get_one::<usize>("max-tracked-clients").copied(),
                    Some(10000)
                );
                assert_eq!(matches.get_one::<u64>("sweep-interval").copied(), Some(60));
                assert_eq!(
                    matches.get_one::<u64>("session-ttl").copied(),
                    Some(604_800)
                );
                assert_eq!(matches.get_one::<bool>("secure-cookie").copied(), Some(false));
            },
        );
    }

    #[test]
    fn test_check_args() {
        let mut args = REQUIRED.to_vec();
        args.extend([
            "--port",
            "9090",
            "--login-max-attempts",
            "3",
            "--login-window",
            "60",
            "--secure-cookie",
        ]);
        let matches = new().get_matches_from(args);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
        assert_eq!(
            matches
                .get_one::<String>("admin-password")
                .map(|s| s.to_string()),
            Some("hunter2".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("cookie-secret")
                .map(|s| s.to_string()),
            Some("s3cr3t".to_string())
        );
        assert_eq!(
            matches.get_one::<u32>("login-max-attempts").copied(),
            Some(3)
        );
        assert_eq!(matches.get_one::<u64>("login-window").copied(), Some(60));
        assert_eq!(matches.get_one::<bool>("secure-cookie").copied(), Some(true));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        temp_env::with_vars([("ALTAR_COOKIE_SECRET", None::<&str>)], || {
            let result = new().try_get_matches_from(["altar", "--admin-password", "hunter2"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_zero_attempts_is_an_error() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--login-max-attempts", "0"]);
        assert!(new().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ALTAR_ADMIN_PASSWORD", Some("hunter2")),
                ("ALTAR_COOKIE_SECRET", Some("s3cr3t")),
                ("ALTAR_PORT", Some("443")),
                ("ALTAR_LOGIN_WINDOW", Some("120")),
                ("ALTAR_SECURE_COOKIE", Some("true")),
                ("ALTAR_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["altar"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("cookie-secret")
                        .map(|s| s.to_string()),
                    Some("s3cr3t".to_string())
                );
                assert_eq!(matches.get_one::<u64>("login-window").copied(), Some(120));
                assert_eq!(matches.get_one::<bool>("secure-cookie").copied(), Some(true));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("ALTAR_LOG_LEVEL", Some(level)),
                    ("ALTAR_ADMIN_PASSWORD", Some("hunter2")),
                    ("ALTAR_COOKIE_SECRET", Some("s3cr3t")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["altar"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").copied(),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5 {
            temp_env::with_vars([("ALTAR_LOG_LEVEL", None::<String>)], || {
                let mut args: Vec<String> = REQUIRED.iter().map(ToString::to_string).collect();

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
