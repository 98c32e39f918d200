//! # Configuration
//!
//! Process configuration read once at start from environment variables
//! (a `.env` file is loaded first by the binary when present).
//!
//! | Variable         | Default       |
//! |------------------|---------------|
//! | `PORT`           | `5100`        |
//! | `JWT_SECRET`     | required      |
//! | `JWT_EXPIRES_IN` | `1d`          |
//! | `NODE_ENV`       | `development` |
//! | `PUBLIC_DIR`     | `./public`    |
//! | `SEED_DEMO_USER` | `true`        |

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 5100;
const DEFAULT_TOKEN_LIFETIME: &str = "1d";

/// Errors loading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Deployment environment. Controls the `Secure` cookie flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::Invalid {
                name: "NODE_ENV",
                value: other.to_string(),
            }),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Application configuration.
///
/// Custom `Debug` redacts the signing secret.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// HMAC secret for session tokens.
    pub jwt_secret: Zeroizing<String>,
    /// Session token and cookie lifetime.
    pub token_lifetime: Duration,
    pub environment: Environment,
    /// Directory of the built frontend, served for unmatched paths.
    pub public_dir: PathBuf,
    /// Create the read-only demo account at start.
    pub seed_demo_user: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_lifetime", &self.token_lifetime)
            .field("environment", &self.environment)
            .field("public_dir", &self.public_dir)
            .field("seed_demo_user", &self.seed_demo_user)
            .finish()
    }
}

impl AppConfig {
    /// Defaults with the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: Zeroizing::new(secret.into()),
            token_lifetime: Duration::days(1),
            environment: Environment::default(),
            public_dir: PathBuf::from("./public"),
            seed_demo_user: true,
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let mut config = Self::with_secret(secret);

        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port,
            })?;
        }

        let lifetime = get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.to_string());
        config.token_lifetime = parse_lifetime(&lifetime).ok_or(ConfigError::Invalid {
            name: "JWT_EXPIRES_IN",
            value: lifetime,
        })?;

        if let Some(env) = get("NODE_ENV") {
            config.environment = Environment::parse(env.trim())?;
        }

        if let Some(dir) = get("PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }

        if let Some(seed) = get("SEED_DEMO_USER") {
            config.seed_demo_user = match seed.trim() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SEED_DEMO_USER",
                        value: seed,
                    })
                }
            };
        }

        Ok(config)
    }
}

/// Parse a lifetime such as `90s`, `30m`, `12h`, `1d`. A bare number is seconds.
pub fn parse_lifetime(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let amount: i64 = digits.parse().ok()?;
    if amount == 0 {
        return None;
    }
    match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 5100);
        assert_eq!(config.jwt_secret.as_str(), "s3cret");
        assert_eq!(config.token_lifetime, Duration::days(1));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.public_dir, PathBuf::from("./public"));
        assert!(config.seed_demo_user);
    }

    #[test]
    fn overrides_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("JWT_EXPIRES_IN", "12h"),
            ("NODE_ENV", "production"),
            ("PUBLIC_DIR", "/srv/www"),
            ("SEED_DEMO_USER", "false"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_lifetime, Duration::hours(12));
        assert!(config.environment.is_production());
        assert_eq!(config.public_dir, PathBuf::from("/srv/www"));
        assert!(!config.seed_demo_user);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("NODE_ENV", "staging")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "NODE_ENV", .. }));

        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("JWT_EXPIRES_IN", "1w")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_EXPIRES_IN", .. }));
    }

    #[test]
    fn lifetimes() {
        assert_eq!(parse_lifetime("90"), Some(Duration::seconds(90)));
        assert_eq!(parse_lifetime("90s"), Some(Duration::seconds(90)));
        assert_eq!(parse_lifetime("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_lifetime("2h"), Some(Duration::hours(2)));
        assert_eq!(parse_lifetime("1d"), Some(Duration::days(1)));
        assert_eq!(parse_lifetime("0d"), None);
        assert_eq!(parse_lifetime("d"), None);
        assert_eq!(parse_lifetime("-1d"), None);
        assert_eq!(parse_lifetime("1y"), None);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = AppConfig::with_secret("hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
