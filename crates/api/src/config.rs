//! Environment-driven configuration.

use chrono::Duration;
use thiserror::Error;

use tollgate_auth::AuthConfig;
use tollgate_auth::config::DEFAULT_SECRET;
use tollgate_observability::LogFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be set together with {1}")]
    Incomplete(&'static str, &'static str),
}

/// Credentials of an administrator created at startup (development only).
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub auth: AuthConfig,
    pub seed_admin: Option<SeedAdmin>,
}

impl AppConfig {
    /// Load from the process environment (and `.env`, when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token_hours = parse_or(&get, "JWT_DURATION", 24i64)?;
        if token_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_DURATION",
                value: token_hours.to_string(),
            });
        }

        let sweep_secs = parse_or(&get, "REVOCATION_SWEEP_SECS", 60i64)?;
        if sweep_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "REVOCATION_SWEEP_SECS",
                value: sweep_secs.to_string(),
            });
        }

        let mut auth = AuthConfig::new(get("JWT_SECRET").unwrap_or_else(|| DEFAULT_SECRET.into()))
            .with_token_ttl(Duration::hours(token_hours))
            .with_sweep_interval(Duration::seconds(sweep_secs));

        if get("REVOCATION_RETENTION_HOURS").is_some() {
            let hours: i64 = parse_or(&get, "REVOCATION_RETENTION_HOURS", token_hours)?;
            if hours < 0 {
                return Err(ConfigError::Invalid {
                    key: "REVOCATION_RETENTION_HOURS",
                    value: hours.to_string(),
                });
            }
            auth = auth.with_revocation_retention(Duration::hours(hours));
        }

        let seed_admin = match (get("SEED_ADMIN_EMAIL"), get("SEED_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Incomplete("SEED_ADMIN_EMAIL", "SEED_ADMIN_PASSWORD"));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete("SEED_ADMIN_PASSWORD", "SEED_ADMIN_EMAIL"));
            }
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: parse_or(&get, "SERVER_PORT", 8080u16)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_format: get("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            auth,
            seed_admin,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
