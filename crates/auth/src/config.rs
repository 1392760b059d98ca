use chrono::Duration;

/// Placeholder signing secret used when none is configured.
pub const DEFAULT_SECRET: &str = "default_jwt_secret_key_change_in_production";

/// Authentication core settings, loaded once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
    revocation_retention: Option<Duration>,
    sweep_interval: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(24),
            revocation_retention: None,
            sweep_interval: Duration::seconds(60),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_revocation_retention(mut self, retention: Duration) -> Self {
        self.revocation_retention = Some(retention);
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// How long revocation entries are kept. Defaults to the token lifetime.
    pub fn revocation_retention(&self) -> Duration {
        self.revocation_retention.unwrap_or(self.token_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET)
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("revocation_retention", &self.revocation_retention())
            .field("sweep_interval", &self.sweep_interval)
            .finish()
    }
}
