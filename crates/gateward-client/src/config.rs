//! Client configuration.
//!
//! A single base URL plus the credential transport scheme; everything else is
//! fixed by the backend's API surface.

use std::time::Duration;

use serde::Deserialize;

/// How the session credential is attached to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    /// `Cookie: jwt=<token>` — how the deployed backend authenticates.
    #[default]
    Cookie,
    /// `Authorization: Bearer <token>`.
    Bearer,
}

impl CredentialScheme {
    /// Parse a scheme name (`"cookie"` or `"bearer"`), case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cookie" => Some(Self::Cookie),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }
}

/// Configuration for a gateward [`crate::Client`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the backend (e.g., `http://localhost:8080/`).
    pub base_url: String,

    /// Credential transport scheme.
    #[serde(default)]
    pub credential_scheme: CredentialScheme,

    /// Request timeout in seconds.
    #[serde(default = "Config::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connect timeout in seconds.
    #[serde(default = "Config::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Config {
    /// Create a configuration for the given base URL with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
            credential_scheme: CredentialScheme::default(),
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
        }
    }

    /// Build a configuration from the environment.
    ///
    /// Reads `GATEWARD_BASE_URL` (required) and `GATEWARD_CREDENTIAL_SCHEME`
    /// (optional, `cookie` or `bearer`). Returns `None` when the base URL is
    /// unset.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("GATEWARD_BASE_URL").ok()?;
        let mut config = Self::new(base_url);
        if let Ok(scheme) = std::env::var("GATEWARD_CREDENTIAL_SCHEME") {
            if let Some(parsed) = CredentialScheme::parse(&scheme) {
                config.credential_scheme = parsed;
            }
        }
        Some(config)
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Select the Bearer credential scheme.
    #[must_use]
    pub fn with_bearer(mut self) -> Self {
        self.credential_scheme = CredentialScheme::Bearer;
        self
    }

    /// Get the session check / login endpoint URL.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}auth", self.base_url)
    }

    /// Get the super-user check endpoint URL.
    #[must_use]
    pub fn super_url(&self) -> String {
        format!("{}auth/super", self.base_url)
    }

    /// Get the logout notification endpoint URL.
    #[must_use]
    pub fn logout_url(&self) -> String {
        format!("{}auth/logout", self.base_url)
    }

    /// Resolve an API path (e.g., `api/users/3`) against the base URL.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the connect timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Ensure the base URL ends with exactly one `/` so paths join cleanly.
fn normalize_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        let config = Config::new("http://localhost:8080");
        assert_eq!(config.auth_url(), "http://localhost:8080/auth");
        assert_eq!(config.super_url(), "http://localhost:8080/auth/super");
        assert_eq!(config.logout_url(), "http://localhost:8080/auth/logout");
        assert_eq!(
            config.api_url("api/users/3"),
            "http://localhost:8080/api/users/3"
        );
    }

    #[test]
    fn base_url_normalization() {
        // Trailing slash or not, paths join the same way
        assert_eq!(
            Config::new("http://host/").api_url("api/groups"),
            Config::new("http://host").api_url("/api/groups"),
        );
    }

    #[test]
    fn defaults() {
        let config = Config::new("http://host");
        assert_eq!(config.credential_scheme, CredentialScheme::Cookie);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!(
            CredentialScheme::parse("Bearer"),
            Some(CredentialScheme::Bearer)
        );
        assert_eq!(
            CredentialScheme::parse("cookie"),
            Some(CredentialScheme::Cookie)
        );
        assert_eq!(CredentialScheme::parse("basic"), None);
    }
}
