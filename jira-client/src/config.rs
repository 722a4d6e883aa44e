use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Request timeout used unless the caller overrides it.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(Error::InvalidConfiguration(format!(
                "Unsupported scheme: {}",
                other
            ))),
        }
    }
}

/// Connection parameters for one JIRA instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub api_version: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl JiraConfig {
    pub fn new(
        scheme: Scheme,
        host: impl Into<String>,
        port: u16,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            scheme,
            host: host.into(),
            port,
            api_version: api_version.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let scheme: Scheme = required_env("JIRA_SCHEME")?.parse()?;
        let host = required_env("JIRA_HOST")?;
        let port = required_env("JIRA_PORT")?
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::InvalidConfiguration("JIRA_PORT is not a valid port".to_string()))?;
        let api_version = required_env("JIRA_API_VERSION")?;

        let mut config = Self::new(scheme, host, port, api_version)?;

        if let Ok(raw) = std::env::var("JIRA_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::InvalidConfiguration("JIRA_TIMEOUT_SECS is not a number".to_string())
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        let millis = u64::try_from(timeout.as_millis()).map_err(|_| {
            Error::InvalidConfiguration("Request timeout is too large".to_string())
        })?;
        if millis == 0 || Duration::from_millis(millis) != timeout {
            return Err(Error::InvalidConfiguration(
                "Request timeout must be a whole, non-zero number of milliseconds".to_string(),
            ));
        }
        self.timeout_ms = millis;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Root URL of the instance, e.g. `https://jira.example.com:8443/`.
    /// IPv6 literals are bracketed.
    pub fn base_url(&self) -> Result<Url> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        Url::parse(&format!("{}://{}:{}/", self.scheme, host, self.port))
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid base URL: {}", e)))
    }

    /// Prefix shared by all data operations.
    pub fn api_root(&self) -> String {
        format!("rest/api/{}", self.api_version)
    }

    /// Check every field. Needed for configs built by deserialization or
    /// by writing the public fields directly.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfiguration("Host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfiguration("Port must not be zero".to_string()));
        }
        if self.api_version.trim().is_empty() || self.api_version.contains('/') {
            return Err(Error::InvalidConfiguration(
                "API version must be a single path segment".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        self.base_url().map(|_| ())
    }
}

/// Login credentials. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let username = required_env("JIRA_USER")?;
        let password = required_env("JIRA_PASSWORD")?;
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn login_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn required_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .map_err(|_| Error::ConfigurationMissing(format!("{} not found in environment", name)))?;
    if value.trim().is_empty() {
        return Err(Error::InvalidConfiguration(format!("{} is empty", name)));
    }
    Ok(value)
}
