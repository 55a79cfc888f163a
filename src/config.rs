//! Runtime configuration, read once at startup and passed down explicitly.

use crate::error::{AdminError, Result};
use clinic_client::config::DEFAULT_BASE_URL;
use clinic_client::ClientConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_API_URL: &str = "CLINIC_API_URL";
pub const ENV_USER_SCOPE: &str = "CLINIC_USER_SCOPE";
pub const ENV_REQUEST_TIMEOUT: &str = "CLINIC_REQUEST_TIMEOUT_SECS";

/// Where usuário listings are narrowed to one consultório.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeFiltering {
    /// `GET /usuarios?consultorioId={id}`
    #[default]
    Server,
    /// `GET /usuarios`, then keep rows whose consultório matches.
    Client,
}

impl FromStr for ScopeFiltering {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(ScopeFiltering::Server),
            "client" => Ok(ScopeFiltering::Client),
            other => Err(AdminError::Config(format!(
                "unknown user scope '{}', expected 'server' or 'client'",
                other
            ))),
        }
    }
}

impl fmt::Display for ScopeFiltering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeFiltering::Server => f.write_str("server"),
            ScopeFiltering::Client => f.write_str("client"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub user_scope: ScopeFiltering,
    pub request_timeout: Option<Duration>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_scope: ScopeFiltering::default(),
            request_timeout: None,
        }
    }
}

impl AdminConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url;
        }
        if let Some(scope) = lookup(ENV_USER_SCOPE) {
            config.user_scope = scope.parse()?;
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AdminError::Config(format!(
                    "{} must be a whole number of seconds",
                    ENV_REQUEST_TIMEOUT
                ))
            })?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_base_url.clone());
        match self.request_timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AdminConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.user_scope, ScopeFiltering::Server);
        assert_eq!(config.client_config().timeout, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            (ENV_API_URL, "https://api.clinica.com.br"),
            (ENV_USER_SCOPE, "Client"),
            (ENV_REQUEST_TIMEOUT, "30"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.clinica.com.br");
        assert_eq!(config.user_scope, ScopeFiltering::Client);

        let client = config.client_config();
        assert_eq!(client.base_url, "https://api.clinica.com.br");
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = load(&[(ENV_REQUEST_TIMEOUT, "0")]).unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[(ENV_USER_SCOPE, "both")]),
            Err(AdminError::Config(_))
        ));
        assert!(matches!(
            load(&[(ENV_REQUEST_TIMEOUT, "soon")]),
            Err(AdminError::Config(_))
        ));
    }
}
