//! Client configuration.
//!
//! `api_url` is the site root; `route_namespace` is where content routes
//! live (`wp/v2` on a stock install). Content requests go to
//! `{api_url}/{route_namespace}{path}`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_ROUTE_NAMESPACE: &str = "wp/v2";

pub const API_URL_ENV: &str = "CONTENT_API_URL";
pub const ROUTE_NAMESPACE_ENV: &str = "CONTENT_API_NAMESPACE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub route_namespace: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            route_namespace: DEFAULT_ROUTE_NAMESPACE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `CONTENT_API_URL` / `CONTENT_API_NAMESPACE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV) {
            config.api_url = url;
        }
        if let Some(namespace) = lookup(ROUTE_NAMESPACE_ENV) {
            config.route_namespace = namespace;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Empty { name: API_URL_ENV });
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "{API_URL_ENV} must be an http(s) URL, got \"{}\"",
                self.api_url
            )));
        }
        if self.route_namespace.trim_matches('/').is_empty() {
            return Err(ConfigError::Empty {
                name: ROUTE_NAMESPACE_ENV,
            });
        }
        Ok(())
    }

    /// Base URL for content endpoints: site root plus route namespace.
    pub fn content_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.route_namespace.trim_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_wp_api() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.content_base_url(), "http://localhost:3000/wp/v2");
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = ClientConfig::from_lookup(|key| match key {
            API_URL_ENV => Some("https://site/".to_string()),
            ROUTE_NAMESPACE_ENV => Some("/custom/v1/".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.content_base_url(), "https://site/custom/v1");
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = ClientConfig::from_lookup(|key| (key == API_URL_ENV).then(String::new)).unwrap_err();
        assert_eq!(err, ConfigError::Empty { name: API_URL_ENV });
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = ClientConfig::from_lookup(|key| (key == API_URL_ENV).then(|| "ftp://site".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn deserializes_with_missing_fields_defaulted() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_url":"https://site"}"#).unwrap();
        assert_eq!(config.route_namespace, DEFAULT_ROUTE_NAMESPACE);
    }
}
