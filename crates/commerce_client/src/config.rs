//! Target API configuration.
//!
//! The harness needs two values: the REST root of the commerce platform and an
//! admin bearer token allowed to create customers. Both come from the process
//! environment (optionally seeded from a `.env` file) and fall back to fixed
//! defaults, so resolving a configuration never fails.

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Environment variable overriding the admin bearer token.
pub const ADMIN_TOKEN_ENV: &str = "ADMIN_TOKEN";

/// API root used when `BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://magento.softwaretestingboard.com/rest/default/V1";

/// Admin token used when `ADMIN_TOKEN` is not set.
pub const DEFAULT_ADMIN_TOKEN: &str = "cdxf96vcah8pbivc3zzrshd8t15ikua5";

/// Resolved connection settings for the commerce API.
///
/// Built once at start-up and passed by reference into every helper call.
#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
    admin_token: SecretString,
}

impl ApiConfig {
    /// Creates a configuration from explicit values.
    pub fn new(base_url: impl Into<String>, admin_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            admin_token: SecretString::from(admin_token.into()),
        }
    }

    /// Resolves the configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or any parent) is loaded first
    /// if one exists. Variables that are unset or empty fall back to
    /// [`DEFAULT_BASE_URL`] and [`DEFAULT_ADMIN_TOKEN`].
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded environment file");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of the named variable, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_client::ApiConfig;
    ///
    /// let config = ApiConfig::from_lookup(|key| match key {
    ///     "BASE_URL" => Some("http://localhost:8080/rest/V1".to_string()),
    ///     _ => None,
    /// });
    ///
    /// assert_eq!(config.base_url(), "http://localhost:8080/rest/V1");
    /// assert_eq!(config.admin_token(), commerce_client::config::DEFAULT_ADMIN_TOKEN);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let base_url = non_empty(BASE_URL_ENV);
        let admin_token = non_empty(ADMIN_TOKEN_ENV);

        debug!(
            base_url = base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            base_url_from_env = base_url.is_some(),
            admin_token_from_env = admin_token.is_some(),
            "Resolved commerce API configuration"
        );

        Self::new(
            base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            admin_token.unwrap_or_else(|| DEFAULT_ADMIN_TOKEN.to_string()),
        )
    }

    /// The REST root every endpoint path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The admin bearer token used for customer creation.
    pub fn admin_token(&self) -> &str {
        self.admin_token.expose_secret()
    }
}
