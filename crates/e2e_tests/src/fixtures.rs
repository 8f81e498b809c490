//! Shared setup for the commerce API suites.
//!
//! Every suite needs a registered customer, and the profile suite also needs
//! that customer's token. [`SuiteContext`] bundles the resolved configuration
//! with a request context and drives that setup, failing loudly when a setup
//! step does not succeed so later assertions never run against a customer
//! that was never created.

use anyhow::{bail, Context, Result};
use commerce_client::{
    ApiConfig, ApiErrorBody, AuthToken, CommerceClient, Credentials, CustomerProfile, UserRecord,
};
use reqwest::{Response, StatusCode};
use tracing::{info, instrument};

use crate::init_logging;

#[cfg(test)]
#[path = "fixtures_tests.rs"]
mod tests;

/// Configuration and request context shared by the cases of one test.
///
/// Each `#[tokio::test]` runs on its own runtime, so each test builds its own
/// context rather than sharing a connection pool across runtimes.
#[derive(Debug)]
pub struct SuiteContext {
    config: ApiConfig,
    client: CommerceClient,
}

impl SuiteContext {
    /// Builds a context from explicit parts.
    pub fn new(config: ApiConfig, client: CommerceClient) -> Self {
        Self { config, client }
    }

    /// Builds a context from the environment.
    ///
    /// Initialises logging, resolves [`ApiConfig::from_env`] and creates a
    /// fresh [`CommerceClient`].
    pub fn from_env() -> Result<Self> {
        init_logging();

        let config = ApiConfig::from_env();
        let client = CommerceClient::new().context("Failed to create commerce API client")?;

        info!(base_url = config.base_url(), "Suite context ready");
        Ok(Self::new(config, client))
    }

    /// Sends a registration request for `user` with the admin token.
    pub async fn register(&self, user: &UserRecord) -> Result<Response> {
        self.client
            .create_customer(self.config.base_url(), self.config.admin_token(), user)
            .await
            .context("Customer registration request failed")
    }

    /// Sends a login request.
    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        self.client
            .login_user(self.config.base_url(), email, password)
            .await
            .context("Customer login request failed")
    }

    /// Sends a profile request with `customer_token`.
    pub async fn profile(&self, customer_token: &str) -> Result<Response> {
        self.client
            .get_user_profile(self.config.base_url(), customer_token)
            .await
            .context("Customer profile request failed")
    }

    /// Registers `user` and fails unless the platform accepted it.
    #[instrument(skip_all, fields(email = %user.email))]
    pub async fn register_user(&self, user: &UserRecord) -> Result<()> {
        let response = self.register(user).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .context("Failed to read registration response body")?;
            bail!(
                "Registering {} failed with status {}: {}",
                user.email,
                status,
                body
            );
        }

        info!("Registered test customer");
        Ok(())
    }

    /// Generates a random user and registers it.
    pub async fn register_fresh_user(&self) -> Result<UserRecord> {
        let user = test_utils::generate_random_user();
        self.register_user(&user).await?;
        Ok(user)
    }

    /// Logs in with `credentials` and extracts the customer token.
    ///
    /// Fails unless the login answers 200 with a non-empty token.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn obtain_token(&self, credentials: &Credentials) -> Result<AuthToken> {
        let response = self
            .client
            .login(self.config.base_url(), credentials)
            .await
            .context("Customer login request failed")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read login response body")?;

        if status != StatusCode::OK {
            bail!("Login for {} failed with status {}: {}", credentials.email, status, body);
        }

        AuthToken::from_response_body(&body).context("Login response did not carry a token")
    }

    /// Registers a fresh user and logs it in.
    pub async fn login_fresh_user(&self) -> Result<(UserRecord, AuthToken)> {
        let user = self.register_fresh_user().await?;
        let token = self.obtain_token(&user.credentials()).await?;
        Ok((user, token))
    }
}

/// Reads a response body as the platform's error envelope.
pub async fn read_error(response: Response) -> Result<ApiErrorBody> {
    let body = response
        .text()
        .await
        .context("Failed to read error response body")?;

    ApiErrorBody::from_body(&body)
        .with_context(|| format!("Response body is not an error envelope: {}", body))
}

/// Reads a response body as a customer representation.
pub async fn read_customer(response: Response) -> Result<CustomerProfile> {
    let body = response
        .text()
        .await
        .context("Failed to read customer response body")?;

    CustomerProfile::from_body(&body)
        .with_context(|| format!("Response body is not a customer: {}", body))
}
