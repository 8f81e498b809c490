//! Crate for exercising a commerce platform's customer REST API.
//!
//! The helpers in this crate build exactly one request each and hand the
//! response back unconsumed, whatever its status. They perform no local
//! validation and no retries, so the remote platform's own error semantics
//! stay observable to the tests that drive them.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, instrument, warn};

pub mod config;
pub use config::ApiConfig;

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{
    ApiErrorBody, AuthToken, Credentials, CustomerAddress, CustomerProfile, CustomerRegion,
    FixedAddress, UserRecord, DEFAULT_ADDRESS,
};

use models::{CreateCustomerRequest, LoginRequest};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("commerce_client/", env!("CARGO_PKG_VERSION"));

/// Path of the customer registration endpoint.
const CUSTOMERS_PATH: &str = "customers";

/// Path of the customer token endpoint.
const CUSTOMER_TOKEN_PATH: &str = "integration/customer/token";

/// Path of the authenticated customer's own profile.
const CUSTOMER_ME_PATH: &str = "customers/me";

/// A reusable request context for the commerce API.
///
/// Wraps one [`reqwest::Client`] and its connection pool. The client is not
/// bound to a host: the base URL and credentials are passed into every call.
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct CommerceClient {
    client: Client,
}

impl CommerceClient {
    /// Creates a client backed by a default [`reqwest::Client`].
    ///
    /// No request timeout is configured; the transport's defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientBuild`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self { client })
    }

    /// Creates a client around a caller-configured [`reqwest::Client`].
    pub fn with_http_client(client: Client) -> Self {
        Self { client }
    }

    /// Registers a new customer.
    ///
    /// Sends `POST {base_url}/customers` authenticated with the admin token.
    /// The body carries the identity fields and password of `user` plus the
    /// fixed [`DEFAULT_ADDRESS`] as default shipping and billing address.
    ///
    /// The platform answers 200 with the created customer, or 400 with a
    /// message naming the first validation failure (duplicate, missing or
    /// malformed email, weak password).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no HTTP response was received.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use commerce_client::{ApiConfig, CommerceClient, UserRecord};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ApiConfig::from_env();
    /// let client = CommerceClient::new()?;
    /// let user = UserRecord {
    ///     email: "jane.doe+test@example.com".to_string(),
    ///     firstname: "Jane".to_string(),
    ///     lastname: "Doe".to_string(),
    ///     password: "Abc12345!".to_string(),
    /// };
    ///
    /// let response = client
    ///     .create_customer(config.base_url(), config.admin_token(), &user)
    ///     .await?;
    /// println!("Registration returned {}", response.status());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(base_url = %base_url, email = %user.email))]
    pub async fn create_customer(
        &self,
        base_url: &str,
        admin_token: &str,
        user: &UserRecord,
    ) -> Result<Response, Error> {
        let endpoint = endpoint_url(base_url, CUSTOMERS_PATH);
        let payload = CreateCustomerRequest::new(user, &DEFAULT_ADDRESS);

        debug!(endpoint = %endpoint, "Sending customer registration request");
        let request = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(admin_token)
            .json(&payload);

        self.send(endpoint, request).await
    }

    /// Requests a customer token for an email and password.
    ///
    /// Sends `POST {base_url}/integration/customer/token` with the body
    /// `{"username": email, "password": password}` and no `Authorization`
    /// header.
    ///
    /// The platform answers 200 with the token as a JSON string (see
    /// [`AuthToken::from_response_body`]), 401 for a wrong password or an
    /// unknown email (with the same message for both), or 400 when both
    /// fields are empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no HTTP response was received.
    #[instrument(skip_all, fields(base_url = %base_url, email = %email))]
    pub async fn login_user(
        &self,
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<Response, Error> {
        let endpoint = endpoint_url(base_url, CUSTOMER_TOKEN_PATH);

        debug!(endpoint = %endpoint, "Sending customer login request");
        let request = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&LoginRequest {
                username: email,
                password,
            });

        self.send(endpoint, request).await
    }

    /// Requests a customer token using a credential pair.
    ///
    /// Equivalent to [`CommerceClient::login_user`].
    pub async fn login(&self, base_url: &str, credentials: &Credentials) -> Result<Response, Error> {
        self.login_user(base_url, &credentials.email, &credentials.password)
            .await
    }

    /// Fetches the profile of the customer owning `customer_token`.
    ///
    /// Sends `GET {base_url}/customers/me` with the token as bearer
    /// credential. The platform answers 200 with the profile, or 401 when the
    /// token is invalid, malformed or expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no HTTP response was received.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub async fn get_user_profile(
        &self,
        base_url: &str,
        customer_token: &str,
    ) -> Result<Response, Error> {
        let endpoint = endpoint_url(base_url, CUSTOMER_ME_PATH);

        debug!(endpoint = %endpoint, "Sending customer profile request");
        let request = self
            .client
            .get(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(customer_token);

        self.send(endpoint, request).await
    }

    async fn send(&self, endpoint: String, request: RequestBuilder) -> Result<Response, Error> {
        match request.send().await {
            Ok(response) => {
                info!(
                    endpoint = %endpoint,
                    status = response.status().as_u16(),
                    "Commerce API responded"
                );
                Ok(response)
            }
            Err(source) => {
                warn!(
                    endpoint = %endpoint,
                    error = %source,
                    "Commerce API request failed before a response was received"
                );
                Err(Error::Transport { endpoint, source })
            }
        }
    }
}

/// Joins an endpoint path onto the configured API root.
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
