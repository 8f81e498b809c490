//! Error types for commerce client operations.
//!
//! Only failures that happen on the client side are errors here. A 400 or 401
//! from the commerce API is a valid response: it is returned to the caller
//! untouched so the remote error semantics stay observable.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while talking to the commerce REST API.
///
/// ## Examples
///
/// ```rust,ignore
/// use commerce_client::Error;
///
/// match client.login_user(config.base_url(), email, password).await {
///     Ok(response) => println!("Login returned {}", response.status()),
///     Err(Error::Transport { endpoint, .. }) => eprintln!("{endpoint} unreachable"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying HTTP client could not be constructed.
    ///
    /// This usually means the TLS backend failed to initialise.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    ///
    /// Covers DNS failures, refused or reset connections, timeouts and
    /// malformed endpoint URLs. Requests are not retried.
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// The full URL the request was sent to.
        endpoint: String,
        /// The transport error reported by the HTTP client.
        #[source]
        source: reqwest::Error,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The login endpoint answered with an empty token.
    #[error("Login response did not contain a token")]
    EmptyToken,
}
