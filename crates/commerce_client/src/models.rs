//! # Models
//!
//! Data exchanged with the commerce REST API.
//!
//! Request payloads mirror what the customer and token endpoints accept. The
//! response models are only used by callers that want to inspect a body; the
//! helper operations themselves never decode responses.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// A synthetic customer identity used by the test suites.
///
/// Fields are public so a test can overwrite one of them (for example the
/// password) to exercise the platform's validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRecord {
    /// Lower-case email address, also the login name.
    pub email: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Plain-text password submitted at registration.
    pub password: String,
}

impl UserRecord {
    /// Returns the login credentials of this user.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Email and password pair presented to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A customer bearer token obtained from the login endpoint.
///
/// The value is kept in a [`SecretString`] so it never shows up in debug
/// output or logs.
#[derive(Debug)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wraps an already extracted token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Extracts the token from a login response body.
    ///
    /// The token endpoint answers with a JSON string literal, i.e. the token
    /// wrapped in double quotes. Bodies that are not valid JSON strings have
    /// any surrounding quotes stripped instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyToken`] if no token characters remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_client::AuthToken;
    ///
    /// let token = AuthToken::from_response_body("\"abc123\"").unwrap();
    /// assert_eq!(token.expose(), "abc123");
    /// ```
    pub fn from_response_body(body: &str) -> Result<Self, Error> {
        let trimmed = body.trim();
        let token = match serde_json::from_str::<String>(trimmed) {
            Ok(decoded) => decoded,
            Err(_) => trimmed.trim_matches('"').to_string(),
        };

        if token.trim().is_empty() {
            return Err(Error::EmptyToken);
        }

        Ok(Self::new(token))
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// The address attached to every customer created by the harness.
///
/// Address handling is not under test, so it is held constant and only the
/// identity fields vary between registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAddress {
    pub street: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub region_code: &'static str,
    pub region_id: u32,
    pub postcode: &'static str,
    pub telephone: &'static str,
    pub country_id: &'static str,
}

/// Shipping and billing address sent with every `create_customer` call.
pub const DEFAULT_ADDRESS: FixedAddress = FixedAddress {
    street: "123 Oak Ave",
    city: "Purchase",
    region: "New York",
    region_code: "NY",
    region_id: 43,
    postcode: "10755",
    telephone: "512-555-1111",
    country_id: "US",
};

/// Body of `POST /customers`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateCustomerRequest<'a> {
    pub customer: CustomerPayload<'a>,
    pub password: &'a str,
}

impl<'a> CreateCustomerRequest<'a> {
    pub(crate) fn new(user: &'a UserRecord, address: &FixedAddress) -> Self {
        Self {
            customer: CustomerPayload {
                email: &user.email,
                firstname: &user.firstname,
                lastname: &user.lastname,
                addresses: vec![AddressPayload {
                    default_shipping: true,
                    default_billing: true,
                    firstname: &user.firstname,
                    lastname: &user.lastname,
                    region: RegionPayload {
                        region_code: address.region_code,
                        region: address.region,
                        region_id: address.region_id,
                    },
                    postcode: address.postcode,
                    street: vec![address.street],
                    city: address.city,
                    telephone: address.telephone,
                    country_id: address.country_id,
                }],
            },
            password: &user.password,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerPayload<'a> {
    pub email: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub addresses: Vec<AddressPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressPayload<'a> {
    pub default_shipping: bool,
    pub default_billing: bool,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub region: RegionPayload,
    pub postcode: &'static str,
    pub street: Vec<&'static str>,
    pub city: &'static str,
    pub telephone: &'static str,
    pub country_id: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegionPayload {
    pub region_code: &'static str,
    pub region: &'static str,
    pub region_id: u32,
}

/// Body of `POST /integration/customer/token`.
///
/// The platform calls the email field `username`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A customer as returned by `POST /customers` and `GET /customers/me`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerProfile {
    pub id: u64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
}

impl CustomerProfile {
    /// Decodes a customer from a response body.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(body)?)
    }
}

/// An address as echoed back by the customer endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerAddress {
    #[serde(default)]
    pub street: Vec<String>,
    pub city: String,
    pub postcode: String,
    pub telephone: String,
    pub country_id: String,
    pub region: CustomerRegion,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerRegion {
    pub region: String,
    pub region_code: String,
    pub region_id: u32,
}

/// The error envelope used by the commerce API for 4xx responses.
///
/// `message` may contain placeholders (`%1`, `%fieldName`) whose values are
/// carried in `parameters`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub trace: Option<String>,
}

impl ApiErrorBody {
    /// Decodes an error envelope from a response body.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(body)?)
    }

    /// Returns `message` with its placeholders replaced by `parameters`.
    ///
    /// Positional parameters (a JSON array) fill `%1`, `%2`, ...; named
    /// parameters (a JSON object) fill `%name`. Placeholders without a value
    /// are left as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_client::ApiErrorBody;
    ///
    /// let body = ApiErrorBody::from_body(
    ///     r#"{"message": "The password needs at least %1 characters.", "parameters": [8]}"#,
    /// ).unwrap();
    /// assert_eq!(body.rendered_message(), "The password needs at least 8 characters.");
    /// ```
    pub fn rendered_message(&self) -> String {
        let positional = matches!(self.parameters, Some(serde_json::Value::Array(_)));
        let is_name_char = |c: char| {
            if positional {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            }
        };

        // Single left-to-right pass: substituted text is never rescanned.
        let mut rendered = String::with_capacity(self.message.len());
        let mut rest = self.message.as_str();
        while let Some(start) = rest.find('%') {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let name_len = after
                .find(|c: char| !is_name_char(c))
                .unwrap_or(after.len());
            let name = &after[..name_len];

            match self.parameter(name) {
                Some(value) => rendered.push_str(&parameter_text(value)),
                None => {
                    rendered.push('%');
                    rendered.push_str(name);
                }
            }
            rest = &after[name_len..];
        }
        rendered.push_str(rest);

        rendered
    }

    /// Looks up the value for a placeholder name (`1`-based index or key).
    fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        if name.is_empty() {
            return None;
        }

        match self.parameters.as_ref()? {
            serde_json::Value::Array(values) => name
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| values.get(index)),
            serde_json::Value::Object(values) => values.get(name),
            _ => None,
        }
    }
}

fn parameter_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
