//! API client for the Reletter authentication service.
//!
//! This module provides the `AuthClient` struct, which posts credentials
//! to the login endpoint and classifies the response.

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Credentials;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the login endpoint, relative to the configured base URL
pub const LOGIN_PATH: &str = "/users/login";

/// Parsed body of a login response.
///
/// The service answers with JSON. On success it carries `token`, on failure
/// it may carry `message`. Either field is read only when the body is an
/// object and the field is a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthResult {
    pub token: Option<String>,
    pub message: Option<String>,
}

impl AuthResult {
    fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            token: field("token"),
            message: field("message"),
        }
    }
}

/// HTTP client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// No request timeout is set: a login waits as long as the transport does.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Post credentials to the login endpoint.
    ///
    /// The body is parsed as JSON before the status is looked at, so an
    /// unparseable error page is reported as `InvalidResponse` rather than
    /// `Rejected`.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResult, ApiError> {
        let url = self.login_url();
        debug!(%url, "Sending login request");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read body: {}", e)))?;

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| ApiError::invalid_body(e, &body))?;
        let result = AuthResult::from_value(&value);

        if !status.is_success() {
            warn!(%status, "Login rejected by server");
            return Err(ApiError::Rejected {
                status,
                message: result.message,
            });
        }

        debug!(%status, has_token = result.token.is_some(), "Login response received");
        Ok(result)
    }
}
