//! Login submission flow.
//!
//! One call to `submit_login` is one attempt: a single request, no retry.
//! The outcome carries the notification to show and, on success only, the
//! view to navigate to. The token is written to the store before the outcome
//! is returned, so storage always happens ahead of navigation.

use tracing::{debug, error, info};

use crate::api::{ApiError, AuthClient};
use crate::navigation::View;

use super::form::Credentials;
use super::storage::{TokenStore, ACCESS_TOKEN_KEY};

const MSG_SUCCESS: &str = "Login successful!";
const MSG_SERVER_ERROR: &str = "Login failed due to a server error.";
const MSG_NO_TOKEN: &str = "Server response error: no token received.";
const MSG_LOGIN_FAILED: &str = "Login failed.";

/// Why a login attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFailure {
    /// The request could not be sent or completed
    Transport,
    /// The response body was not JSON
    MalformedResponse,
    /// A success response without a token
    MissingToken,
    /// The server answered with a non-success status
    Rejected(Option<String>),
    /// The token could not be persisted
    Storage,
}

/// Result of one login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Failed(LoginFailure),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::LoggedIn)
    }

    /// Text of the blocking notification for this outcome
    pub fn notice(&self) -> &str {
        match self {
            LoginOutcome::LoggedIn => MSG_SUCCESS,
            LoginOutcome::Failed(LoginFailure::Transport | LoginFailure::Storage) => {
                MSG_SERVER_ERROR
            }
            LoginOutcome::Failed(LoginFailure::MalformedResponse | LoginFailure::MissingToken) => {
                MSG_NO_TOKEN
            }
            LoginOutcome::Failed(LoginFailure::Rejected(message)) => message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(MSG_LOGIN_FAILED),
        }
    }

    /// View to navigate to, if any
    pub fn destination(&self) -> Option<View> {
        match self {
            LoginOutcome::LoggedIn => Some(View::Main),
            LoginOutcome::Failed(_) => None,
        }
    }
}

/// Submit credentials, persist the token on success, and classify the result
pub async fn submit_login(
    client: &AuthClient,
    store: &dyn TokenStore,
    credentials: &Credentials,
) -> LoginOutcome {
    debug!(email = %credentials.email, "Submitting login");

    let result = match client.login(credentials).await {
        Ok(result) => result,
        Err(ApiError::Network(e)) => {
            error!(error = %e, "Network or server error during login");
            return LoginOutcome::Failed(LoginFailure::Transport);
        }
        Err(ApiError::InvalidResponse(reason)) => {
            error!(%reason, "Failed to parse login response");
            return LoginOutcome::Failed(LoginFailure::MalformedResponse);
        }
        Err(ApiError::Rejected { status, message }) => {
            info!(%status, "Login rejected");
            return LoginOutcome::Failed(LoginFailure::Rejected(message));
        }
    };

    let Some(token) = result.token else {
        error!("Login response has no token");
        return LoginOutcome::Failed(LoginFailure::MissingToken);
    };

    if let Err(e) = store.set(ACCESS_TOKEN_KEY, &token) {
        error!(error = %e, "Failed to store access token");
        return LoginOutcome::Failed(LoginFailure::Storage);
    }

    info!(to = %View::Main, "Login successful");
    LoginOutcome::LoggedIn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_notice_and_destination() {
        let outcome = LoginOutcome::LoggedIn;
        assert!(outcome.is_success());
        assert_eq!(outcome.notice(), MSG_SUCCESS);
        assert_eq!(outcome.destination(), Some(View::Main));
    }

    #[test]
    fn test_rejected_uses_server_message() {
        let outcome =
            LoginOutcome::Failed(LoginFailure::Rejected(Some("Invalid credentials".into())));
        assert_eq!(outcome.notice(), "Invalid credentials");
        assert_eq!(outcome.destination(), None);
    }

    #[test]
    fn test_rejected_without_message_is_generic() {
        assert_eq!(
            LoginOutcome::Failed(LoginFailure::Rejected(None)).notice(),
            MSG_LOGIN_FAILED
        );
        assert_eq!(
            LoginOutcome::Failed(LoginFailure::Rejected(Some(String::new()))).notice(),
            MSG_LOGIN_FAILED
        );
    }

    #[test]
    fn test_transport_and_malformed_notices_differ() {
        let transport = LoginOutcome::Failed(LoginFailure::Transport);
        let malformed = LoginOutcome::Failed(LoginFailure::MalformedResponse);
        assert_eq!(transport.notice(), MSG_SERVER_ERROR);
        assert_eq!(malformed.notice(), MSG_NO_TOKEN);
        assert_ne!(transport.notice(), malformed.notice());
        assert!(!transport.is_success());
        assert_eq!(transport.destination(), None);
        assert_eq!(malformed.destination(), None);
    }

    #[test]
    fn test_missing_token_and_storage_notices() {
        assert_eq!(
            LoginOutcome::Failed(LoginFailure::MissingToken).notice(),
            MSG_NO_TOKEN
        );
        assert_eq!(
            LoginOutcome::Failed(LoginFailure::Storage).notice(),
            MSG_SERVER_ERROR
        );
    }
}
