//! Application state management for Reletter.
//!
//! This module contains the core `App` struct: the login form, the current
//! view, the queue of blocking notices, and the channel that brings login
//! results back from background tasks.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use reletter_core::{
    open_store, submit_login, AuthClient, Config, Field, LoginForm, LoginOutcome, TokenStore,
    View,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the login result channel.
/// Submissions are user-driven, so a handful of slots is plenty.
const CHANNEL_BUFFER_SIZE: usize = 8;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// A blocking notice is shown; input only dismisses it
    ShowingNotice,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Submit,
    Return,
    Signup,
}

impl LoginFocus {
    /// Get the next control (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Submit,
            LoginFocus::Submit => LoginFocus::Return,
            LoginFocus::Return => LoginFocus::Signup,
            LoginFocus::Signup => LoginFocus::Email,
        }
    }

    /// Get the previous control (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Signup,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Submit => LoginFocus::Password,
            LoginFocus::Return => LoginFocus::Submit,
            LoginFocus::Signup => LoginFocus::Return,
        }
    }

    /// The form field behind this control, if it is one
    pub fn field(&self) -> Option<Field> {
        match self {
            LoginFocus::Email => Some(Field::Email),
            LoginFocus::Password => Some(Field::Password),
            _ => None,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub api: AuthClient,
    pub store: Arc<dyn TokenStore>,

    // UI State
    pub state: AppState,
    pub view: View,
    /// Pending notices, oldest first. The front one is on screen.
    notices: VecDeque<String>,

    // Login form state
    pub form: LoginForm,
    pub login_focus: LoginFocus,

    // Background task channel
    login_rx: mpsc::Receiver<LoginOutcome>,
    login_tx: mpsc::Sender<LoginOutcome>,
}

impl App {
    /// Create a new application instance from configuration
    pub fn new(config: Config) -> Result<Self> {
        let api_url = config.resolve_api_url()?;
        debug!(%api_url, "API base URL resolved");

        let api = AuthClient::new(&api_url)?;
        let store = open_store(&config)?;

        Ok(Self::with_services(api, store))
    }

    /// Create an application around already constructed services
    pub fn with_services(api: AuthClient, store: Arc<dyn TokenStore>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            api,
            store,

            state: AppState::Normal,
            view: View::Login,
            notices: VecDeque::new(),

            form: LoginForm::new(),
            login_focus: LoginFocus::Email,

            login_rx: rx,
            login_tx: tx,
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        self.form.is_valid()
    }

    /// Submit the login form.
    ///
    /// Does nothing while the form is invalid. Otherwise the request runs on
    /// a background task and this returns immediately; the result arrives
    /// through `check_background_tasks`. A second submit while one is in
    /// flight sends a second request.
    pub fn submit(&mut self) {
        let Some(credentials) = self.form.credentials() else {
            debug!("Submit ignored: form is invalid");
            return;
        };

        let api = self.api.clone();
        let store = Arc::clone(&self.store);
        let tx = self.login_tx.clone();

        tokio::spawn(async move {
            let outcome = submit_login(&api, store.as_ref(), &credentials).await;
            if tx.send(outcome).await.is_err() {
                warn!("Login result dropped: receiver closed");
            }
        });
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(outcome) = self.login_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Show the notice for a finished login and navigate if it succeeded
    fn apply_outcome(&mut self, outcome: LoginOutcome) {
        debug!(?outcome, "Login finished");
        self.show_notice(outcome.notice());

        if let Some(view) = outcome.destination() {
            self.navigate(view);
        }
    }

    /// Queue a blocking notice behind any already shown
    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.notices.push_back(text.into());
        if self.state == AppState::Normal {
            self.state = AppState::ShowingNotice;
        }
    }

    /// The notice currently on screen
    pub fn notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    /// Close the current notice; the next queued one, if any, takes its place
    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
        if self.notices.is_empty() && self.state == AppState::ShowingNotice {
            self.state = AppState::Normal;
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch views. Leaving the login page discards the form.
    pub fn navigate(&mut self, view: View) {
        if self.view == view {
            return;
        }
        info!(from = %self.view, to = %view, "Navigating");

        if self.view == View::Login {
            self.form = LoginForm::new();
        }
        if view == View::Login {
            self.login_focus = LoginFocus::Email;
        }
        self.view = view;
    }

    /// "Return" action of the login page
    pub fn go_home(&mut self) {
        self.navigate(View::Home);
    }

    /// "Go to signup" action of the login page
    pub fn go_signup(&mut self) {
        self.navigate(View::Signup);
    }

    pub fn open_login(&mut self) {
        self.navigate(View::Login);
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reletter_core::{MemoryStore, ACCESS_TOKEN_KEY};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with(base_url: &str) -> (App, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let api = AuthClient::new(base_url).unwrap();
        let app = App::with_services(api, store.clone());
        (app, store)
    }

    fn fill(app: &mut App, email: &str, password: &str) {
        app.form.set_email(email);
        app.form.set_password(password);
    }

    /// Wait for the next login result and apply it
    async fn finish_one(app: &mut App) {
        let outcome = app.login_rx.recv().await.unwrap();
        app.apply_outcome(outcome);
    }

    // -------------------------------------------------------------------------
    // LoginFocus Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_focus_next() {
        assert_eq!(LoginFocus::Email.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::Password.next(), LoginFocus::Submit);
        assert_eq!(LoginFocus::Submit.next(), LoginFocus::Return);
        assert_eq!(LoginFocus::Return.next(), LoginFocus::Signup);
        assert_eq!(LoginFocus::Signup.next(), LoginFocus::Email); // Wraps around
    }

    #[test]
    fn test_login_focus_prev() {
        assert_eq!(LoginFocus::Email.prev(), LoginFocus::Signup); // Wraps around
        assert_eq!(LoginFocus::Signup.prev(), LoginFocus::Return);
        assert_eq!(LoginFocus::Return.prev(), LoginFocus::Submit);
        assert_eq!(LoginFocus::Submit.prev(), LoginFocus::Password);
        assert_eq!(LoginFocus::Password.prev(), LoginFocus::Email);
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_return_and_signup_only_navigate() {
        let (mut app, store) = app_with("http://127.0.0.1:9");

        app.go_home();
        assert_eq!(app.view, View::Home);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.notice().is_none());

        app.open_login();
        app.go_signup();
        assert_eq!(app.view, View::Signup);
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_leaving_login_discards_form() {
        let (mut app, _store) = app_with("http://127.0.0.1:9");
        fill(&mut app, "user@example.com", "secret");
        app.login_focus = LoginFocus::Signup;

        app.go_signup();
        app.open_login();

        assert_eq!(app.form.email(), "");
        assert_eq!(app.form.password(), "");
        assert_eq!(app.login_focus, LoginFocus::Email);
    }

    // -------------------------------------------------------------------------
    // Submission Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_invalid_form_cannot_submit() {
        let (mut app, _store) = app_with("http://127.0.0.1:9");
        fill(&mut app, "not-an-email", "secret");
        assert!(!app.can_submit());

        // No runtime here: a spawn would panic, so this also proves nothing is sent.
        app.submit();
        assert_eq!(app.view, View::Login);
        assert!(app.notice().is_none());
    }

    #[tokio::test]
    async fn test_successful_submit_stores_token_then_navigates_to_main() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .and(body_json(json!({"email": "user@example.com", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, store) = app_with(&server.uri());
        fill(&mut app, "user@example.com", "secret");
        assert!(app.can_submit());

        app.submit();
        finish_one(&mut app).await;

        assert_eq!(app.view, View::Main);
        assert_eq!(app.state, AppState::ShowingNotice);
        assert_eq!(app.notice(), Some("Login successful!"));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        app.dismiss_notice();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.view, View::Main);
    }

    #[tokio::test]
    async fn test_rejected_submit_stays_on_login_with_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let (mut app, store) = app_with(&server.uri());
        fill(&mut app, "user@example.com", "wrong");

        app.submit();
        finish_one(&mut app).await;

        assert_eq!(app.view, View::Login);
        assert_eq!(app.notice(), Some("Invalid credentials"));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        // The form keeps its values so the user can resubmit.
        assert_eq!(app.form.email(), "user@example.com");
    }

    #[tokio::test]
    async fn test_double_submit_shows_every_notice_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, store) = app_with(&server.uri());
        fill(&mut app, "user@example.com", "secret");

        // Both attempts finish before a single drain, as between two ticks
        app.submit();
        let first = app.login_rx.recv().await.unwrap();
        app.submit();
        let second = app.login_rx.recv().await.unwrap();
        app.login_tx.send(first).await.unwrap();
        app.login_tx.send(second).await.unwrap();

        app.check_background_tasks();

        assert_eq!(app.view, View::Main);
        assert_eq!(app.state, AppState::ShowingNotice);
        assert_eq!(app.notice(), Some("Invalid credentials"));

        app.dismiss_notice();
        assert_eq!(app.state, AppState::ShowingNotice);
        assert_eq!(app.notice(), Some("Login successful!"));

        app.dismiss_notice();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.notice().is_none());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
    }
}
