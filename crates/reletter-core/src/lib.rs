//! Core library for the Reletter login page.
//!
//! This crate holds everything that is not terminal rendering:
//!
//! - `auth::form`: typed login form state and its validation schema
//! - `api`: HTTP client for the authentication service
//! - `auth::storage`: the token storage port and its backends
//! - `auth::flow`: the submission flow tying the three together
//! - `config`: configuration loading
//! - `navigation`: the views a login can lead to

pub mod api;
pub mod auth;
pub mod config;
pub mod navigation;

pub use api::{ApiError, AuthClient, AuthResult};
pub use auth::{
    open_store, submit_login, Credentials, Field, FileStore, KeychainStore, LoginFailure,
    LoginForm, LoginOutcome, MemoryStore, TokenStore, ACCESS_TOKEN_KEY,
};
pub use config::{Config, TokenStorage};
pub use navigation::View;
