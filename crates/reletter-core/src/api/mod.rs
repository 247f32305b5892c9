//! HTTP client module for the Reletter authentication service.
//!
//! This module provides the `AuthClient` for exchanging an email and
//! password for an access token at `{base_url}/users/login`.

pub mod client;
pub mod error;

pub use client::{AuthClient, AuthResult, LOGIN_PATH};
pub use error::ApiError;
