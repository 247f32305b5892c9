//! Authentication module for the login page.
//!
//! This module provides:
//! - `LoginForm`: typed form state validated against the credential schema
//! - `TokenStore`: the storage port the access token is written through
//! - `submit_login`: the submission flow and its outcomes
//!
//! The access token is stored under `ACCESS_TOKEN_KEY` and overwritten on
//! every successful login.

pub mod flow;
pub mod form;
pub mod storage;

pub use flow::{submit_login, LoginFailure, LoginOutcome};
pub use form::{Credentials, Field, LoginForm};
pub use storage::{open_store, FileStore, KeychainStore, MemoryStore, TokenStore, ACCESS_TOKEN_KEY};
