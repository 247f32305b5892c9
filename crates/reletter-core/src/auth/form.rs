//! Login form state and the credential schema.
//!
//! The form keeps one value per field and re-validates the whole schema on
//! every change. Field errors are only surfaced once the user has edited that
//! field, while `is_valid` always reflects the full schema, so the submit
//! control starts out disabled on an empty form.

use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input (RFC 5321 path limit)
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

const EMAIL_REQUIRED: &str = "Email is required.";
const EMAIL_INVALID: &str = "Please enter a valid email address.";
const PASSWORD_REQUIRED: &str = "Password is required.";

// ============================================================================
// Credentials
// ============================================================================

/// Email and password as sent to the login endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Email is required."))]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Form State
// ============================================================================

/// A field of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    /// Field name as used by the schema and the request body
    pub fn name(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
        }
    }

    fn max_length(&self) -> usize {
        match self {
            Field::Email => MAX_EMAIL_LENGTH,
            Field::Password => MAX_PASSWORD_LENGTH,
        }
    }
}

/// Typed login form state with a derived validity flag.
#[derive(Debug, Clone)]
pub struct LoginForm {
    values: Credentials,
    email_touched: bool,
    password_touched: bool,
    email_error: Option<String>,
    password_error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let mut form = Self {
            values: Credentials::default(),
            email_touched: false,
            password_touched: false,
            email_error: None,
            password_error: None,
        };
        form.revalidate();
        form
    }

    pub fn email(&self) -> &str {
        &self.values.email
    }

    pub fn password(&self) -> &str {
        &self.values.password
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => self.email(),
            Field::Password => self.password(),
        }
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.values.email = value.into();
        self.email_touched = true;
        self.revalidate();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.values.password = value.into();
        self.password_touched = true;
        self.revalidate();
    }

    /// Append a typed character to a field.
    /// Returns false when the character was rejected.
    pub fn push_char(&mut self, field: Field, c: char) -> bool {
        if !can_add_char(field, self.value(field).chars().count(), c) {
            return false;
        }
        let mut value = self.value(field).to_string();
        value.push(c);
        self.set(field, value);
        true
    }

    /// Remove the last character of a field
    pub fn pop_char(&mut self, field: Field) {
        let mut value = self.value(field).to_string();
        value.pop();
        self.set(field, value);
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Email => self.set_email(value),
            Field::Password => self.set_password(value),
        }
    }

    /// True when every field passes the schema
    pub fn is_valid(&self) -> bool {
        self.email_error.is_none() && self.password_error.is_none()
    }

    /// Error message for a field, once the field has been edited
    pub fn error(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email if self.email_touched => self.email_error.as_deref(),
            Field::Password if self.password_touched => self.password_error.as_deref(),
            _ => None,
        }
    }

    /// Surface errors for every field, edited or not
    pub fn touch_all(&mut self) {
        self.email_touched = true;
        self.password_touched = true;
    }

    /// Snapshot of the values, only when the form is valid
    pub fn credentials(&self) -> Option<Credentials> {
        self.is_valid().then(|| self.values.clone())
    }

    fn revalidate(&mut self) {
        match self.values.validate() {
            Ok(()) => {
                self.email_error = None;
                self.password_error = None;
            }
            Err(errors) => {
                self.email_error = field_message(&errors, Field::Email);
                self.password_error = field_message(&errors, Field::Password);
            }
        }
    }
}

/// Pick the message to show for a field.
/// A missing value reports "required" rather than a format error.
fn field_message(errors: &ValidationErrors, field: Field) -> Option<String> {
    let field_errors = errors.field_errors();
    let list = field_errors.get(field.name())?;
    let chosen = list
        .iter()
        .find(|e| e.code == "length")
        .or_else(|| list.first())?;

    let message = chosen
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match (field, chosen.code.as_ref()) {
            (Field::Email, "email") => EMAIL_INVALID.to_string(),
            (Field::Email, _) => EMAIL_REQUIRED.to_string(),
            (Field::Password, _) => PASSWORD_REQUIRED.to_string(),
        });
    Some(message)
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character may be added to a field of the given length
pub fn can_add_char(field: Field, current_len: usize, c: char) -> bool {
    current_len < field.max_length() && is_valid_input_char(c)
}
