//! Form schemas for login and registration. Validation is a pure function of
//! the complete form values and returns at most one message per field, so it
//! can be checked without any form or network around it.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::{collections::BTreeMap, sync::LazyLock};

/// Minimum password length for new accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub mod fields {
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirm_password";

    /// Display label and placeholder of a form field.
    #[must_use]
    pub fn label(field: &str) -> Option<(&'static str, Option<&'static str>)> {
        match field {
            FULL_NAME => Some(("Full Name", Some("Alen Jake"))),
            EMAIL => Some(("Email Address", Some("example@mail.com"))),
            PASSWORD => Some(("Password", None)),
            CONFIRM_PASSWORD => Some(("Confirm Password", None)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginValues {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone, Debug, Default)]
pub struct RegisterValues {
    pub full_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Field name to message. The first failing rule of a field wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

// Compiled once; `None` only if the literal pattern were invalid.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(email))
}

#[must_use]
pub fn validate_login(values: &LoginValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !valid_email(&values.email) {
        errors.insert(fields::EMAIL, "Invalid email");
    }
    if values.password.expose_secret().is_empty() {
        errors.insert(fields::PASSWORD, "Password is required");
    }

    errors
}

#[must_use]
pub fn validate_register(values: &RegisterValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if values.full_name.is_empty() {
        errors.insert(fields::FULL_NAME, "Full name is required");
    }
    if !valid_email(&values.email) {
        errors.insert(fields::EMAIL, "Invalid email");
    }
    if values.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            fields::PASSWORD,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
    // cross-field rule, reported next to the confirmation input
    if values.password.expose_secret() != values.confirm_password.expose_secret() {
        errors.insert(fields::CONFIRM_PASSWORD, "Passwords do not match");
    }

    errors
}
