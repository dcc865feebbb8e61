//! Customer identity types.

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// Profile of a signed-up customer.
///
/// This is what the session holds for the logged-in customer and what order
/// headers are built from; it never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
}

impl CustomerProfile {
    /// "First Last", as shown on orders.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Errors from validating a sign-up form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The email is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Raw sign-up form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// A sign-up that passed validation.
///
/// The password is still plaintext here; the caller hashes it before
/// anything is stored.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub profile: CustomerProfile,
    pub password: String,
}

impl Registration {
    /// Check required fields, then the password confirmation, then the email.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] found.
    pub fn validate(self) -> Result<ValidRegistration, RegistrationError> {
        let required = [
            ("first_name", self.first_name.trim()),
            ("last_name", self.last_name.trim()),
            ("company_name", self.company_name.trim()),
            ("email", self.email.trim()),
        ];
        if let Some(&(field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(RegistrationError::MissingField(field));
        }
        if self.password.is_empty() {
            return Err(RegistrationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        let email = Email::parse(&self.email)?;
        Ok(ValidRegistration {
            profile: CustomerProfile {
                email,
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                company_name: self.company_name.trim().to_string(),
            },
            password: self.password,
        })
    }
}
