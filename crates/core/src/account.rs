//! Users and registration.

use core::fmt;

use thiserror::Error;

use crate::types::{Email, EmailError, UserId};

/// A signed-in shopper or administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: Option<String>,
    pub is_admin: bool,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Why a registration form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("mobile number must be {} digits", Registration::MOBILE_DIGITS)]
    InvalidMobileNumber,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Sign-up form as entered by the shopper.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("mobile_no", &self.mobile_no)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl Registration {
    /// Length of a local mobile number (e.g. `09171234567`).
    pub const MOBILE_DIGITS: usize = 11;

    /// Validate the form and return the normalized email.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] found, checking fields in
    /// form order.
    pub fn validate(&self) -> Result<Email, RegistrationError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("mobile number", &self.mobile_no),
            ("password", &self.password),
            ("password confirmation", &self.confirm_password),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(RegistrationError::MissingField(*name));
        }

        let email = Email::parse(&self.email)?;

        let mobile = self.mobile_no.trim();
        if mobile.len() != Self::MOBILE_DIGITS || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(RegistrationError::InvalidMobileNumber);
        }

        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Registration {
        Registration {
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: "maria@example.ph".to_string(),
            mobile_no: "09171234567".to_string(),
            password: "s3cret-pass".to_string(),
            confirm_password: "s3cret-pass".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(form().validate().map(|e| e.to_string()), Ok("maria@example.ph".to_string()));
    }

    #[test]
    fn test_missing_field_reported_in_form_order() {
        let mut f = form();
        f.last_name = " ".to_string();
        f.password = String::new();
        assert_eq!(f.validate(), Err(RegistrationError::MissingField("last name")));
    }

    #[test]
    fn test_mobile_and_password_checks() {
        let mut f = form();
        f.mobile_no = "0917-123".to_string();
        assert_eq!(f.validate(), Err(RegistrationError::InvalidMobileNumber));

        let mut f = form();
        f.confirm_password = "different".to_string();
        assert_eq!(f.validate(), Err(RegistrationError::PasswordMismatch));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", form());
        assert!(!debug.contains("s3cret-pass"));
        assert!(debug.contains("[REDACTED]"));
    }
}
