//! # Connect Forms
//!
//! Client-side state for the registration and login forms. Each form owns
//! its field values for as long as it lives; submitting checks the values,
//! logs the attempt and resets the form. Nothing here talks to the API.

mod login;
mod register;

pub use login::{LoginForm, LoginSubmission};
pub use register::{RegisterForm, RegisterSubmission};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Common behaviour of the auth forms.
pub trait Form: Default {
    /// Values handed back by a successful submit.
    type Submission;

    /// Update one field by its input name.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError>;

    /// Validate the current values. On success the form is reset and the
    /// collected values returned; on failure the state is left untouched.
    fn submit(&mut self) -> Result<Self::Submission, FormError>;

    fn reset(&mut self) {
        *self = Self::default();
    }
}
