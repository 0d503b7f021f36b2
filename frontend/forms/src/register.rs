use crate::{Form, FormError};
use serde::Serialize;

/// Sign-up form: `name`, `email`, `password` and the `password2` confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Body accepted by `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterSubmission {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Form for RegisterForm {
    type Submission = RegisterSubmission;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "password2" => &mut self.password2,
            other => return Err(FormError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn submit(&mut self) -> Result<RegisterSubmission, FormError> {
        if self.password != self.password2 {
            tracing::warn!("registration rejected: passwords do not match");
            return Err(FormError::PasswordMismatch);
        }

        let form = std::mem::take(self);
        tracing::debug!("registration submitted");

        Ok(RegisterSubmission {
            name: form.name,
            email: form.email,
            password: form.password,
        })
    }
}
