use crate::{Form, FormError};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginSubmission {
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    type Submission = LoginSubmission;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "email" => self.email = value.to_string(),
            "password" => self.password = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<LoginSubmission, FormError> {
        let LoginForm { email, password } = std::mem::take(self);
        tracing::debug!("login submitted");
        Ok(LoginSubmission { email, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_returns_values_and_resets() {
        let mut form = LoginForm::default();
        form.set_field("email", "jane@example.com").unwrap();
        form.set_field("password", "secret1").unwrap();

        let submission = form.submit().unwrap();
        assert_eq!(submission.email, "jane@example.com");
        assert_eq!(submission.password, "secret1");
        assert_eq!(form, LoginForm::default());
    }

    #[test]
    fn test_submit_log_omits_credentials() {
        let mut form = LoginForm::default();
        form.set_field("email", "jane@example.com").unwrap();
        form.set_field("password", "secret1").unwrap();

        let (submission, logs) = crate::test_support::capture_logs(|| form.submit());
        assert!(submission.is_ok());
        assert!(logs.contains("login submitted"));
        assert!(!logs.contains("jane@example.com"));
        assert!(!logs.contains("secret1"));
    }

    #[test]
    fn test_reset_clears_fields() {
        let mut form = LoginForm::default();
        form.set_field("email", "jane@example.com").unwrap();
        form.reset();
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_unknown_field_leaves_state() {
        let mut form = LoginForm::default();
        assert!(form.set_field("password2", "x").is_err());
        assert_eq!(form, LoginForm::default());
    }
}
