/// Request validation
///
/// Each request type declares an ordered list of `(field, predicate, message)`
/// rules. Every rule is evaluated, in order, before the handler body runs and
/// all failures are reported together.
use crate::error::{AppError, FieldError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// One validation rule over a request of type `T`.
pub struct Rule<T> {
    pub field: &'static str,
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T> Rule<T> {
    pub fn new(field: &'static str, check: fn(&T) -> bool, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }
}

pub trait Validate: Sized {
    fn rules() -> Vec<Rule<Self>>;

    fn validate(&self) -> Result<()> {
        let errors: Vec<FieldError> = Self::rules()
            .iter()
            .filter(|rule| !(rule.check)(self))
            .map(|rule| FieldError::new(rule.field, rule.message))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.len() <= 254 && EMAIL_REGEX.is_match(value)
}

pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}
