/// Error types for the API service
///
/// Every handler returns [`Result`]; errors are rendered as JSON responses and
/// never escape the request that produced them.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

/// Result type for api-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed one or more validation rules
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Well-formed request rejected by a domain rule
    #[error("{0}")]
    BadRequest(String),

    /// Resource missing, or its id is malformed
    #[error("{0}")]
    NotFound(String),

    /// Caller is acting on a resource it does not own
    #[error("{0}")]
    Unauthorized(String),

    /// Store operation failed
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }

    pub fn user_not_found() -> Self {
        AppError::NotFound("User not found".to_string())
    }

    pub fn not_authorized() -> Self {
        AppError::Unauthorized("User not authorized".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(serde_json::json!({
                "errors": errors,
                "status": status.as_u16(),
            })),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Server error",
                    "status": status.as_u16(),
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadRequest("Post already liked".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::post_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::not_authorized().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_validation_body_lists_field_errors() {
        let body = body_json(AppError::Validation(vec![FieldError::new(
            "text",
            "Text is required",
        )]))
        .await;

        assert_eq!(body["status"], 400);
        assert_eq!(body["errors"][0]["field"], "text");
        assert_eq!(body["errors"][0]["message"], "Text is required");
    }

    #[actix_web::test]
    async fn test_store_errors_are_not_leaked() {
        let body = body_json(AppError::Database("relation \"posts\" does not exist".into())).await;

        assert_eq!(body["error"], "Server error");
        assert_eq!(body["status"], 500);
    }
}
