//! # Actix Middleware Library
//!
//! Shared middleware components for the Connect Actix services
//!
//! ## Modules
//! - `jwt_auth`: Bearer token authentication and the `UserId` extractor
//! - `logging`: Request/response logging through `tracing`
//! - `metrics`: Prometheus request metrics and the `/metrics` handler

pub mod jwt_auth;
pub mod logging;
pub mod metrics;

pub use jwt_auth::{AuthError, Claims, JwtAuthMiddleware, UserId};
pub use logging::Logging;
pub use metrics::{serve_metrics, MetricsMiddleware};
