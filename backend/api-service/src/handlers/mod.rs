/// HTTP handlers for the API
///
/// - Posts: CRUD, likes and comments (authenticated)
/// - Users: registration and current account lookup
/// - Health: readiness and liveness probes
pub mod health;
pub mod posts;
pub mod users;

use crate::error::AppError;
use uuid::Uuid;

/// Parse an id path segment. A malformed id is reported as the given
/// not-found error, the same as a missing resource.
pub(crate) fn parse_id(raw: &str, not_found: fn() -> AppError) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}
