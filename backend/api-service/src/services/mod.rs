/// Business logic layer for api-service
///
/// - Post service: post CRUD, likes and comments
/// - User service: registration and account lookup
pub mod posts;
pub mod users;

pub use posts::PostService;
pub use users::UserService;
