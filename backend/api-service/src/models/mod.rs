/// Data models for the API service
///
/// - `User`: account records
/// - `Post`: post documents with their embedded likes and comments
pub mod post;
pub mod user;

pub use post::{Comment, Like, Post};
pub use user::{gravatar_url, User};
