/// Database access layer
///
/// The handlers talk to the stores through the [`UserStore`] and
/// [`PostStore`] traits. Two backends implement them:
/// - `post_repo` / `user_repo`: PostgreSQL via sqlx
/// - `memory`: process-local maps, used by tests and `STORE_BACKEND=memory`
pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::MemoryStore;
pub use post_repo::PgPostRepository;
pub use user_repo::PgUserRepository;

use crate::error::Result;
use crate::models::{Post, User};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// In-place change to a post document, run by [`PostStore::update_post`].
pub type PostMutation = Box<dyn FnOnce(&mut Post) -> Result<()> + Send>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Lookup by normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn insert_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;

    async fn insert_post(&self, post: &Post) -> Result<()>;

    /// Returns `false` if no post had this id.
    async fn delete_post(&self, id: Uuid) -> Result<bool>;

    /// Apply `mutation` to one post atomically: no other mutation of the same
    /// post can run between the read and the write. Returns the updated post,
    /// or `None` if no post had this id. When the mutation fails nothing is
    /// written and its error is returned.
    async fn update_post(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>>;

    async fn health_check(&self) -> Result<()>;
}

/// Shared handles to both stores, cloned into every service.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
}

impl Stores {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            users: store.clone(),
            posts: store,
        }
    }
}
