use super::{PostMutation, PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Post, User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store backing both users and posts.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn update_post(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        let Some(stored) = posts.get_mut(&id) else {
            return Ok(None);
        };

        let mut updated = stored.clone();
        mutation(&mut updated)?;
        *stored = updated.clone();

        Ok(Some(updated))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
