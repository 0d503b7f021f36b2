/// Post service - post CRUD plus like/unlike and comment operations
use crate::db::{PostMutation, Stores};
use crate::error::{AppError, Result};
use crate::models::{Comment, Like, Post};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    stores: Stores,
}

impl PostService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn load_post(&self, post_id: Uuid) -> Result<Post> {
        self.stores
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.stores.posts.list_posts().await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        self.load_post(post_id).await
    }

    /// Create a post owned by `author_id`. `text` must already be validated.
    pub async fn create_post(&self, author_id: Uuid, text: &str) -> Result<Post> {
        let author = self
            .stores
            .users
            .find_user(author_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        let post = Post::new(&author, text);
        self.stores.posts.insert_post(&post).await?;

        tracing::info!(post_id = %post.id, user_id = %author_id, "post created");
        Ok(post)
    }

    /// Delete a post; only its author may do so. Returns the removed post.
    pub async fn delete_post(&self, caller: Uuid, post_id: Uuid) -> Result<Post> {
        let post = self.load_post(post_id).await?;

        if post.user != caller {
            tracing::warn!(%post_id, user_id = %caller, "rejected delete of another user's post");
            return Err(AppError::not_authorized());
        }

        if !self.stores.posts.delete_post(post_id).await? {
            return Err(AppError::post_not_found());
        }

        tracing::info!(%post_id, user_id = %caller, "post deleted");
        Ok(post)
    }

    /// Run a check-and-change on one post atomically in the store.
    async fn mutate_post(&self, post_id: Uuid, mutation: PostMutation) -> Result<Post> {
        self.stores
            .posts
            .update_post(post_id, mutation)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    pub async fn like_post(&self, caller: Uuid, post_id: Uuid) -> Result<Vec<Like>> {
        let post = self
            .mutate_post(
                post_id,
                Box::new(move |post: &mut Post| {
                    if post.like(caller) {
                        Ok(())
                    } else {
                        Err(AppError::BadRequest("Post already liked".to_string()))
                    }
                }),
            )
            .await?;

        Ok(post.likes)
    }

    pub async fn unlike_post(&self, caller: Uuid, post_id: Uuid) -> Result<Vec<Like>> {
        let post = self
            .mutate_post(
                post_id,
                Box::new(move |post: &mut Post| {
                    if post.unlike(caller) {
                        Ok(())
                    } else {
                        Err(AppError::BadRequest(
                            "Post has not yet been liked".to_string(),
                        ))
                    }
                }),
            )
            .await?;

        Ok(post.likes)
    }

    /// Add a comment to a post. The author and the post are fetched
    /// concurrently; both must exist before anything is written.
    pub async fn add_comment(
        &self,
        caller: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> Result<Vec<Comment>> {
        let (author, post) = tokio::try_join!(
            self.stores.users.find_user(caller),
            self.stores.posts.find_post(post_id),
        )?;

        post.ok_or_else(AppError::post_not_found)?;
        let author = author.ok_or_else(AppError::user_not_found)?;

        let text = text.to_string();
        let post = self
            .mutate_post(
                post_id,
                Box::new(move |post: &mut Post| {
                    post.add_comment(&author, &text);
                    Ok(())
                }),
            )
            .await?;

        tracing::debug!(%post_id, user_id = %caller, "comment added");
        Ok(post.comments)
    }

    /// Remove a comment; only its author may do so. Returns the remaining
    /// comments in their original order.
    pub async fn delete_comment(
        &self,
        caller: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Vec<Comment>> {
        let post = self
            .mutate_post(
                post_id,
                Box::new(move |post: &mut Post| {
                    let comment = post
                        .find_comment(comment_id)
                        .ok_or_else(comment_not_found)?;

                    if comment.user != caller {
                        return Err(AppError::not_authorized());
                    }

                    post.remove_comment(comment_id);
                    Ok(())
                }),
            )
            .await?;

        Ok(post.comments)
    }
}

pub fn comment_not_found() -> AppError {
    AppError::NotFound("Comment does not exist".to_string())
}
