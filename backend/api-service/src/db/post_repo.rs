use super::{PostMutation, PostStore};
use crate::error::Result;
use crate::models::{Comment, Like, Post};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Post documents in PostgreSQL. Likes and comments live in JSONB columns on
/// the post row so a post is always read and written as one document.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    name: String,
    avatar: String,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user: row.user_id,
            text: row.text,
            name: row.name,
            avatar: row.avatar,
            likes: row.likes.0,
            comments: row.comments.0,
            date: row.created_at,
        }
    }
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, likes, comments, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, likes, comments, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, text, name, avatar, likes, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.user)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_post(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit; concurrent mutations of this post queue here.
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, likes, comments, created_at
            FROM posts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut post = Post::from(row);
        mutation(&mut post)?;

        sqlx::query("UPDATE posts SET likes = $1, comments = $2 WHERE id = $3")
            .bind(Json(&post.likes))
            .bind(Json(&post.comments))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(post))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
