use super::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Approval marker; at most one per user per post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Post document. `name` and `avatar` are copied from the author when the
/// post is created and are not updated if the profile changes later; the
/// same holds for each comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &User, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: author.id,
            text: text.to_string(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    /// Put the user's like at the front. Returns `false`, leaving the list
    /// untouched, if the user already liked the post.
    pub fn like(&mut self, user_id: Uuid) -> bool {
        if self.is_liked_by(user_id) {
            return false;
        }
        self.likes.insert(0, Like { user: user_id });
        true
    }

    /// Drop the user's like. Returns `false` if there was none.
    pub fn unlike(&mut self, user_id: Uuid) -> bool {
        let before = self.likes.len();
        self.likes.retain(|like| like.user != user_id);
        self.likes.len() != before
    }

    /// Prepend a comment carrying a snapshot of the author's name and avatar.
    pub fn add_comment(&mut self, author: &User, text: &str) -> &Comment {
        self.comments.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                user: author.id,
                text: text.to_string(),
                name: author.name.clone(),
                avatar: author.avatar.clone(),
                date: Utc::now(),
            },
        );
        &self.comments[0]
    }

    pub fn find_comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Remove one comment by id, keeping the order of the rest.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }
}
