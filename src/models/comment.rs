use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a comment on a post.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentInput {
    /// The comment text. Must be between 1 and 2000 characters.
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// Update payload for a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentUpdate {
    #[validate(length(min = 1, max = 2000))]
    pub content: Option<String>,
}

impl CommentUpdate {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// Represents a comment entity. A comment belongs to exactly one post and is
/// authored by a business; it is always addressed within its post's scope.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique identifier for the comment (UUID v4).
    pub id: Uuid,
    /// Identifier of the post the comment is on.
    pub post_id: Uuid,
    /// Identifier of the business that authored the comment.
    pub business_id: Uuid,
    /// The comment text.
    pub content: String,
    /// Timestamp of when the comment was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last edit to the comment.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new `Comment` from its input, post, and author.
    pub fn new(input: CommentInput, post_id: Uuid, business_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            business_id,
            content: input.content,
            created_at: now,
            updated_at: now,
        }
    }
}
