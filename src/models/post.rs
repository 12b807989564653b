use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a post.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PostInput {
    /// The title of the post.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// The body of the post.
    /// Must be between 1 and 5000 characters.
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// Partial update payload for a post. Only provided fields are written.
#[derive(Debug, Deserialize, Validate)]
pub struct PostUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Represents a post entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique identifier for the post (UUID v4).
    pub id: Uuid,
    /// Identifier of the business that owns the post.
    pub business_id: Uuid,
    /// The title of the post.
    pub title: String,
    /// The body of the post.
    pub content: String,
    /// Timestamp of when the post was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the post.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Creates a new `Post` from `PostInput` and the owning business id.
    /// Sets `created_at`, `updated_at` to the current time, and `id` to a new UUID.
    pub fn new(input: PostInput, business_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            business_id,
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        }
    }
}
