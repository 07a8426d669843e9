use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a top-level item that comments attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub allow_comments: bool,
    /// Ids of the post's comments in insertion order. Derived on read.
    pub comments: Vec<Uuid>,
}

impl Post {
    /// Create a new post with a generated ID and no comments.
    pub fn new(title: String, content: String, allow_comments: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            // Postgres keeps microseconds.
            created_at: Utc::now().trunc_subsecs(6),
            allow_comments,
            comments: Vec::new(),
        }
    }
}
