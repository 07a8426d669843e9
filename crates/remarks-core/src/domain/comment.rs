use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - either top-level on a post or a reply to another comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Ids of direct replies in insertion order. Derived on read.
    pub replies: Vec<Uuid>,
}

impl Comment {
    /// Create a new comment on `post_id`, optionally replying to `parent_comment_id`.
    pub fn new(post_id: Uuid, parent_comment_id: Option<Uuid>, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            parent_comment_id,
            content,
            created_at: Utc::now().trunc_subsecs(6),
            replies: Vec::new(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_comment_id.is_none()
    }
}
