//! Data Transfer Objects - request/response types for the API.
//!
//! Field names follow the public API (`postID`, `allowComments`, ...).

use serde::{Deserialize, Serialize};

/// Request to create a post. Missing strings read as empty and fail validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_comments: Option<bool>,
}

/// Request to create a comment, optionally as a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(rename = "postID", default)]
    pub post_id: String,
    #[serde(
        rename = "parentCommentID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Query string of the comment listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsQuery {
    pub page: Option<i64>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub allow_comments: bool,
    pub comments: Vec<String>,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    #[serde(rename = "postID")]
    pub post_id: String,
    #[serde(rename = "parentCommentID")]
    pub parent_comment_id: Option<String>,
    pub content: String,
    pub created_at: String,
    pub replies: Vec<String>,
}

/// Number of comment pages for a post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageCountResponse {
    pub pages: u64,
}
