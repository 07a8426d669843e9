//! Tunable size limits for posts, comments and comment pages.

/// Length limits and page size, loaded from configuration by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_post_title_length: usize,
    pub max_post_content_length: usize,
    pub max_comment_length: usize,
    /// Number of comments per page. Never zero.
    pub comments_page_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_post_title_length: 200,
            max_post_content_length: 10_000,
            max_comment_length: 2_000,
            comments_page_size: 10,
        }
    }
}
