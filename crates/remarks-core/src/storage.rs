//! Storage engine - persistence rules and threaded retrieval on top of the
//! repository ports.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::{DomainError, Entity};
use crate::ports::{CommentRepository, PostRepository};

/// Owns posts and comments, enforces the relational rules between them and
/// rebuilds the derived `comments` and `replies` lists on read.
pub struct StorageEngine {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    page_size: u64,
}

impl StorageEngine {
    /// A `page_size` of zero is raised to one.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        page_size: u64,
    ) -> Self {
        Self {
            posts,
            comments,
            page_size: page_size.max(1),
        }
    }

    pub async fn add_post(
        &self,
        title: String,
        content: String,
        allow_comments: bool,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .insert(Post::new(title, content, allow_comments))
            .await?;

        tracing::debug!(post_id = %post.id, allow_comments, "Post created");
        Ok(post)
    }

    /// Add a comment to a post, optionally as a reply.
    ///
    /// The post must exist and allow comments. A parent must exist and belong to
    /// the same post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        parent_comment_id: Option<Uuid>,
        content: String,
    ) -> Result<Comment, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound(Entity::Post))?;

        if !post.allow_comments {
            tracing::warn!(post_id = %post_id, "Rejected comment: comments are disabled");
            return Err(DomainError::RuleViolation(
                "comments are not allowed for this post".to_string(),
            ));
        }

        if let Some(parent_id) = parent_comment_id {
            let parent = self
                .comments
                .find_by_id(parent_id)
                .await?
                .ok_or(DomainError::NotFound(Entity::Comment))?;

            if parent.post_id != post_id {
                tracing::warn!(
                    post_id = %post_id,
                    parent_comment_id = %parent_id,
                    "Rejected reply: parent comment is on another post"
                );
                return Err(DomainError::RuleViolation(
                    "parent comment belongs to a different post".to_string(),
                ));
            }
        }

        let comment = self
            .comments
            .insert(Comment::new(post_id, parent_comment_id, content))
            .await?;

        tracing::debug!(
            comment_id = %comment.id,
            post_id = %post_id,
            parent_comment_id = ?parent_comment_id,
            "Comment created"
        );
        Ok(comment)
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.find_all().await?;
        for post in &mut posts {
            post.comments = self.comments.ids_by_post(post.id).await?;
        }
        Ok(posts)
    }

    pub async fn get_post_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Entity::Post))?;

        post.comments = self.comments.ids_by_post(post.id).await?;
        Ok(post)
    }

    /// One page of a post's comments in insertion order. `page` is 1-based;
    /// anything below 1 reads as the first page.
    pub async fn get_comments(
        &self,
        post_id: Uuid,
        page: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        let (offset, limit) = page_bounds(page, self.page_size);
        let mut comments = self
            .comments
            .find_page_by_post(post_id, offset, limit)
            .await?;
        self.attach_replies(&mut comments).await?;

        tracing::debug!(
            post_id = %post_id,
            page,
            offset,
            returned = comments.len(),
            "Fetched comment page"
        );
        Ok(comments)
    }

    pub async fn get_comment_by_id(&self, id: Uuid) -> Result<Comment, DomainError> {
        let mut comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Entity::Comment))?;

        comment.replies = self.comments.ids_by_parent(comment.id).await?;
        Ok(comment)
    }

    /// Always at least one page, so an exact multiple of the page size gets a
    /// trailing empty page.
    pub async fn get_number_of_comment_pages(
        &self,
        post_id: Uuid,
    ) -> Result<u64, DomainError> {
        let count = self.comments.count_by_post(post_id).await?;
        Ok(count / self.page_size + 1)
    }

    /// Direct replies to a comment, each with its own replies attached.
    pub async fn get_replies(&self, comment_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let mut replies = self.comments.find_by_parent(comment_id).await?;
        self.attach_replies(&mut replies).await?;
        Ok(replies)
    }

    async fn attach_replies(&self, comments: &mut [Comment]) -> Result<(), DomainError> {
        for comment in comments.iter_mut() {
            comment.replies = self.comments.ids_by_parent(comment.id).await?;
        }
        Ok(())
    }
}

/// SQL stores bind OFFSET and LIMIT as signed 64-bit integers.
const MAX_BOUND: u64 = i64::MAX as u64;

/// Offset and limit of a 1-based page, both capped at `i64::MAX`. A capped
/// offset lies past any stored row, so the page reads as empty.
fn page_bounds(page: i64, page_size: u64) -> (u64, u64) {
    let page = u64::try_from(page).unwrap_or(0).max(1);
    let offset = page_size.saturating_mul(page - 1).min(MAX_BOUND);
    (offset, page_size.min(MAX_BOUND))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_first_pages() {
        assert_eq!(page_bounds(1, 2), (0, 2));
        assert_eq!(page_bounds(2, 2), (2, 2));
        assert_eq!(page_bounds(5, 10), (40, 10));
    }

    #[test]
    fn test_page_bounds_clamps_non_positive_pages() {
        assert_eq!(page_bounds(0, 10), (0, 10));
        assert_eq!(page_bounds(-3, 10), (0, 10));
        assert_eq!(page_bounds(i64::MIN, 10), (0, 10));
    }

    #[test]
    fn test_page_bounds_stay_within_signed_range() {
        assert_eq!(page_bounds(i64::MAX, 10), (MAX_BOUND, 10));
        assert_eq!(page_bounds(i64::MAX, u64::MAX), (MAX_BOUND, MAX_BOUND));
        assert_eq!(page_bounds(2, u64::MAX), (MAX_BOUND, MAX_BOUND));
    }

    mod far_pages {
        use std::sync::Mutex;

        use async_trait::async_trait;

        use super::*;
        use crate::error::RepoError;
        use crate::ports::BaseRepository;

        /// Records the bounds of every page read and returns nothing.
        #[derive(Default)]
        struct PageRecorder {
            bounds: Mutex<Vec<(u64, u64)>>,
        }

        #[async_trait]
        impl BaseRepository<Post, Uuid> for PageRecorder {
            async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
                Ok(None)
            }

            async fn insert(&self, post: Post) -> Result<Post, RepoError> {
                Ok(post)
            }
        }

        #[async_trait]
        impl PostRepository for PageRecorder {
            async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
                Ok(vec![])
            }
        }

        #[async_trait]
        impl BaseRepository<Comment, Uuid> for PageRecorder {
            async fn find_by_id(&self, _id: Uuid) -> Result<Option<Comment>, RepoError> {
                Ok(None)
            }

            async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
                Ok(comment)
            }
        }

        #[async_trait]
        impl CommentRepository for PageRecorder {
            async fn ids_by_post(&self, _post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
                Ok(vec![])
            }

            async fn find_page_by_post(
                &self,
                _post_id: Uuid,
                offset: u64,
                limit: u64,
            ) -> Result<Vec<Comment>, RepoError> {
                if let Ok(mut bounds) = self.bounds.lock() {
                    bounds.push((offset, limit));
                }
                Ok(vec![])
            }

            async fn count_by_post(&self, _post_id: Uuid) -> Result<u64, RepoError> {
                Ok(0)
            }

            async fn ids_by_parent(&self, _parent_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
                Ok(vec![])
            }

            async fn find_by_parent(&self, _parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
                Ok(vec![])
            }
        }

        #[tokio::test]
        async fn test_huge_page_reads_empty_with_bindable_bounds() {
            let recorder = Arc::new(PageRecorder::default());
            let engine = StorageEngine::new(recorder.clone(), recorder.clone(), 10);

            let page = engine.get_comments(Uuid::new_v4(), i64::MAX).await.unwrap();
            assert!(page.is_empty());

            let bounds = recorder.bounds.lock().unwrap().clone();
            assert_eq!(bounds.len(), 1);
            let (offset, limit) = bounds[0];
            assert!(i64::try_from(offset).is_ok());
            assert!(i64::try_from(limit).is_ok());
        }
    }
}
