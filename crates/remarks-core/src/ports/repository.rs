use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::RepoError;

/// Generic repository trait for append-only entities.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// Post repository.
///
/// Returned posts carry an empty `comments` list; callers attach it.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts in storage order.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
///
/// Every listing is in storage order (oldest first). Returned comments carry an
/// empty `replies` list; callers attach it.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Ids of all comments on a post.
    async fn ids_by_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// At most `limit` comments on a post, skipping the first `offset`.
    async fn find_page_by_post(
        &self,
        post_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError>;

    /// Number of comments on a post.
    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Ids of the direct replies to a comment.
    async fn ids_by_parent(&self, parent_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Direct replies to a comment.
    async fn find_by_parent(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
