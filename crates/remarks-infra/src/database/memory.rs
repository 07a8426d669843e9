//! In-memory repositories - used as fallback when PostgreSQL is not configured.
//!
//! Rows are kept in insertion order, which is the storage order every listing
//! returns. Note: Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use remarks_core::domain::{Comment, Post};
use remarks_core::error::RepoError;
use remarks_core::ports::{BaseRepository, CommentRepository, PostRepository};

/// In-memory post table.
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }

        // Only columns are stored; the comment list is derived.
        post.comments.clear();
        rows.push(post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.read().await.clone())
    }
}

/// In-memory comment table.
pub struct InMemoryCommentRepository {
    rows: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    async fn select<F>(&self, filter: F) -> Vec<Comment>
    where
        F: Fn(&Comment) -> bool,
    {
        let rows = self.rows.read().await;
        rows.iter().filter(|c| filter(c)).cloned().collect()
    }

    async fn select_ids<F>(&self, filter: F) -> Vec<Uuid>
    where
        F: Fn(&Comment) -> bool,
    {
        let rows = self.rows.read().await;
        rows.iter().filter(|c| filter(c)).map(|c| c.id).collect()
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint(format!(
                "comment {} already exists",
                comment.id
            )));
        }

        comment.replies.clear();
        rows.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn ids_by_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self.select_ids(|c| c.post_id == post_id).await)
    }

    async fn find_page_by_post(
        &self,
        post_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError> {
        let rows = self.rows.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(rows
            .iter()
            .filter(|c| c.post_id == post_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|c| c.post_id == post_id).count() as u64)
    }

    async fn ids_by_parent(&self, parent_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .select_ids(|c| c.parent_comment_id == Some(parent_id))
            .await)
    }

    async fn find_by_parent(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        Ok(self.select(|c| c.parent_comment_id == Some(parent_id)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(post_id: Uuid, parent: Option<Uuid>, content: &str) -> Comment {
        Comment::new(post_id, parent, content.to_string())
    }

    #[tokio::test]
    async fn test_insert_and_find_post() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new("Hi".into(), "World".into(), true);

        repo.insert(post.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(post.id).await.unwrap(), Some(post));
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_post_id_is_a_constraint_error() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new("Hi".into(), "World".into(), true);

        repo.insert(post.clone()).await.unwrap();
        let err = repo.insert(post).await.unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_derived_lists_are_not_stored() {
        let repo = InMemoryCommentRepository::new();
        let mut c = comment(Uuid::new_v4(), None, "first");
        c.replies.push(Uuid::new_v4());

        let stored = repo.insert(c).await.unwrap();
        assert!(stored.replies.is_empty());
    }

    #[tokio::test]
    async fn test_comment_pages_follow_insertion_order() {
        let repo = InMemoryCommentRepository::new();
        let post_id = Uuid::new_v4();
        let other_post = Uuid::new_v4();

        let mut ids = Vec::new();
        for i in 0..5 {
            let c = repo
                .insert(comment(post_id, None, &format!("c{i}")))
                .await
                .unwrap();
            ids.push(c.id);
            repo.insert(comment(other_post, None, "noise")).await.unwrap();
        }

        let page: Vec<Uuid> = repo
            .find_page_by_post(post_id, 2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(page, ids[2..4].to_vec());

        assert!(repo.find_page_by_post(post_id, 10, 2).await.unwrap().is_empty());
        assert_eq!(repo.count_by_post(post_id).await.unwrap(), 5);
        assert_eq!(repo.ids_by_post(post_id).await.unwrap(), ids);
    }

    #[tokio::test]
    async fn test_replies_by_parent() {
        let repo = InMemoryCommentRepository::new();
        let post_id = Uuid::new_v4();

        let root = repo.insert(comment(post_id, None, "root")).await.unwrap();
        let a = repo
            .insert(comment(post_id, Some(root.id), "a"))
            .await
            .unwrap();
        let b = repo
            .insert(comment(post_id, Some(root.id), "b"))
            .await
            .unwrap();
        repo.insert(comment(post_id, Some(a.id), "nested"))
            .await
            .unwrap();

        assert_eq!(repo.ids_by_parent(root.id).await.unwrap(), vec![a.id, b.id]);

        let replies = repo.find_by_parent(root.id).await.unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].content, "a");
        assert_eq!(replies[1].content, "b");
    }
}
