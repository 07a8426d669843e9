//! Comment service - validates requests, applies defaults and delegates to the
//! storage engine.

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::{DomainError, Entity};
use crate::limits::Limits;
use crate::storage::StorageEngine;

/// Request to create a post.
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    /// Defaults to `true`.
    pub allow_comments: Option<bool>,
}

/// Request to create a comment.
#[derive(Debug, Clone, Default)]
pub struct CreateComment {
    pub post_id: String,
    /// `None` or an empty string makes a top-level comment.
    pub parent_comment_id: Option<String>,
    pub content: String,
}

/// Request for one page of a post's comments.
#[derive(Debug, Clone, Default)]
pub struct ListComments {
    pub post_id: String,
    /// Defaults to 0, which reads as the first page.
    pub page: Option<i64>,
}

/// Entry point for every post and comment operation.
pub struct CommentService {
    engine: StorageEngine,
    limits: Limits,
}

impl CommentService {
    pub fn new(engine: StorageEngine, limits: Limits) -> Self {
        Self { engine, limits }
    }

    pub async fn create_post(&self, req: CreatePost) -> Result<Post, DomainError> {
        let max_title = self.limits.max_post_title_length;
        let max_content = self.limits.max_post_content_length;

        if req.title.is_empty() {
            return Err(DomainError::invalid("title is empty"));
        }
        if req.content.is_empty() {
            return Err(DomainError::invalid("content is empty"));
        }
        if req.title.chars().count() > max_title {
            return Err(DomainError::invalid(format!(
                "title is too long (maximum {max_title} chars)"
            )));
        }
        if req.content.chars().count() > max_content {
            return Err(DomainError::invalid(format!(
                "content is too long (maximum {max_content} chars)"
            )));
        }

        self.engine
            .add_post(req.title, req.content, req.allow_comments.unwrap_or(true))
            .await
    }

    pub async fn create_comment(&self, req: CreateComment) -> Result<Comment, DomainError> {
        let max_content = self.limits.max_comment_length;

        if req.post_id.is_empty() {
            return Err(DomainError::invalid("postID is empty"));
        }
        if req.content.is_empty() {
            return Err(DomainError::invalid("content is empty"));
        }
        if req.content.chars().count() > max_content {
            return Err(DomainError::invalid(format!(
                "content is too long (maximum {max_content} chars)"
            )));
        }

        let post_id = parse_id(&req.post_id, Entity::Post)?;
        let parent_comment_id = match req.parent_comment_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw, Entity::Comment)?),
        };

        self.engine
            .add_comment(post_id, parent_comment_id, req.content)
            .await
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.engine.get_posts().await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, DomainError> {
        self.engine.get_post_by_id(parse_id(id, Entity::Post)?).await
    }

    pub async fn list_comments(&self, req: ListComments) -> Result<Vec<Comment>, DomainError> {
        let post_id = parse_id(&req.post_id, Entity::Post)?;
        self.engine
            .get_comments(post_id, req.page.unwrap_or(0))
            .await
    }

    pub async fn get_comment(&self, id: &str) -> Result<Comment, DomainError> {
        self.engine
            .get_comment_by_id(parse_id(id, Entity::Comment)?)
            .await
    }

    pub async fn count_comment_pages(&self, post_id: &str) -> Result<u64, DomainError> {
        self.engine
            .get_number_of_comment_pages(parse_id(post_id, Entity::Post)?)
            .await
    }

    pub async fn get_replies(&self, comment_id: &str) -> Result<Vec<Comment>, DomainError> {
        self.engine
            .get_replies(parse_id(comment_id, Entity::Comment)?)
            .await
    }
}

/// A string that is not a UUID cannot name a stored row.
fn parse_id(raw: &str, entity: Entity) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFound(entity))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::RepoError;
    use crate::ports::{BaseRepository, CommentRepository, PostRepository};

    /// Repository stub that stores nothing and counts how often it is hit.
    /// A broken store fails every call.
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
        broken: bool,
    }

    impl CountingStore {
        fn hit(&self) -> Result<(), RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(RepoError::Connection("pool timed out".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BaseRepository<Post, Uuid> for CountingStore {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
            self.hit()?;
            Ok(None)
        }

        async fn insert(&self, post: Post) -> Result<Post, RepoError> {
            self.hit()?;
            Ok(post)
        }
    }

    #[async_trait]
    impl PostRepository for CountingStore {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            self.hit()?;
            Ok(vec![])
        }
    }

    #[async_trait]
    impl BaseRepository<Comment, Uuid> for CountingStore {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Comment>, RepoError> {
            self.hit()?;
            Ok(None)
        }

        async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
            self.hit()?;
            Ok(comment)
        }
    }

    #[async_trait]
    impl CommentRepository for CountingStore {
        async fn ids_by_post(&self, _post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
            self.hit()?;
            Ok(vec![])
        }

        async fn find_page_by_post(
            &self,
            _post_id: Uuid,
            _offset: u64,
            _limit: u64,
        ) -> Result<Vec<Comment>, RepoError> {
            self.hit()?;
            Ok(vec![])
        }

        async fn count_by_post(&self, _post_id: Uuid) -> Result<u64, RepoError> {
            self.hit()?;
            Ok(0)
        }

        async fn ids_by_parent(&self, _parent_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
            self.hit()?;
            Ok(vec![])
        }

        async fn find_by_parent(&self, _parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
            self.hit()?;
            Ok(vec![])
        }
    }

    fn small_limits() -> Limits {
        Limits {
            max_post_title_length: 5,
            max_post_content_length: 10,
            max_comment_length: 8,
            comments_page_size: 2,
        }
    }

    fn service() -> (CommentService, Arc<CountingStore>) {
        service_over(CountingStore::default())
    }

    fn service_over(store: CountingStore) -> (CommentService, Arc<CountingStore>) {
        let store = Arc::new(store);
        let limits = small_limits();
        let engine = StorageEngine::new(store.clone(), store.clone(), limits.comments_page_size);
        (CommentService::new(engine, limits), store)
    }

    fn post_req(title: &str, content: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            content: content.to_string(),
            allow_comments: None,
        }
    }

    fn invalid_message(err: DomainError) -> String {
        match err {
            DomainError::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_post_echoes_input_and_defaults_allow_comments() {
        let (service, _) = service();

        let post = service.create_post(post_req("Hi", "World")).await.unwrap();

        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "World");
        assert!(post.allow_comments);
        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_keeps_explicit_allow_comments() {
        let (service, _) = service();
        let mut req = post_req("Hi", "World");
        req.allow_comments = Some(false);

        let post = service.create_post(req).await.unwrap();
        assert!(!post.allow_comments);
    }

    #[tokio::test]
    async fn test_create_post_rejects_each_invalid_field() {
        let (service, store) = service();

        let cases = [
            (post_req("", "World"), "title is empty"),
            (post_req("Hi", ""), "content is empty"),
            (post_req("Hello!", "World"), "title is too long (maximum 5 chars)"),
            (
                post_req("Hi", "Hello World"),
                "content is too long (maximum 10 chars)",
            ),
        ];

        for (req, expected) in cases {
            let err = service.create_post(req).await.unwrap_err();
            assert_eq!(invalid_message(err), expected);
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_post_first_failing_check_wins() {
        let (service, _) = service();

        let err = service.create_post(post_req("", "")).await.unwrap_err();
        assert_eq!(invalid_message(err), "title is empty");

        let err = service
            .create_post(post_req("", "far too long content"))
            .await
            .unwrap_err();
        assert_eq!(invalid_message(err), "title is empty");

        let err = service
            .create_post(post_req("too long", ""))
            .await
            .unwrap_err();
        assert_eq!(invalid_message(err), "content is empty");

        let err = service
            .create_post(post_req("too long", "far too long content"))
            .await
            .unwrap_err();
        assert_eq!(invalid_message(err), "title is too long (maximum 5 chars)");
    }

    #[tokio::test]
    async fn test_lengths_count_characters_not_bytes() {
        let (service, _) = service();

        // Five characters, ten bytes.
        let post = service.create_post(post_req("ééééé", "World")).await;
        assert!(post.is_ok());
    }

    #[tokio::test]
    async fn test_create_comment_validation_order() {
        let (service, store) = service();

        let req = |post_id: &str, content: &str| CreateComment {
            post_id: post_id.to_string(),
            parent_comment_id: None,
            content: content.to_string(),
        };

        let err = service.create_comment(req("", "")).await.unwrap_err();
        assert_eq!(invalid_message(err), "postID is empty");

        let err = service.create_comment(req("abc", "")).await.unwrap_err();
        assert_eq!(invalid_message(err), "content is empty");

        let err = service
            .create_comment(req("abc", "nine chars"))
            .await
            .unwrap_err();
        assert_eq!(invalid_message(err), "content is too long (maximum 8 chars)");

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_comment_passes_storage_errors_through() {
        let (service, store) = service();

        let err = service
            .create_comment(CreateComment {
                post_id: Uuid::new_v4().to_string(),
                parent_comment_id: Some(String::new()),
                content: "hello".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(Entity::Post)));
        assert_eq!(err.to_string(), "post not found");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_ids_are_not_found() {
        let (service, store) = service();

        let err = service.get_post("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(Entity::Post)));

        let err = service.get_comment("42").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(Entity::Comment)));

        let err = service
            .create_comment(CreateComment {
                post_id: "nope".to_string(),
                parent_comment_id: None,
                content: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(Entity::Post)));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_count_comment_pages_without_comments_is_one() {
        let (service, _) = service();

        let pages = service
            .count_comment_pages(&Uuid::new_v4().to_string())
            .await
            .unwrap();
        assert_eq!(pages, 1);
    }

    #[tokio::test]
    async fn test_repository_failures_surface_as_storage_errors() {
        let (service, store) = service_over(CountingStore {
            broken: true,
            ..CountingStore::default()
        });

        let err = service.create_post(post_req("Hi", "World")).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(RepoError::Connection(_))));

        let err = service
            .create_comment(CreateComment {
                post_id: Uuid::new_v4().to_string(),
                parent_comment_id: None,
                content: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(RepoError::Connection(_))));

        let err = service
            .list_comments(ListComments {
                post_id: Uuid::new_v4().to_string(),
                page: Some(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(RepoError::Connection(_))));
        assert_eq!(err.to_string(), "Database connection failed: pool timed out");

        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }
}
