//! Application state - shared across all handlers.

use std::sync::Arc;

use remarks_core::ports::{CommentRepository, PostRepository};
use remarks_core::{CommentService, Limits, StorageEngine};
use remarks_infra::{DatabaseConfig, InMemoryCommentRepository, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use remarks_infra::{PostgresCommentRepository, PostgresPostRepository};

type Repositories = (Arc<dyn PostRepository>, Arc<dyn CommentRepository>);

const MEMORY: &str = "memory";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentService>,
    /// Active storage backend, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, limits: Limits) -> Self {
        #[cfg(feature = "postgres")]
        let (posts, comments, storage): (_, _, &'static str) = {
            if let Some(config) = db_config {
                match remarks_infra::database::connect(config).await {
                    Ok(conn) => {
                        let conn = Arc::new(conn);
                        let posts: Arc<dyn PostRepository> =
                            Arc::new(PostgresPostRepository::shared(conn.clone()));
                        let comments: Arc<dyn CommentRepository> =
                            Arc::new(PostgresCommentRepository::shared(conn));
                        (posts, comments, "postgres")
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        let (posts, comments) = in_memory();
                        (posts, comments, MEMORY)
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                let (posts, comments) = in_memory();
                (posts, comments, MEMORY)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (posts, comments, storage) = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
            let (posts, comments) = in_memory();
            (posts, comments, MEMORY)
        };

        let state = Self::with_repositories(posts, comments, limits, storage);
        tracing::info!("Application state initialized");
        state
    }

    /// Wire the storage engine and service over the given repositories.
    pub fn with_repositories(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        limits: Limits,
        storage: &'static str,
    ) -> Self {
        let engine = StorageEngine::new(posts, comments, limits.comments_page_size);
        Self {
            comments: Arc::new(CommentService::new(engine, limits)),
            storage,
        }
    }

    /// State backed by fresh in-memory repositories.
    #[cfg(test)]
    pub fn in_memory(limits: Limits) -> Self {
        let (posts, comments) = in_memory();
        Self::with_repositories(posts, comments, limits, MEMORY)
    }
}

fn in_memory() -> Repositories {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryCommentRepository::new()),
    )
}
