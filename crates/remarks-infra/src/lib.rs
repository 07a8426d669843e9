//! # Remarks Infrastructure
//!
//! Concrete implementations of the repository ports defined in `remarks-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod database;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryCommentRepository, InMemoryPostRepository};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresCommentRepository, PostgresPostRepository};
