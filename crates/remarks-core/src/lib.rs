//! # Remarks Core
//!
//! The domain layer of the Remarks commenting backend: posts, threaded
//! comments, the storage engine that keeps them consistent and the service that
//! validates requests before they reach it.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod limits;
pub mod ports;
pub mod service;
pub mod storage;

pub use error::{DomainError, Entity, RepoError};
pub use limits::Limits;
pub use service::CommentService;
pub use storage::StorageEngine;
