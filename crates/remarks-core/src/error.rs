//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Post,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Post => write!(f, "post"),
            Entity::Comment => write!(f, "comment"),
        }
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0}")]
    RuleViolation(String),

    #[error(transparent)]
    Storage(#[from] RepoError),
}

impl DomainError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        DomainError::InvalidInput(msg.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DomainError::NotFound(Entity::Post).to_string(), "post not found");
        assert_eq!(
            DomainError::NotFound(Entity::Comment).to_string(),
            "comment not found"
        );
    }

    #[test]
    fn storage_errors_keep_repository_message() {
        let err: DomainError = RepoError::Query("relation missing".to_string()).into();
        assert_eq!(err.to_string(), "Query execution failed: relation missing");
    }
}
