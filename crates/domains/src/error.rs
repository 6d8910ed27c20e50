//! # ForumError
//!
//! Every failure the engine reports back to its caller.
//! There are no transient failures in the core, so nothing here is retried.

use std::fmt;

use thiserror::Error;

/// The kind of primary entity an operation failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Thread,
    Reply,
    Category,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::User => "user",
            Entity::Thread => "thread",
            Entity::Reply => "reply",
            Entity::Category => "category",
        };
        f.write_str(name)
    }
}

/// The primary error type for all forum operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForumError {
    /// Category, or subcategory under that category, unknown to the taxonomy.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// Thread, reply or user id that does not exist.
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: Entity, id: String },

    /// Reply attempted on a locked thread.
    #[error("thread {0} is locked")]
    ThreadLocked(String),

    /// Registration rejected because uniqueness is enforced.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// Input failed a length or emptiness rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// Snapshot load/save failure reported by a `SnapshotStore`.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ForumError {
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        ForumError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ForumError::Validation(msg.into())
    }

    /// True for the `NotFound` variant addressing `entity`.
    pub fn is_not_found(&self, entity: Entity) -> bool {
        matches!(self, ForumError::NotFound { entity: e, .. } if *e == entity)
    }
}

/// A specialized Result type for forum logic.
pub type Result<T> = std::result::Result<T, ForumError>;
