use std::fmt;

use thiserror::Error;

/// Entity kinds the panel manages, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Post,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Post => f.write_str("post"),
        }
    }
}

/// Errors that are safe to expose to consumers of the panel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid owner id: '{value}'")]
    InvalidOwner { value: String },

    #[error("user not found: {id}")]
    UserNotFound { id: u64 },

    #[error("post not found: {id}")]
    PostNotFound { id: u64 },

    #[error("no {kind} edit in progress")]
    NoEditInProgress { kind: EntityKind },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("seed load failed: {message}")]
    Seed { message: String },
}

impl PanelError {
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    pub fn invalid_owner(value: impl Into<String>) -> Self {
        Self::InvalidOwner {
            value: value.into(),
        }
    }

    pub fn user_not_found(id: u64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn post_not_found(id: u64) -> Self {
        Self::PostNotFound { id }
    }

    pub fn no_edit(kind: EntityKind) -> Self {
        Self::NoEditInProgress { kind }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }
}
