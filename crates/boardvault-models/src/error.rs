//! Error types for model mutations.

use thiserror::Error;

/// Errors that can occur when mutating the entity tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A name-based identity would be duplicated within its container.
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// A named entity was looked up but does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}

impl ModelError {
    pub(crate) fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Result type alias for model mutations.
pub type Result<T> = std::result::Result<T, ModelError>;
