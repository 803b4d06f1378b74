//! Error types for session-tree
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::NodeId;

/// Top-level error type for session-tree
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Session file errors
///
/// A missing session file is not represented here: loading it yields an
/// empty forest.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to parse session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read session file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode sessions: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Violations of a tree operation's selection precondition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Nothing is selected")]
    NothingSelected,

    #[error("Node {0} is not a session")]
    NotASession(NodeId),

    #[error("Node {0} is not a directory")]
    NotADirectory(NodeId),

    #[error("Cannot create a directory inside session {0}")]
    DirectoryInsideSession(NodeId),

    #[error("Node {0} no longer exists")]
    Stale(NodeId),
}

/// User-supplied field errors, reported before any node is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port '{value}': {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("Invalid directory name '{name}': {reason}")]
    InvalidDirectoryName { name: String, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SelectionError::DirectoryInsideSession(NodeId::from_raw(3));
        assert!(err.to_string().contains("inside session #3"));

        let err = ValidationError::InvalidPort {
            value: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));

        let err = StoreError::Read {
            path: PathBuf::from("/tmp/foo.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/tmp/foo.json"));
    }

    #[test]
    fn test_error_conversion() {
        let selection_err = SelectionError::NothingSelected;
        let top_err: Error = selection_err.into();
        assert!(matches!(top_err, Error::Selection(SelectionError::NothingSelected)));

        let store_err = StoreError::Encode(serde_json::from_str::<u8>("x").unwrap_err());
        let top_err: Error = store_err.into();
        assert!(matches!(top_err, Error::Store(StoreError::Encode(_))));
    }
}
