//! Session Tree - a hierarchical store for connection sessions
//!
//! Sessions (host, port, password) are organized into named directories,
//! persisted as JSON, and edited through selection-driven operations that
//! keep the in-memory tree and the session file consistent.
//!
//! # Modules
//!
//! - [`session`] - Tree model (`Forest`, `Node`), mutations and host collaborators
//! - [`store`] - JSON record format and session file load/save/import/export
//! - [`config`] - Layered configuration
//! - [`console`] - stdin/stdout host and plain-text listing
//! - [`error`] - Error types

pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Action, Directory, Forest, Host, Mutator, Node, NodeId, NodeRef, Session};
pub use store::SessionStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
