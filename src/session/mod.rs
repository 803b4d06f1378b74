//! Session hierarchy module
//!
//! Provides the tree model and its mutations:
//! - `Node` - a `Directory` (group) or a `Session` (endpoint leaf)
//! - `Forest` - the arena owning every node plus the ordered roots
//! - `Mutator` - selection-driven add/remove/rename operations
//! - `host` - collaborator traits the presentation layer implements

mod actions;
mod forest;
pub mod host;
mod mutator;
mod types;

pub use actions::Action;
pub use forest::{DepthFirst, Forest, NodeRef};
pub use host::{
    ConfirmationGate, Host, RefreshSignal, SelectionProvider, SessionDialog, TextPrompt,
};
pub use mutator::Mutator;
pub use types::*;
