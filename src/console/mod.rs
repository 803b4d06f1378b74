//! Console front end
//!
//! A stdin/stdout host for the tree collaborators and a plain-text listing
//! of the forest, used by the `session-tree` binary.

mod host;
mod render;

pub use host::ConsoleHost;
pub use render::render_tree;
