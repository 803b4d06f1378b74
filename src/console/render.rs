//! Plain-text tree listing
//!
//! Prints the forest one node per line, indented by depth. Directories
//! carry a trailing `/` and their child count.

use std::fmt::Write;

use crate::session::{Forest, Node};

const INDENT: &str = "  ";

/// Render the forest as indented lines
pub fn render_tree(forest: &Forest) -> String {
    let mut out = String::new();

    for (depth, id) in forest.depth_first() {
        let Some(node) = forest.get(id) else {
            continue;
        };

        let indent = INDENT.repeat(depth);
        let _ = match node {
            Node::Directory(dir) => {
                let count = dir.children().len();
                if count > 0 {
                    writeln!(out, "{}{}/ ({})", indent, dir.name, count)
                } else {
                    writeln!(out, "{}{}/", indent, dir.name)
                }
            }
            Node::Session(session) => writeln!(out, "{}{}", indent, session.label()),
        };
    }

    out
}
