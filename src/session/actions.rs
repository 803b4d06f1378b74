//! Tree actions available for a selection
//!
//! Mirrors the context menu a tree view offers: which operations make sense
//! depends only on the kind of node under the cursor.

use std::fmt;

use super::types::Node;

/// An operation a user can trigger on the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Connect to the selected session (handled by the host)
    OpenSession,
    AddSession,
    AddDirectory,
    EditSession,
    EditDirectory,
    DeleteSession,
    DeleteDirectory,
}

impl Action {
    /// Actions applicable to the given selection, in menu order
    pub fn available(selection: Option<&Node>) -> &'static [Action] {
        match selection {
            None => &[Self::AddSession, Self::AddDirectory],
            Some(Node::Directory(_)) => &[
                Self::AddSession,
                Self::AddDirectory,
                Self::EditDirectory,
                Self::DeleteDirectory,
            ],
            Some(Node::Session(_)) => &[
                Self::OpenSession,
                Self::AddSession,
                Self::EditSession,
                Self::DeleteSession,
            ],
        }
    }

    /// Check if this action applies to the given selection
    pub fn applies_to(self, selection: Option<&Node>) -> bool {
        Self::available(selection).contains(&self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenSession => write!(f, "open session"),
            Self::AddSession => write!(f, "add session"),
            Self::AddDirectory => write!(f, "add directory"),
            Self::EditSession => write!(f, "edit session"),
            Self::EditDirectory => write!(f, "edit directory"),
            Self::DeleteSession => write!(f, "delete session"),
            Self::DeleteDirectory => write!(f, "delete directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_nothing_selected() {
        assert_eq!(
            Action::available(None),
            &[Action::AddSession, Action::AddDirectory]
        );
    }

    #[test]
    fn test_directory_selected() {
        let dir = Node::directory("Prod");
        assert!(Action::AddDirectory.applies_to(Some(&dir)));
        assert!(Action::DeleteDirectory.applies_to(Some(&dir)));
        assert!(!Action::OpenSession.applies_to(Some(&dir)));
        assert!(!Action::DeleteSession.applies_to(Some(&dir)));
    }

    #[test]
    fn test_session_selected() {
        let session = Node::from(Session::new("localhost", 6379));
        assert!(Action::OpenSession.applies_to(Some(&session)));
        assert!(Action::AddSession.applies_to(Some(&session)));
        assert!(!Action::AddDirectory.applies_to(Some(&session)));
        assert!(!Action::EditDirectory.applies_to(Some(&session)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::DeleteDirectory.to_string(), "delete directory");
    }
}
