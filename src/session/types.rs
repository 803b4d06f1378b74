//! Core tree types
//!
//! Defines the two node kinds of the session hierarchy:
//! - `Directory` groups child nodes under a name
//! - `Session` describes one connection endpoint (always a leaf)

use std::fmt;

use crate::error::ValidationError;

/// Stable identifier of a node inside a [`Forest`](super::Forest)
///
/// Ids are handed out by the forest and never reused, so a stale id can
/// only ever fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Build an id from its raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named group of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Display name
    pub name: String,
    /// Children in display order (owned by the forest arena)
    pub(crate) children: Vec<NodeId>,
}

impl Directory {
    /// Create an empty directory
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Children in display order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check a name typed by the user
    ///
    /// Names are path segments on the command line, so they must be
    /// non-empty and free of `/`.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        let reason = if name.is_empty() {
            "must not be empty"
        } else if name.contains('/') {
            "must not contain '/'"
        } else {
            return Ok(());
        };
        Err(ValidationError::InvalidDirectoryName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// A connection endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Optional display name; not persisted
    pub key: String,
    pub host: String,
    /// Any integer read from a file; dialogs only accept `0..=65535`
    pub port: i64,
    pub password: String,
}

impl Session {
    /// Create a session without a display key
    pub fn new(host: impl Into<String>, port: i64) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the display key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// `key` when set, otherwise `host:port`
    pub fn label(&self) -> String {
        if self.key.is_empty() {
            format!("{}:{}", self.host, self.port)
        } else {
            self.key.clone()
        }
    }
}

/// A tree element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    Session(Session),
}

impl Node {
    /// Shorthand for a new empty directory node
    pub fn directory(name: impl Into<String>) -> Self {
        Self::Directory(Directory::new(name))
    }

    /// Text shown for this node
    pub fn label(&self) -> String {
        match self {
            Self::Directory(dir) => dir.name.clone(),
            Self::Session(session) => session.label(),
        }
    }

    /// Number of direct children (always 0 for sessions)
    pub fn child_count(&self) -> usize {
        match self {
            Self::Directory(dir) => dir.children.len(),
            Self::Session(_) => 0,
        }
    }

    /// Check if this is a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Check if this is a session
    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::Session(_) => None,
        }
    }

    pub fn as_session(&self) -> Option<&Session> {
        match self {
            Self::Session(session) => Some(session),
            Self::Directory(_) => None,
        }
    }
}

impl From<Session> for Node {
    fn from(session: Session) -> Self {
        Self::Session(session)
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}

/// Raw text fields of the new/edit session dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionForm {
    pub key: String,
    pub host: String,
    pub port: String,
    pub password: String,
}

impl SessionForm {
    /// Pre-fill the form from an existing session
    pub fn from_session(session: &Session) -> Self {
        Self {
            key: session.key.clone(),
            host: session.host.clone(),
            port: session.port.to_string(),
            password: session.password.clone(),
        }
    }

    /// Validate the fields and build a session
    pub fn parse(&self) -> Result<Session, ValidationError> {
        let port = self
            .port
            .trim()
            .parse::<u16>()
            .map_err(|e| ValidationError::InvalidPort {
                value: self.port.clone(),
                reason: e.to_string(),
            })?;

        Ok(Session {
            key: self.key.clone(),
            host: self.host.clone(),
            port: i64::from(port),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_label_falls_back_to_address() {
        let session = Session::new("127.0.0.1", 6379);
        assert_eq!(session.label(), "127.0.0.1:6379");
    }

    #[test]
    fn test_session_label_prefers_key() {
        let session = Session::new("10.1.2.3", 7000).with_key("prod-cache");
        assert_eq!(session.label(), "prod-cache");
        assert_eq!(Node::from(session).label(), "prod-cache");
    }

    #[test]
    fn test_node_kinds() {
        let dir = Node::directory("Prod");
        assert!(dir.is_directory());
        assert_eq!(dir.label(), "Prod");
        assert_eq!(dir.child_count(), 0);

        let leaf = Node::from(Session::new("localhost", 6379));
        assert!(leaf.is_session());
        assert!(leaf.as_directory().is_none());
        assert_eq!(leaf.child_count(), 0);
    }

    #[test]
    fn test_form_parse() {
        let form = SessionForm {
            key: "cache".to_string(),
            host: "10.0.0.1".to_string(),
            port: " 6380 ".to_string(),
            password: "secret".to_string(),
        };
        let session = form.parse().unwrap();
        assert_eq!(session.port, 6380);
        assert_eq!(session.key, "cache");
        assert_eq!(SessionForm::from_session(&session).port, "6380");
    }

    #[test]
    fn test_form_rejects_bad_port() {
        for port in ["", "abc", "70000", "-1"] {
            let form = SessionForm {
                port: port.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(form.parse(), Err(ValidationError::InvalidPort { .. })),
                "port {port:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_directory_name_validation() {
        assert!(Directory::validate_name("Prod").is_ok());
        assert!(Directory::validate_name("Cache v2").is_ok());
        for name in ["", "Prod/Cache", "/"] {
            assert!(
                matches!(
                    Directory::validate_name(name),
                    Err(ValidationError::InvalidDirectoryName { .. })
                ),
                "name {name:?} should be rejected"
            );
        }
    }
}
