//! Persisted shape of the session tree
//!
//! The file is a JSON array of records. A record with a non-empty `Name`
//! is a directory (`Name`, `Children`); anything else is a session leaf
//! (`Host`, `Port`, `Password`). There is no kind tag: every directory is
//! written with `Name` and `Children`, but one with an empty name reads
//! back as a leaf. A session's `key` is not part of the format.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SelectionError;
use crate::session::{Forest, Node, NodeId, Session};

/// One persisted directory or session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Facade {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<Facade>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: i64,
    #[serde(default)]
    pub password: String,
    /// Built from a directory node; never read from a file
    #[serde(skip)]
    directory: bool,
}

impl Facade {
    /// Record for a directory, written as such even with an empty name
    pub fn directory(name: impl Into<String>, children: Vec<Facade>) -> Self {
        Self {
            name: name.into(),
            children,
            directory: true,
            ..Default::default()
        }
    }

    /// Record for a session leaf
    pub fn leaf(host: impl Into<String>, port: i64, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            ..Default::default()
        }
    }

    /// Whether the record is written with `Name` and `Children`
    pub fn is_directory(&self) -> bool {
        self.directory || !self.name.is_empty()
    }
}

impl Serialize for Facade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_directory() {
            let mut record = serializer.serialize_struct("Facade", 2)?;
            record.serialize_field("Name", &self.name)?;
            record.serialize_field("Children", &self.children)?;
            record.end()
        } else {
            let mut record = serializer.serialize_struct("Facade", 3)?;
            record.serialize_field("Host", &self.host)?;
            record.serialize_field("Port", &self.port)?;
            record.serialize_field("Password", &self.password)?;
            record.end()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Facade>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Facade>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Convert the whole forest to records, depth-first in display order
pub fn encode(forest: &Forest) -> Vec<Facade> {
    forest
        .roots()
        .iter()
        .filter_map(|id| encode_node(forest, *id))
        .collect()
}

fn encode_node(forest: &Forest, id: NodeId) -> Option<Facade> {
    let facade = match forest.get(id)? {
        Node::Directory(dir) => Facade::directory(
            dir.name.clone(),
            dir.children()
                .iter()
                .filter_map(|child| encode_node(forest, *child))
                .collect(),
        ),
        Node::Session(session) => Facade::leaf(
            session.host.clone(),
            session.port,
            session.password.clone(),
        ),
    };
    Some(facade)
}

/// Build nodes from records and attach them under `parent` (or as roots)
///
/// Returns the ids of the top-level nodes created, in order. Fails without
/// touching the forest if `parent` is not a live directory.
pub fn decode_into(
    forest: &mut Forest,
    facades: Vec<Facade>,
    parent: Option<NodeId>,
) -> Result<Vec<NodeId>, SelectionError> {
    if let Some(parent) = parent {
        match forest.get(parent) {
            Some(Node::Directory(_)) => {}
            Some(Node::Session(_)) => return Err(SelectionError::NotADirectory(parent)),
            None => return Err(SelectionError::Stale(parent)),
        }
    }

    facades
        .into_iter()
        .map(|facade| decode_node(forest, facade, parent))
        .collect()
}

fn decode_node(
    forest: &mut Forest,
    facade: Facade,
    parent: Option<NodeId>,
) -> Result<NodeId, SelectionError> {
    let Facade {
        name,
        children,
        host,
        port,
        password,
        ..
    } = facade;

    // Only the name tells the kind apart once a record has been written
    let node = if name.is_empty() {
        Node::Session(Session {
            key: String::new(),
            host,
            port,
            password,
        })
    } else {
        Node::directory(name)
    };

    let id = match parent {
        Some(parent) => forest.insert_child(parent, node)?,
        None => forest.insert_root(node),
    };

    // Children of a leaf record are dropped: sessions never have children
    if forest.get(id).is_some_and(Node::is_directory) {
        for child in children {
            decode_node(forest, child, Some(id))?;
        }
    }
    Ok(id)
}

/// Parse a JSON document; `null` is read as an empty list
pub fn from_json(bytes: &[u8]) -> serde_json::Result<Vec<Facade>> {
    Ok(serde_json::from_slice::<Option<Vec<Facade>>>(bytes)?.unwrap_or_default())
}

/// Serialize records to JSON
pub fn to_json(facades: &[Facade], pretty: bool) -> serde_json::Result<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(facades)
    } else {
        serde_json::to_vec(facades)
    }
}
