//! Arena-backed session forest
//!
//! Every node is owned by the arena. Tree shape lives in the `roots` list
//! and in each directory's `children`; a node's `parent` is a plain id used
//! for traversal and for finding the container to splice on removal.

use std::collections::HashMap;

use crate::error::SelectionError;

use super::types::{Directory, Node, NodeId, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    node: Node,
    parent: Option<NodeId>,
}

/// The whole session tree: an ordered list of roots plus the node arena
#[derive(Debug, Clone, Default)]
pub struct Forest {
    entries: HashMap<NodeId, Entry>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Forest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes at any depth
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Root ids in display order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// # Panics
    ///
    /// Panics if `index >= self.root_count()`.
    pub fn root_at(&self, index: usize) -> NodeRef<'_> {
        let id = self.roots[index];
        self.view(id)
    }

    /// Get a node by id
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.entries.get(&id).map(|e| &e.node)
    }

    /// Borrow a read-only view of a node
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.entries.get(&id).map(|entry| NodeRef {
            forest: self,
            id,
            entry,
        })
    }

    /// Parent of a node (`None` for roots and unknown ids)
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    /// Mutable access to a session's fields
    pub fn session_mut(&mut self, id: NodeId) -> Option<&mut Session> {
        match self.entries.get_mut(&id) {
            Some(Entry {
                node: Node::Session(session),
                ..
            }) => Some(session),
            _ => None,
        }
    }

    /// Mutable access to a directory's name
    pub fn directory_name_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match self.entries.get_mut(&id) {
            Some(Entry {
                node: Node::Directory(dir),
                ..
            }) => Some(&mut dir.name),
            _ => None,
        }
    }

    /// Append a node to the root list
    ///
    /// A directory is always inserted empty; children are attached with
    /// [`insert_child`](Self::insert_child).
    pub fn insert_root(&mut self, node: impl Into<Node>) -> NodeId {
        let id = self.alloc(node.into(), None);
        self.roots.push(id);
        id
    }

    /// Append a node to a directory's children
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        node: impl Into<Node>,
    ) -> Result<NodeId, SelectionError> {
        match self.get(parent) {
            Some(Node::Directory(_)) => {}
            Some(Node::Session(_)) => return Err(SelectionError::NotADirectory(parent)),
            None => return Err(SelectionError::Stale(parent)),
        }

        let id = self.alloc(node.into(), Some(parent));
        if let Some(Entry {
            node: Node::Directory(dir),
            ..
        }) = self.entries.get_mut(&parent)
        {
            dir.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree
    ///
    /// Remaining siblings keep their relative order. Returns the number of
    /// nodes discarded (0 if `id` is unknown).
    pub fn detach(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.entries.get(&id).map(|e| e.parent) else {
            return 0;
        };

        let container = match parent {
            Some(parent) => match self.entries.get_mut(&parent) {
                Some(Entry {
                    node: Node::Directory(dir),
                    ..
                }) => &mut dir.children,
                _ => &mut self.roots,
            },
            None => &mut self.roots,
        };
        if let Some(pos) = container.iter().position(|c| *c == id) {
            container.remove(pos);
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.entries.remove(&next) {
                removed += 1;
                if let Node::Directory(dir) = entry.node {
                    pending.extend(dir.children);
                }
            }
        }
        removed
    }

    /// Siblings of a node including itself, in display order
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.parent(id).and_then(|p| self.get(p)) {
            Some(Node::Directory(dir)) => dir.children.as_slice(),
            _ => self.roots.as_slice(),
        }
    }

    /// Walk every node in display order as `(depth, id)`
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            forest: self,
            stack: self.roots.iter().rev().map(|id| (0, *id)).collect(),
        }
    }

    /// Resolve a `/`-separated path of labels, e.g. `Prod/10.0.0.1:6379`
    ///
    /// Each segment matches the first node with that label at its level.
    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut level: &[NodeId] = self.roots.as_slice();
        let mut found = None;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let id = level
                .iter()
                .copied()
                .find(|id| self.get(*id).is_some_and(|n| n.label() == segment))?;
            level = match self.get(id) {
                Some(Node::Directory(dir)) => dir.children.as_slice(),
                _ => &[],
            };
            found = Some(id);
        }
        found
    }

    fn alloc(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        if let Node::Directory(dir) = &mut node {
            dir.children.clear();
        }
        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, Entry { node, parent });
        id
    }

    fn view(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            forest: self,
            id,
            entry: &self.entries[&id],
        }
    }

    /// Check every structural invariant, panicking on the first violation
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for id in &self.roots {
            assert!(seen.insert(*id), "{id} listed twice");
            assert_eq!(self.parent(*id), None, "root {id} has a parent");
        }
        for (id, entry) in &self.entries {
            if let Node::Directory(dir) = &entry.node {
                for child in &dir.children {
                    assert!(seen.insert(*child), "{child} listed twice");
                    assert_eq!(self.parent(*child), Some(*id), "{child} has wrong parent");
                }
            }
        }
        assert_eq!(seen.len(), self.entries.len(), "unreachable or dangling nodes");
    }
}

/// Depth-first iterator returned by [`Forest::depth_first`]
pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<(usize, NodeId)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        if let Some(Node::Directory(dir)) = self.forest.get(id) {
            self.stack
                .extend(dir.children.iter().rev().map(|c| (depth + 1, *c)));
        }
        Some((depth, id))
    }
}

/// Read-only view of one node, used by anything walking the tree
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: NodeId,
    entry: &'a Entry,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        &self.entry.node
    }

    pub fn label(&self) -> String {
        self.entry.node.label()
    }

    pub fn child_count(&self) -> usize {
        self.entry.node.child_count()
    }

    /// # Panics
    ///
    /// Panics if `index >= self.child_count()`.
    pub fn child_at(&self, index: usize) -> NodeRef<'a> {
        match &self.entry.node {
            Node::Directory(Directory { children, .. }) => self.forest.view(children[index]),
            Node::Session(_) => panic!("session {} has no children", self.id),
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.entry.parent.map(|p| self.forest.view(p))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", &self.entry.node)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Forest, NodeId, NodeId, NodeId) {
        let mut forest = Forest::new();
        let prod = forest.insert_root(Node::directory("Prod"));
        let a = forest.insert_child(prod, Session::new("10.0.0.1", 6379)).unwrap();
        let b = forest.insert_child(prod, Session::new("10.0.0.2", 6379)).unwrap();
        forest.insert_root(Session::new("127.0.0.1", 6379));
        (forest, prod, a, b)
    }

    #[test]
    fn test_queries() {
        let (forest, prod, a, _) = sample();
        forest.assert_consistent();

        assert_eq!(forest.len(), 4);
        assert_eq!(forest.root_count(), 2);

        let root = forest.root_at(0);
        assert_eq!(root.id(), prod);
        assert_eq!(root.label(), "Prod");
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.child_at(0).id(), a);
        assert_eq!(root.child_at(1).label(), "10.0.0.2:6379");
        assert_eq!(root.child_at(0).parent().map(|p| p.id()), Some(prod));
        assert!(root.parent().is_none());
        assert_eq!(forest.root_at(1).label(), "127.0.0.1:6379");
    }

    #[test]
    #[should_panic]
    fn test_child_at_out_of_range_panics() {
        let (forest, ..) = sample();
        forest.root_at(0).child_at(2);
    }

    #[test]
    fn test_insert_child_into_session_is_refused() {
        let (mut forest, _, a, _) = sample();
        let err = forest.insert_child(a, Session::new("x", 1)).unwrap_err();
        assert_eq!(err, SelectionError::NotADirectory(a));
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn test_detach_keeps_sibling_order() {
        let (mut forest, prod, a, b) = sample();
        let c = forest.insert_child(prod, Session::new("10.0.0.3", 6379)).unwrap();

        assert_eq!(forest.detach(b), 1);
        assert_eq!(forest.get(prod).unwrap().as_directory().unwrap().children(), &[a, c]);
        assert!(!forest.contains(b));
        forest.assert_consistent();
    }

    #[test]
    fn test_detach_discards_subtree() {
        let (mut forest, prod, _, _) = sample();
        let nested = forest.insert_child(prod, Node::directory("Nested")).unwrap();
        forest.insert_child(nested, Session::new("10.0.1.1", 6379)).unwrap();

        assert_eq!(forest.detach(prod), 5);
        assert_eq!(forest.root_count(), 1);
        assert_eq!(forest.len(), 1);
        forest.assert_consistent();

        assert_eq!(forest.detach(prod), 0);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (mut forest, _, a, _) = sample();
        forest.detach(a);
        let fresh = forest.insert_root(Session::new("h", 1));
        assert_ne!(fresh, a);
        assert!(forest.get(a).is_none());
    }

    #[test]
    fn test_depth_first_order() {
        let (mut forest, prod, _, _) = sample();
        let nested = forest.insert_child(prod, Node::directory("Nested")).unwrap();
        forest.insert_child(nested, Session::new("deep", 1)).unwrap();

        let labels: Vec<(usize, String)> = forest
            .depth_first()
            .map(|(depth, id)| (depth, forest.get(id).unwrap().label()))
            .collect();

        assert_eq!(
            labels,
            vec![
                (0, "Prod".to_string()),
                (1, "10.0.0.1:6379".to_string()),
                (1, "10.0.0.2:6379".to_string()),
                (1, "Nested".to_string()),
                (2, "deep:1".to_string()),
                (0, "127.0.0.1:6379".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_path() {
        let (forest, prod, _, b) = sample();
        assert_eq!(forest.find_path("Prod"), Some(prod));
        assert_eq!(forest.find_path("/Prod/10.0.0.2:6379"), Some(b));
        assert_eq!(forest.find_path("Prod/missing"), None);
        assert_eq!(forest.find_path(""), None);
    }

    #[test]
    fn test_siblings() {
        let (forest, prod, a, b) = sample();
        assert_eq!(forest.siblings(a), &[a, b]);
        assert_eq!(forest.siblings(prod).len(), 2);
    }

    #[test]
    fn test_field_edits() {
        let (mut forest, prod, a, _) = sample();
        forest.session_mut(a).unwrap().port = 7000;
        *forest.directory_name_mut(prod).unwrap() = "Production".to_string();

        assert_eq!(forest.get(a).unwrap().label(), "10.0.0.1:7000");
        assert_eq!(forest.get(prod).unwrap().label(), "Production");
        assert!(forest.session_mut(prod).is_none());
        assert!(forest.directory_name_mut(a).is_none());
    }
}
