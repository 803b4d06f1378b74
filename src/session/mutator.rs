//! Tree mutations driven by the current selection
//!
//! Every operation either completes and fires the refresh signal, or
//! returns without touching the forest.

use tracing::{debug, info, instrument};

use crate::error::{Result, SelectionError};

use super::forest::Forest;
use super::host::Host;
use super::types::{Node, NodeId, Session, SessionForm};

/// Applies user edits to a forest on behalf of a host
pub struct Mutator<'a, H: Host> {
    forest: &'a mut Forest,
    host: &'a mut H,
}

impl<'a, H: Host> Mutator<'a, H> {
    /// Borrow a forest and the host that supplies selection and prompts
    pub fn new(forest: &'a mut Forest, host: &'a mut H) -> Self {
        Self { forest, host }
    }

    /// The forest being edited
    pub fn forest(&self) -> &Forest {
        self.forest
    }

    /// Add a session next to (or inside) the current selection
    ///
    /// - nothing selected: appended to the roots
    /// - directory selected: appended to its children
    /// - session selected: appended as a sibling of that session
    #[instrument(skip_all)]
    pub fn add_session(&mut self, candidate: Session) -> Result<NodeId> {
        let id = match self.selected()? {
            None => self.forest.insert_root(candidate),
            Some(sel) if self.is_directory(sel) => self.forest.insert_child(sel, candidate)?,
            Some(sel) => match self.forest.parent(sel) {
                None => self.forest.insert_root(candidate),
                Some(parent) => self.forest.insert_child(parent, candidate)?,
            },
        };

        debug!("Added session {}", id);
        Ok(self.changed(id))
    }

    /// Ask the session dialog for a new session and add it
    ///
    /// Returns `Ok(None)` if the dialog was cancelled.
    #[instrument(skip(self))]
    pub fn new_session(&mut self) -> Result<Option<NodeId>> {
        // Fail before opening the dialog on a dangling selection
        self.selected()?;

        let Some(form) = self
            .host
            .edit_session("New session", &SessionForm::default())
        else {
            return Ok(None);
        };
        let session = form.parse()?;
        self.add_session(session).map(Some)
    }

    /// Prompt for a name and add a directory under the selected directory
    ///
    /// Refused while a session is selected. An empty name cancels.
    #[instrument(skip(self))]
    pub fn add_directory(&mut self) -> Result<Option<NodeId>> {
        let parent = self.selected()?;
        if let Some(sel) = parent {
            if !self.is_directory(sel) {
                return Err(SelectionError::DirectoryInsideSession(sel).into());
            }
        }

        let name = self.host.prompt("Directory name");
        if name.is_empty() {
            debug!("Directory creation cancelled");
            return Ok(None);
        }

        let id = match parent {
            Some(parent) => self.forest.insert_child(parent, Node::directory(name))?,
            None => self.forest.insert_root(Node::directory(name)),
        };

        debug!("Added directory {}", id);
        Ok(Some(self.changed(id)))
    }

    /// Remove the selected session
    #[instrument(skip(self))]
    pub fn remove_selected_session(&mut self) -> Result<()> {
        let sel = self.require_selection()?;
        if self.is_directory(sel) {
            return Err(SelectionError::NotASession(sel).into());
        }

        self.forest.detach(sel);
        self.host.set_selection(None);
        self.host.notify_changed();

        info!("Removed session {}", sel);
        Ok(())
    }

    /// Remove the selected directory with everything below it
    ///
    /// A non-empty directory is only removed after confirmation. Returns
    /// `Ok(false)` when the user declined.
    #[instrument(skip(self))]
    pub fn remove_selected_directory(&mut self) -> Result<bool> {
        let sel = self.require_selection()?;
        let child_count = match self.forest.get(sel) {
            Some(Node::Directory(dir)) => dir.children().len(),
            _ => return Err(SelectionError::NotADirectory(sel).into()),
        };

        if child_count > 0
            && !self
                .host
                .confirm("The directory is not empty, are you sure to remove it?")
        {
            debug!("Removal of directory {} declined", sel);
            return Ok(false);
        }

        let removed = self.forest.detach(sel);
        self.host.set_selection(None);
        self.host.notify_changed();

        info!("Removed directory {} ({} nodes)", sel, removed);
        Ok(true)
    }

    /// Edit whatever is selected in place
    ///
    /// Returns `Ok(false)` if the user cancelled.
    pub fn rename_selected(&mut self) -> Result<bool> {
        let sel = self.require_selection()?;
        if self.is_directory(sel) {
            self.edit_selected_directory()
        } else {
            self.edit_selected_session()
        }
    }

    /// Re-open the session dialog for the selected session
    #[instrument(skip(self))]
    pub fn edit_selected_session(&mut self) -> Result<bool> {
        let sel = self.require_selection()?;
        let current = match self.forest.get(sel) {
            Some(Node::Session(session)) => SessionForm::from_session(session),
            _ => return Err(SelectionError::NotASession(sel).into()),
        };

        let Some(form) = self.host.edit_session("Edit session", &current) else {
            return Ok(false);
        };
        let updated = form.parse()?;

        if let Some(session) = self.forest.session_mut(sel) {
            *session = updated;
        }
        self.host.notify_changed();
        Ok(true)
    }

    /// Prompt for a new name for the selected directory
    #[instrument(skip(self))]
    pub fn edit_selected_directory(&mut self) -> Result<bool> {
        let sel = self.require_selection()?;
        if !self.is_directory(sel) {
            return Err(SelectionError::NotADirectory(sel).into());
        }

        let name = self.host.prompt("New directory name");
        if name.is_empty() {
            return Ok(false);
        }

        if let Some(current) = self.forest.directory_name_mut(sel) {
            *current = name;
        }
        self.host.notify_changed();
        Ok(true)
    }

    /// Current selection, rejecting ids that are no longer in the forest
    fn selected(&self) -> std::result::Result<Option<NodeId>, SelectionError> {
        match self.host.current_selection() {
            None => Ok(None),
            Some(id) if self.forest.contains(id) => Ok(Some(id)),
            Some(id) => Err(SelectionError::Stale(id)),
        }
    }

    fn require_selection(&self) -> std::result::Result<NodeId, SelectionError> {
        self.selected()?.ok_or(SelectionError::NothingSelected)
    }

    fn is_directory(&self, id: NodeId) -> bool {
        self.forest.get(id).is_some_and(Node::is_directory)
    }

    fn changed(&mut self, id: NodeId) -> NodeId {
        self.host.notify_changed();
        self.host.ensure_visible(id);
        id
    }
}
