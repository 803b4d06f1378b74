//! Collaborators supplied by the host application
//!
//! The tree core never talks to a user directly. Whatever presents the
//! tree (a GUI, a terminal, a test) implements these traits.

use super::types::{NodeId, SessionForm};

/// Reports and changes the highlighted node
pub trait SelectionProvider {
    fn current_selection(&self) -> Option<NodeId>;

    fn set_selection(&mut self, selection: Option<NodeId>);
}

/// Yes/no question before a destructive action
pub trait ConfirmationGate {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Single-line text input; an empty answer means cancel
pub trait TextPrompt {
    fn prompt(&mut self, message: &str) -> String;
}

/// The new/edit session dialog
pub trait SessionDialog {
    /// Returns the edited fields, or `None` if the user cancelled
    fn edit_session(&mut self, title: &str, initial: &SessionForm) -> Option<SessionForm>;
}

/// Tells the presentation layer that the tree changed
pub trait RefreshSignal {
    fn notify_changed(&mut self);

    fn ensure_visible(&mut self, id: NodeId);
}

/// Everything a [`Mutator`](super::Mutator) needs from its host
pub trait Host:
    SelectionProvider + ConfirmationGate + TextPrompt + SessionDialog + RefreshSignal
{
}

impl<T> Host for T where
    T: SelectionProvider + ConfirmationGate + TextPrompt + SessionDialog + RefreshSignal
{
}
