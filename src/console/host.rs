//! Line-oriented host over a reader/writer pair
//!
//! Answers can be preset from command-line arguments; anything not preset
//! is asked on the input stream. End of input counts as cancel.
//!
//! The session dialog does not ask for a display name, which the session
//! file does not store.

use std::io::{BufRead, Write};

use crate::session::{
    ConfirmationGate, NodeId, RefreshSignal, SelectionProvider, SessionDialog, SessionForm,
    TextPrompt,
};

/// Console implementation of the tree collaborators
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
    selection: Option<NodeId>,
    assume_yes: bool,
    preset_text: Option<String>,
    preset_form: Option<SessionForm>,
    changed: bool,
    last_visible: Option<NodeId>,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    /// Create a host reading answers from `input` and asking on `output`
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            selection: None,
            assume_yes: false,
            preset_text: None,
            preset_form: None,
            changed: false,
            last_visible: None,
        }
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(&mut self, yes: bool) {
        self.assume_yes = yes;
    }

    /// Answer the next text prompt without asking
    pub fn preset_text(&mut self, text: impl Into<String>) {
        self.preset_text = Some(text.into());
    }

    /// Answer the next session dialog without asking
    pub fn preset_form(&mut self, form: SessionForm) {
        self.preset_form = Some(form);
    }

    /// Whether any operation signalled a change
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Last node the tree asked to reveal
    pub fn last_visible(&self) -> Option<NodeId> {
        self.last_visible
    }

    /// Get the output writer
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask a question and read one line; `None` at end of input
    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{}", question);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    /// Ask for one dialog field, keeping `current` on an empty answer
    fn ask_field(&mut self, label: &str, current: &str) -> Option<String> {
        let answer = if current.is_empty() {
            self.ask(&format!("{}: ", label))?
        } else {
            self.ask(&format!("{} [{}]: ", label, current))?
        };
        if answer.is_empty() {
            Some(current.to_string())
        } else {
            Some(answer)
        }
    }
}

impl<R, W> SelectionProvider for ConsoleHost<R, W> {
    fn current_selection(&self) -> Option<NodeId> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<NodeId>) {
        self.selection = selection;
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for ConsoleHost<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.ask(&format!("{} [y/N] ", message))
            .is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> TextPrompt for ConsoleHost<R, W> {
    fn prompt(&mut self, message: &str) -> String {
        if let Some(text) = self.preset_text.take() {
            return text;
        }
        self.ask(&format!("{}: ", message)).unwrap_or_default()
    }
}

impl<R: BufRead, W: Write> SessionDialog for ConsoleHost<R, W> {
    fn edit_session(&mut self, title: &str, initial: &SessionForm) -> Option<SessionForm> {
        if let Some(form) = self.preset_form.take() {
            return Some(form);
        }

        let _ = writeln!(self.output, "{}", title);
        Some(SessionForm {
            key: initial.key.clone(),
            host: self.ask_field("Host", &initial.host)?,
            port: self.ask_field("Port", &initial.port)?,
            password: self.ask_field("Password", &initial.password)?,
        })
    }
}

impl<R, W> RefreshSignal for ConsoleHost<R, W> {
    fn notify_changed(&mut self) {
        self.changed = true;
    }

    fn ensure_visible(&mut self, id: NodeId) {
        self.last_visible = Some(id);
    }
}
