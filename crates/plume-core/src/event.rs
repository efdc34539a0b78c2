//! Events the front end feeds into the editor.
//!
//! Key presses, menu actions and timer firings all become an
//! [`EditorEvent`] value. The editor handles them through one entry point,
//! [`Editor::handle`](crate::Editor::handle), so the controller logic does
//! not depend on how a particular UI binds its callbacks.

use plume_buffer::Position;
use std::path::PathBuf;

use crate::autosave::Ticket;

/// Everything the user (or the auto-save timer) can ask the editor to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    // Editing
    /// Text typed or pasted at the cursor
    Insert(String),
    /// Backspace
    DeleteBackward,
    MoveCursor(Position),
    Select { start: Position, end: Position },
    SelectAll,

    // File
    NewFile,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    Exit,

    // Find/replace panel
    SetSearchTerm(String),
    SetReplaceTerm(String),
    SetCaseSensitive(bool),
    Find,
    ReplaceNext,
    ReplaceAll,

    // View and format
    ToggleDarkMode,
    ToggleSyntax,
    ToggleAutoSave,
    SetFont { family: String, size: u32 },
    /// Window geometry reported by the front end, e.g. `1000x700+10+10`
    SetGeometry(String),

    /// A scheduled auto-save firing
    AutoSaveTick(Ticket),
}

impl EditorEvent {
    /// Returns true for events that may discard unsaved changes.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            EditorEvent::NewFile | EditorEvent::Open(_) | EditorEvent::Exit
        )
    }
}

/// What the front end should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Asks the user to confirm an action that would discard unsaved changes.
pub trait Confirm {
    /// Returns true if the action should go ahead.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str, &str) -> bool,
{
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self(title, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destructive_events() {
        assert!(EditorEvent::NewFile.is_destructive());
        assert!(EditorEvent::Open(PathBuf::from("a.txt")).is_destructive());
        assert!(EditorEvent::Exit.is_destructive());
        assert!(!EditorEvent::Save.is_destructive());
        assert!(!EditorEvent::Insert("x".into()).is_destructive());
    }

    #[test]
    fn test_closure_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |title: &str, _: &str| {
            asked.push(title.to_string());
            false
        };
        assert!(!Confirm::confirm(&mut confirm, "Unsaved Changes", "Discard changes?"));
        assert_eq!(asked, ["Unsaved Changes"]);
    }
}
