//! The single open document.
//!
//! A `Document` composes a [`TextBuffer`] with the file it came from and
//! the cursor/selection state the controller needs for editing and for
//! choosing where "replace next" starts.

use plume_buffer::{Position, TextBuffer};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::{CoreError, CoreResult};

/// Name shown for documents that were never saved.
pub const UNTITLED: &str = "Untitled";

/// A document represents the file or scratch buffer being edited.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The underlying text buffer
    buffer: TextBuffer,

    /// File path (None for untitled documents)
    path: Option<PathBuf>,

    /// Insertion point
    cursor: Position,

    /// Selected region, start never after end
    selection: Option<(Position, Position)>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let buffer = TextBuffer::from_file(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            buffer,
            path: Some(path.to_path_buf()),
            cursor: Position::ZERO,
            selection: None,
        })
    }

    /// Writes the document to `path` and adopts it as the document's file.
    ///
    /// On failure the path and the modified flag are left untouched.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.buffer.write_to(path).map_err(|source| CoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    // ==================== Getters ====================

    /// Returns the file path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the display name: the file name, or "Untitled".
    pub fn name(&self) -> Cow<'_, str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map_or(Cow::Borrowed(UNTITLED), |name| name.to_string_lossy())
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns all text.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    /// Returns the line count.
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn selection(&self) -> Option<(Position, Position)> {
        self.selection
    }

    /// Returns the status bar text for the cursor, e.g.
    /// `Line: 3, Col: 4 | Lines: 10 *`.
    pub fn cursor_status(&self) -> String {
        let marker = if self.is_modified() { " *" } else { "" };
        format!(
            "Line: {}, Col: {} | Lines: {}{}",
            self.cursor.line + 1,
            self.cursor.column,
            self.line_count(),
            marker
        )
    }

    // ==================== Cursor & Selection ====================

    /// Moves the cursor, dropping any selection.
    pub fn move_cursor_to(&mut self, pos: Position) -> CoreResult<()> {
        self.buffer.position_to_char_idx(pos)?;
        self.cursor = pos;
        self.selection = None;
        Ok(())
    }

    /// Selects the region between two positions, in either order. The
    /// cursor ends at `end`.
    pub fn select(&mut self, start: Position, end: Position) -> CoreResult<()> {
        self.buffer.position_to_char_idx(start)?;
        self.buffer.position_to_char_idx(end)?;
        self.selection = (start != end).then(|| (start.min(end), start.max(end)));
        self.cursor = end;
        Ok(())
    }

    /// Selects all text and puts the cursor at the start.
    pub fn select_all(&mut self) -> CoreResult<()> {
        let end = self.end_position()?;
        self.selection = (end != Position::ZERO).then_some((Position::ZERO, end));
        self.cursor = Position::ZERO;
        Ok(())
    }

    /// Byte offset where the selection starts, if there is a selection.
    pub fn selection_start_byte(&self) -> CoreResult<Option<usize>> {
        match self.selection {
            Some((start, _)) => Ok(Some(self.position_to_byte(start)?)),
            None => Ok(None),
        }
    }

    /// Byte offset of the cursor.
    pub fn cursor_byte(&self) -> CoreResult<usize> {
        self.position_to_byte(self.cursor)
    }

    // ==================== Text Editing ====================

    /// Inserts text at the cursor, replacing the selection if any.
    pub fn insert_at_cursor(&mut self, text: &str) -> CoreResult<()> {
        self.delete_selection()?;
        let idx = self.buffer.position_to_char_idx(self.cursor)?;
        self.buffer.insert(idx, text)?;
        self.cursor = self
            .buffer
            .char_idx_to_position(idx + text.chars().count())?;
        Ok(())
    }

    /// Deletes the selection, or the character before the cursor. A
    /// `\r\n` pair is deleted as one line break.
    pub fn delete_backward(&mut self) -> CoreResult<()> {
        if self.delete_selection()? {
            return Ok(());
        }
        let idx = self.buffer.position_to_char_idx(self.cursor)?;
        if idx == 0 {
            return Ok(());
        }
        let start = if idx >= 2 && self.buffer.slice(idx - 2..idx)? == "\r\n" {
            idx - 2
        } else {
            idx - 1
        };
        self.buffer.delete(start..idx)?;
        self.cursor = self.buffer.char_idx_to_position(start)?;
        Ok(())
    }

    /// Replaces the whole text and places the cursor at byte `cursor_byte`,
    /// clamped to the text and moved back onto a character boundary.
    pub fn replace_text(&mut self, text: &str, cursor_byte: usize) -> CoreResult<()> {
        self.buffer.set_text(text);
        self.selection = None;
        let mut cursor_byte = cursor_byte.min(text.len());
        while !text.is_char_boundary(cursor_byte) {
            cursor_byte -= 1;
        }
        let char_idx = self.buffer.byte_to_char(cursor_byte)?;
        self.cursor = self.buffer.char_idx_to_position(char_idx)?;
        Ok(())
    }

    /// Empties the document and forgets its file.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn delete_selection(&mut self) -> CoreResult<bool> {
        let Some((start, end)) = self.selection.take() else {
            return Ok(false);
        };
        let start_idx = self.buffer.position_to_char_idx(start)?;
        let end_idx = self.buffer.position_to_char_idx(end)?;
        self.buffer.delete(start_idx..end_idx)?;
        self.cursor = start;
        Ok(true)
    }

    fn position_to_byte(&self, pos: Position) -> CoreResult<usize> {
        let idx = self.buffer.position_to_char_idx(pos)?;
        Ok(self.buffer.char_to_byte(idx)?)
    }

    fn end_position(&self) -> CoreResult<Position> {
        Ok(self.buffer.char_idx_to_position(self.buffer.len_chars())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.name(), "Untitled");
        assert!(doc.path().is_none());
        assert!(!doc.is_modified());
        assert_eq!(doc.cursor_status(), "Line: 1, Col: 0 | Lines: 1");
    }

    #[test]
    fn test_typing_moves_cursor() {
        let mut doc = Document::new();
        doc.insert_at_cursor("ab\ncd").unwrap();
        assert_eq!(doc.cursor(), Position::new(1, 2));
        assert_eq!(doc.cursor_status(), "Line: 2, Col: 2 | Lines: 2 *");

        doc.delete_backward().unwrap();
        assert_eq!(doc.text(), "ab\nc");
        assert_eq!(doc.cursor(), Position::new(1, 1));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut doc = Document::new();
        doc.insert_at_cursor("hello world").unwrap();
        doc.select(Position::new(0, 11), Position::new(0, 6)).unwrap();
        assert_eq!(doc.selection(), Some((Position::new(0, 6), Position::new(0, 11))));

        doc.insert_at_cursor("there").unwrap();
        assert_eq!(doc.text(), "hello there");
        assert!(doc.selection().is_none());
    }

    #[test]
    fn test_select_all() {
        let mut doc = Document::new();
        doc.insert_at_cursor("one\ntwo").unwrap();
        doc.select_all().unwrap();
        assert_eq!(doc.selection(), Some((Position::ZERO, Position::new(1, 3))));
        assert_eq!(doc.selection_start_byte().unwrap(), Some(0));

        doc.delete_backward().unwrap();
        assert!(doc.text().is_empty());
    }

    #[test]
    fn test_invalid_cursor_is_rejected() {
        let mut doc = Document::new();
        doc.insert_at_cursor("abc").unwrap();
        assert!(doc.move_cursor_to(Position::new(3, 0)).is_err());
        assert_eq!(doc.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_cursor_cannot_sit_past_line_break() {
        let mut doc = Document::new();
        doc.insert_at_cursor("ab\ncd").unwrap();

        assert!(doc.move_cursor_to(Position::new(0, 3)).is_err());
        assert!(doc.select(Position::new(0, 0), Position::new(0, 3)).is_err());
        assert_eq!(doc.cursor(), Position::new(1, 2));

        doc.move_cursor_to(Position::new(0, 2)).unwrap();
        doc.insert_at_cursor("X").unwrap();
        assert_eq!(doc.text(), "abX\ncd");
    }

    #[test]
    fn test_backspace_removes_crlf_as_one_break() {
        let mut doc = Document::new();
        doc.insert_at_cursor("ab\r\ncd").unwrap();
        doc.move_cursor_to(Position::new(1, 0)).unwrap();

        doc.delete_backward().unwrap();
        assert_eq!(doc.text(), "abcd");
        assert_eq!(doc.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "saved text").unwrap();

        let mut doc = Document::from_file(&path).unwrap();
        assert_eq!(doc.name(), "notes.txt");
        assert_eq!(doc.text(), "saved text");

        doc.insert_at_cursor(">> ").unwrap();
        let copy = dir.path().join("copy.txt");
        doc.save_to(&copy).unwrap();
        assert!(!doc.is_modified());
        assert_eq!(doc.path(), Some(copy.as_path()));
        assert_eq!(std::fs::read_to_string(&copy).unwrap(), ">> saved text");
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new();
        doc.insert_at_cursor("draft").unwrap();

        let err = doc.save_to(dir.path().join("missing").join("draft.txt")).unwrap_err();
        assert!(matches!(err, CoreError::Write { .. }));
        assert!(doc.is_modified());
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::from_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, CoreError::Read { .. }));
    }

    #[test]
    fn test_replace_text_places_cursor() {
        let mut doc = Document::new();
        doc.insert_at_cursor("héllo").unwrap();
        doc.replace_text("héllo wörld", 7).unwrap();
        assert_eq!(doc.cursor(), Position::new(0, 6));
        assert!(doc.is_modified());
    }
}
