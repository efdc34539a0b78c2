//! Rope-backed text buffer.
//!
//! The buffer is the single owner of the document text. Callers borrow the
//! text with [`TextBuffer::text`] for searching and highlighting and go
//! through `&mut self` methods for every mutation, which is where the
//! modified flag is maintained.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

use crate::{BufferError, BufferResult, Position};

/// A text buffer backed by a rope data structure.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Whether the buffer differs from the last load or write
    modified: bool,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use plume_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    /// Loads a buffer from a file.
    ///
    /// Fails with an I/O error if the file is missing, unreadable or not
    /// valid UTF-8.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self {
            rope: Rope::from_str(&content),
            modified: false,
        })
    }

    /// Writes the whole buffer to `path` and clears the modified flag.
    ///
    /// The file is written in place. If the write fails part way the file
    /// may be left truncated and the buffer stays modified.
    pub fn write_to(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        std::fs::write(path.as_ref(), self.text().as_bytes())?;
        self.modified = false;
        Ok(())
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// Borrowed when the rope is a single chunk, allocated otherwise.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.rope.insert(char_idx, text);
        self.modified = true;
        Ok(())
    }

    /// Deletes text in a character range and returns it.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.rope.remove(range);
        self.modified = true;
        Ok(deleted)
    }

    /// Replaces the entire content, marking the buffer modified when the
    /// text actually changes.
    pub fn set_text(&mut self, text: &str) {
        if self.rope != text {
            self.rope = Rope::from_str(text);
            self.modified = true;
        }
    }

    // ==================== Index Conversion ====================

    /// Converts a Position (line, column) to a character index.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.line_len_without_break(pos.line);

        // Column may sit at end of line (for insertion), never past the break
        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Number of characters on a line, not counting its line break.
    fn line_len_without_break(&self, line_idx: usize) -> usize {
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len == 0 {
            return 0;
        }
        match line.char(len - 1) {
            '\n' if len >= 2 && line.char(len - 2) == '\r' => len - 2,
            '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => {
                len - 1
            }
            _ => len,
        }
    }

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }

    /// Converts a byte offset on a `char` boundary to a character index.
    pub fn byte_to_char(&self, byte_idx: usize) -> BufferResult<usize> {
        if byte_idx > self.len_bytes() {
            return Err(BufferError::InvalidByteIndex(byte_idx));
        }
        let char_idx = self.rope.byte_to_char(byte_idx);
        if self.rope.char_to_byte(char_idx) != byte_idx {
            return Err(BufferError::InvalidByteIndex(byte_idx));
        }
        Ok(char_idx)
    }

    /// Converts a character index to a byte offset.
    pub fn char_to_byte(&self, char_idx: usize) -> BufferResult<usize> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        Ok(self.rope.char_to_byte(char_idx))
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            modified: false,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
