//! # Plume Buffer
//!
//! Text storage and literal search for the editor.
//!
//! - [`TextBuffer`] owns the document text in a rope and tracks whether it
//!   differs from what was last loaded or written.
//! - [`search`] finds and replaces literal substrings in plain `&str` text.
//!
//! Search results are byte ranges into the UTF-8 text. They always fall on
//! `char` boundaries, so they can be used to slice the text directly.

mod buffer;
mod position;
pub mod search;

pub use buffer::TextBuffer;
pub use position::Position;
pub use search::{Match, Replaced, find_all, find_next, replace_all, replace_next};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Invalid byte index: {0}")]
    InvalidByteIndex(usize),

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert!(!buffer.is_modified());
        assert_eq!(buffer.len_lines(), 1);
    }

    #[test]
    fn test_reexported_search() {
        let matches = find_all("one two one", "one", true);
        assert_eq!(matches, vec![Match::new(0, 3), Match::new(8, 11)]);
    }
}
