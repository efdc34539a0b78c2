//! # Plume Core
//!
//! Editor controller, session persistence and configuration.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                        Editor                          │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────┐  │
//! │  │ Document │ │  Search  │ │ Highlight│ │ AutoSave  │  │
//! │  └──────────┘ └──────────┘ └──────────┘ └───────────┘  │
//! │        ▲                                               │
//! │        │ handle(EditorEvent, &mut dyn Confirm) -> Flow │
//! └────────┼───────────────────────────────────────────────┘
//!          │
//!    front end (console, GUI, tests)
//! ```
//!
//! The front end turns key presses, menu clicks and timer firings into
//! [`EditorEvent`]s and feeds them to [`Editor::handle`] one at a time.
//! Each event runs to completion before the next one is read, so the editor
//! needs no locking. Results come back as the status line, the title and
//! queued alerts.

pub mod autosave;
pub mod config;
pub mod document;
pub mod editor;
pub mod event;
pub mod session;
pub mod theme;

pub use autosave::{AutoSave, Ticket};
pub use config::Config;
pub use document::Document;
pub use editor::{Editor, FontSettings, SearchState};
pub use event::{Confirm, EditorEvent, Flow};
pub use session::{SessionError, SessionRecord};
pub use theme::{Palette, Theme};

use std::path::PathBuf;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to open file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: plume_buffer::BufferError,
    },

    #[error("Failed to save file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: plume_buffer::BufferError,
    },

    #[error("Document has no file name")]
    NoFilePath,

    #[error("Buffer error: {0}")]
    Buffer(#[from] plume_buffer::BufferError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] plume_syntax::SyntaxError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
