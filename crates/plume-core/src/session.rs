//! Session persistence.
//!
//! The session is a flat JSON object written when the editor exits and
//! read when it starts:
//!
//! ```json
//! {
//!   "file": "/home/me/notes.py",
//!   "geometry": "1000x700+40+40",
//!   "dark_mode": false,
//!   "syntax": true,
//!   "font": "monospace",
//!   "size": 12
//! }
//! ```
//!
//! Reading never fails the caller. Loading starts from a base record,
//! normally the preferences the configuration already produced, and each
//! field is taken on its own: a field that is missing or has the wrong type
//! keeps the base value while the rest of the record still loads. Unknown
//! keys are ignored.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Font family used when nothing else is configured.
pub const DEFAULT_FONT: &str = "monospace";

/// Font size used when nothing else is configured.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Editor preferences and the last opened file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// File to reopen, if it still exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Window geometry string as reported by the front end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,

    pub dark_mode: bool,

    /// Syntax highlighting enabled
    pub syntax: bool,

    /// Font family
    pub font: String,

    /// Font size in points
    pub size: u32,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            file: None,
            geometry: None,
            dark_mode: false,
            syntax: true,
            font: DEFAULT_FONT.to_string(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

impl SessionRecord {
    /// Loads the session at `path` over `base`, returning `base` unchanged
    /// on any failure.
    pub fn load(path: impl AsRef<Path>, base: Self) -> Self {
        let path = path.as_ref();
        match Self::try_load(path, base.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("{}; keeping configured preferences", e);
                base
            }
        }
    }

    /// Loads the session at `path` over `base`.
    ///
    /// A missing file is not an error and yields `base`. A `file` entry
    /// that no longer exists on disk is dropped.
    pub fn try_load(path: impl AsRef<Path>, base: Self) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No session file at {}", path.display());
                return Ok(base);
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let malformed = |source| SessionError::Malformed {
            path: path.to_path_buf(),
            source,
        };
        let value: Value = serde_json::from_str(&content).map_err(malformed)?;
        let Value::Object(fields) = value else {
            return Err(malformed(serde::de::Error::custom(
                "session must be a JSON object",
            )));
        };

        let mut record = Self::from_fields(&fields, base);
        if let Some(file) = record.file.take_if(|file| !file.exists()) {
            tracing::debug!("Dropping missing session file {}", file.display());
        }
        Ok(record)
    }

    /// Builds a record from a JSON object, field by field. Fields that are
    /// absent or invalid keep their value from `base`.
    pub fn from_fields(fields: &Map<String, Value>, base: Self) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let flag = |key: &str| fields.get(key).and_then(Value::as_bool);

        Self {
            file: text("file").map(PathBuf::from).or(base.file),
            geometry: text("geometry").or(base.geometry),
            dark_mode: flag("dark_mode").unwrap_or(base.dark_mode),
            syntax: flag("syntax").unwrap_or(base.syntax),
            font: text("font").unwrap_or(base.font),
            size: fields
                .get("size")
                .and_then(Value::as_u64)
                .and_then(|size| u32::try_from(size).ok())
                .filter(|&size| size > 0)
                .unwrap_or(base.size),
        }
    }

    /// Writes the session to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(SessionError::Encode)?;
        std::fs::write(path, content).map_err(|source| SessionError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Session persistence errors.
///
/// `Read` and `Malformed` happen while loading, `Encode` and `Write` while
/// saving. Neither side is ever fatal to the editor.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to read session {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed session {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write session {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Returns true for failures that happen while loading.
    pub fn is_load_error(&self) -> bool {
        matches!(self, SessionError::Read { .. } | SessionError::Malformed { .. })
    }
}
