//! Main editor orchestration.
//!
//! `Editor` is the controller: it owns the document, the find/replace
//! state, the highlighter, the view preferences and the auto-save
//! scheduler. Front ends talk to it through [`Editor::handle`] and read
//! back the status line, the window title, highlight layers and alerts.
//!
//! ## Error surface
//!
//! `handle` never fails. Read and write failures become an alert (for a
//! dialog) plus a status message, and the operation leaves the previous
//! state in place. The individual operations return [`CoreResult`] so
//! they can be tested and composed directly.

use plume_buffer::{Match, search};
use plume_syntax::{HighlightKind, HighlightSpan, Highlighter};
use std::path::Path;
use std::time::Instant;

use crate::autosave::{AutoSave, Ticket};
use crate::config::Config;
use crate::document::Document;
use crate::event::{Confirm, EditorEvent, Flow};
use crate::session::SessionRecord;
use crate::theme::Theme;
use crate::{CoreError, CoreResult};

/// Application name used in the window title.
pub const APP_NAME: &str = "Plume";

/// Font families offered by the format menu.
pub const FONT_FAMILIES: &[&str] = &[
    "Consolas",
    "Courier New",
    "Arial",
    "Helvetica",
    "Times New Roman",
];

/// Font sizes offered by the format menu.
pub const FONT_SIZES: &[u32] = &[8, 10, 12, 14, 16, 18, 20, 24];

const UNSAVED_TITLE: &str = "Unsaved Changes";

/// Contents of the find/replace panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub term: String,
    pub replacement: String,
    pub case_sensitive: bool,
}

/// Font family and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSettings {
    pub family: String,
    pub size: u32,
}

/// The editor controller state.
///
/// Owned by the single thread that runs the event loop. Nothing in here is
/// shared, so every operation takes `&mut self` and runs to completion.
pub struct Editor {
    /// The open document
    document: Document,

    /// Editor configuration
    config: Config,

    /// Syntax highlight layers
    highlighter: Highlighter,

    /// Find/replace panel state
    search: SearchState,

    /// Matches from the last find
    found: Vec<Match>,

    dark_mode: bool,

    font: FontSettings,

    /// Last geometry reported by the front end
    geometry: Option<String>,

    auto_save: AutoSave,

    /// Status bar text
    status: String,

    /// Messages waiting to be shown in a dialog
    alerts: Vec<String>,
}

impl Editor {
    /// Creates an editor with an empty document.
    pub fn new(config: Config) -> CoreResult<Self> {
        let mut highlighter = Highlighter::python()?;
        highlighter.set_enabled(config.editor.syntax_highlighting, "");

        let mut auto_save = AutoSave::new(config.editor.auto_save_interval());
        if config.editor.auto_save {
            auto_save.enable(Instant::now());
        }

        Ok(Self {
            document: Document::new(),
            highlighter,
            search: SearchState::default(),
            found: Vec::new(),
            dark_mode: config.ui.dark_mode,
            font: FontSettings {
                family: config.ui.font_family.clone(),
                size: config.ui.font_size,
            },
            geometry: None,
            auto_save,
            status: "Ready".to_string(),
            alerts: Vec::new(),
            config,
        })
    }

    // ==================== Event Dispatch ====================

    /// Handles one event to completion.
    ///
    /// `confirm` is consulted before discarding unsaved changes.
    pub fn handle(&mut self, event: EditorEvent, confirm: &mut dyn Confirm) -> Flow {
        tracing::debug!(?event, "Handling event");

        let result = match event {
            EditorEvent::Insert(text) => self.insert(&text),
            EditorEvent::DeleteBackward => self.delete_backward(),
            EditorEvent::MoveCursor(pos) => self
                .document
                .move_cursor_to(pos)
                .map(|()| self.update_cursor_status()),
            EditorEvent::Select { start, end } => self
                .document
                .select(start, end)
                .map(|()| self.update_cursor_status()),
            EditorEvent::SelectAll => self.document.select_all(),

            EditorEvent::NewFile => {
                self.new_file(confirm);
                Ok(())
            }
            EditorEvent::Open(path) => self.open(&path, confirm).map(|_| ()),
            EditorEvent::Save => self.save(),
            EditorEvent::SaveAs(path) => self.save_as(&path),
            EditorEvent::Exit => return self.exit(confirm),

            EditorEvent::SetSearchTerm(term) => {
                self.search.term = term;
                Ok(())
            }
            EditorEvent::SetReplaceTerm(replacement) => {
                self.search.replacement = replacement;
                Ok(())
            }
            EditorEvent::SetCaseSensitive(case_sensitive) => {
                self.search.case_sensitive = case_sensitive;
                Ok(())
            }
            EditorEvent::Find => {
                self.find();
                Ok(())
            }
            EditorEvent::ReplaceNext => self.replace_next().map(|_| ()),
            EditorEvent::ReplaceAll => self.replace_all().map(|_| ()),

            EditorEvent::ToggleDarkMode => {
                self.toggle_dark_mode();
                Ok(())
            }
            EditorEvent::ToggleSyntax => {
                self.toggle_syntax();
                Ok(())
            }
            EditorEvent::ToggleAutoSave => {
                self.toggle_auto_save(Instant::now());
                Ok(())
            }
            EditorEvent::SetFont { family, size } => self.set_font(family, size),
            EditorEvent::SetGeometry(geometry) => {
                self.geometry = Some(geometry);
                Ok(())
            }

            EditorEvent::AutoSaveTick(ticket) => self.auto_save_tick(ticket, Instant::now()),
        };

        if let Err(e) = result {
            self.report(e);
        }
        Flow::Continue
    }

    /// Turns a failed action into a status message and an alert.
    fn report(&mut self, error: CoreError) {
        match &error {
            CoreError::Write { .. } => tracing::error!("{}", error),
            _ => tracing::warn!("{}", error),
        }
        let message = error.to_string();
        self.status = message.clone();
        self.alerts.push(message);
    }

    // ==================== File Operations ====================

    /// Starts a new empty document. Returns false if the user declined to
    /// discard unsaved changes.
    pub fn new_file(&mut self, confirm: &mut dyn Confirm) -> bool {
        if !self.confirm_discard(confirm, "Discard changes?") {
            return false;
        }
        self.document.reset();
        self.text_changed();
        self.status = "New file created".to_string();
        true
    }

    /// Replaces the document with the contents of `path`.
    ///
    /// Returns `Ok(false)` if the user declined to discard unsaved changes.
    /// On a read failure the current document is kept as it was.
    pub fn open(&mut self, path: impl AsRef<Path>, confirm: &mut dyn Confirm) -> CoreResult<bool> {
        if !self.confirm_discard(confirm, "Discard changes?") {
            return Ok(false);
        }
        self.load_file(path.as_ref())?;
        Ok(true)
    }

    fn load_file(&mut self, path: &Path) -> CoreResult<()> {
        self.document = Document::from_file(path)?;
        self.text_changed();
        tracing::info!("Opened {}", path.display());
        self.status = format!("Opened: {}", path.display());
        Ok(())
    }

    /// Saves the document to its current file.
    pub fn save(&mut self) -> CoreResult<()> {
        let path = self
            .document
            .path()
            .map(Path::to_path_buf)
            .ok_or(CoreError::NoFilePath)?;
        self.document.save_to(&path)?;
        tracing::info!("Saved {}", path.display());
        self.status = format!("Saved: {}", path.display());
        Ok(())
    }

    /// Saves the document under a new file name.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.document.save_to(path)?;
        tracing::info!("Saved as {}", path.display());
        self.status = format!("Saved as: {}", path.display());
        Ok(())
    }

    /// Writes the session and asks the front end to quit, unless the user
    /// declines to discard unsaved changes.
    pub fn exit(&mut self, confirm: &mut dyn Confirm) -> Flow {
        if !self.confirm_discard(confirm, "Exit without saving?") {
            return Flow::Continue;
        }
        if self.config.session.enabled {
            let path = &self.config.session.path;
            match self.session_record().save(path) {
                Ok(()) => tracing::debug!("Session written to {}", path.display()),
                Err(e) => tracing::warn!("{}", e),
            }
        }
        Flow::Exit
    }

    fn confirm_discard(&mut self, confirm: &mut dyn Confirm, message: &str) -> bool {
        !self.document.is_modified() || confirm.confirm(UNSAVED_TITLE, message)
    }

    // ==================== Session ====================

    /// Restores the session stored at `path` on top of the current
    /// preferences. Fields the session lacks keep their configured values.
    pub fn load_session(&mut self, path: impl AsRef<Path>) {
        let record = SessionRecord::load(path, self.session_record());
        self.restore_session(&record);
    }

    /// Applies a saved session: view preferences first, then reopens the
    /// last file if the session names one.
    pub fn restore_session(&mut self, record: &SessionRecord) {
        self.geometry = record.geometry.clone();
        self.dark_mode = record.dark_mode;
        self.font = FontSettings {
            family: record.font.clone(),
            size: record.size,
        };
        {
            let text = self.document.text();
            self.highlighter.set_enabled(record.syntax, &text);
        }

        if let Some(file) = &record.file {
            if let Err(e) = self.load_file(file) {
                self.report(e);
            }
        }
    }

    /// Captures the current preferences and file for the session store.
    pub fn session_record(&self) -> SessionRecord {
        SessionRecord {
            file: self.document.path().map(Path::to_path_buf),
            geometry: self.geometry.clone(),
            dark_mode: self.dark_mode,
            syntax: self.highlighter.is_enabled(),
            font: self.font.family.clone(),
            size: self.font.size,
        }
    }

    // ==================== Text Editing ====================

    /// Inserts text at the cursor.
    pub fn insert(&mut self, text: &str) -> CoreResult<()> {
        self.document.insert_at_cursor(text)?;
        self.text_changed();
        self.update_cursor_status();
        Ok(())
    }

    /// Deletes the selection or the character before the cursor.
    pub fn delete_backward(&mut self) -> CoreResult<()> {
        self.document.delete_backward()?;
        self.text_changed();
        self.update_cursor_status();
        Ok(())
    }

    /// Recomputes everything derived from the text.
    fn text_changed(&mut self) {
        self.found.clear();
        let text = self.document.text();
        self.highlighter.refresh(&text);
    }

    fn update_cursor_status(&mut self) {
        self.status = self.document.cursor_status();
    }

    // ==================== Find & Replace ====================

    /// Highlights every match of the search term. Returns the match count.
    pub fn find(&mut self) -> usize {
        self.found.clear();
        if self.search.term.is_empty() {
            return 0;
        }
        let text = self.document.text();
        self.found = search::find_all(&text, &self.search.term, self.search.case_sensitive);
        self.status = format!("Found: {}", self.search.term);
        self.found.len()
    }

    /// Replaces the first match at or after the selection start (or the
    /// document start). Returns false when nothing was replaced.
    pub fn replace_next(&mut self) -> CoreResult<bool> {
        let SearchState {
            term,
            replacement,
            case_sensitive,
        } = self.search.clone();
        let from = self.document.selection_start_byte()?.unwrap_or(0);

        let text = self.document.text();
        let Some(replaced) = search::replace_next(&text, &term, &replacement, case_sensitive, from)
        else {
            return Ok(false);
        };
        drop(text);

        let cursor = replaced.inserted(&replacement).end;
        self.document.replace_text(&replaced.text, cursor)?;
        self.text_changed();
        self.find();
        self.status = format!("Replaced: {} with {}", term, replacement);
        Ok(true)
    }

    /// Replaces every match. Returns the number of replacements.
    pub fn replace_all(&mut self) -> CoreResult<usize> {
        let SearchState {
            term,
            replacement,
            case_sensitive,
        } = self.search.clone();
        if term.is_empty() || replacement.is_empty() {
            return Ok(0);
        }

        self.found.clear();
        let cursor = self.document.cursor_byte()?;
        let (text, count) =
            search::replace_all(&self.document.text(), &term, &replacement, case_sensitive);
        if count > 0 {
            self.document.replace_text(&text, cursor)?;
            self.text_changed();
        }
        self.status = format!("Replaced {} occurrences", count);
        Ok(count)
    }

    // ==================== View & Format ====================

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.status = format!("Dark mode {}", on_off(self.dark_mode));
    }

    /// Switches syntax highlighting. Turning it on rescans the document.
    pub fn toggle_syntax(&mut self) {
        let enabled = !self.highlighter.is_enabled();
        let text = self.document.text();
        self.highlighter.set_enabled(enabled, &text);
        self.status = format!("Syntax highlighting {}", on_off(enabled));
    }

    /// Switches auto-save. Disabling cancels any pending firing.
    pub fn toggle_auto_save(&mut self, now: Instant) {
        if self.auto_save.is_enabled() {
            self.auto_save.disable();
            self.status = "Auto-save disabled".to_string();
        } else {
            self.auto_save.enable(now);
            self.status = "Auto-save enabled".to_string();
        }
    }

    /// Changes the editor font.
    pub fn set_font(&mut self, family: String, size: u32) -> CoreResult<()> {
        if family.trim().is_empty() || size == 0 {
            return Err(CoreError::InvalidOperation(format!(
                "invalid font {:?} at size {}",
                family, size
            )));
        }
        self.status = format!("Font: {} {}", family, size);
        self.font = FontSettings { family, size };
        Ok(())
    }

    // ==================== Auto-save ====================

    /// Handles a delivered auto-save ticket.
    ///
    /// Saves only when the ticket is current, auto-save is still enabled
    /// and the document is modified.
    pub fn auto_save_tick(&mut self, ticket: Ticket, now: Instant) -> CoreResult<()> {
        if !self.auto_save.fire(ticket, now) {
            tracing::debug!("Ignoring stale auto-save tick");
            return Ok(());
        }
        if !self.document.is_modified() {
            return Ok(());
        }
        if self.document.path().is_none() {
            self.status = "Auto-save skipped: document has no file name".to_string();
            return Ok(());
        }

        self.save()?;
        self.status = format!("Auto-saved at {}", chrono::Local::now().format("%H:%M"));
        Ok(())
    }

    pub fn auto_save(&self) -> &AutoSave {
        &self.auto_save
    }

    // ==================== Accessors ====================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Ranges highlighted by the last find.
    pub fn found(&self) -> &[Match] {
        &self.found
    }

    /// Current syntax highlight layers.
    pub fn highlights(&self) -> &[HighlightSpan] {
        self.highlighter.spans()
    }

    /// Number of highlighted spans of one kind.
    pub fn highlight_count(&self, kind: HighlightKind) -> usize {
        self.highlighter.spans_of(kind).count()
    }

    /// Kinds of every highlight layer covering the cursor.
    pub fn highlights_at_cursor(&self) -> Vec<HighlightKind> {
        match self.document.cursor_byte() {
            Ok(offset) => self.highlighter.spans_at(offset).map(|span| span.kind).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_syntax_enabled(&self) -> bool {
        self.highlighter.is_enabled()
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode)
    }

    pub fn font(&self) -> &FontSettings {
        &self.font
    }

    pub fn geometry(&self) -> Option<&str> {
        self.geometry.as_deref()
    }

    /// Status bar text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Window title, e.g. `Plume - notes.txt`.
    pub fn title(&self) -> String {
        format!("{} - {}", APP_NAME, self.document.name())
    }

    /// Drains messages that should be shown in a dialog.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_buffer::Position;
    use std::path::PathBuf;

    fn accept() -> impl FnMut(&str, &str) -> bool {
        |_: &str, _: &str| true
    }

    fn decline() -> impl FnMut(&str, &str) -> bool {
        |_: &str, _: &str| false
    }

    fn editor() -> Editor {
        let mut config = Config::default();
        config.session.enabled = false;
        Editor::new(config).unwrap()
    }

    fn editor_with(text: &str) -> Editor {
        let mut editor = editor();
        editor.insert(text).unwrap();
        editor
    }

    fn send(editor: &mut Editor, event: EditorEvent) -> Flow {
        editor.handle(event, &mut accept())
    }

    #[test]
    fn test_initial_state() {
        let editor = editor();
        assert_eq!(editor.status(), "Ready");
        assert_eq!(editor.title(), "Plume - Untitled");
        assert!(!editor.is_modified());
        assert!(editor.is_syntax_enabled());
        assert!(!editor.auto_save().is_enabled());
    }

    #[test]
    fn test_typing_updates_status_and_highlights() {
        let mut editor = editor();
        send(&mut editor, EditorEvent::Insert("import os\n".into()));

        assert!(editor.is_modified());
        assert_eq!(editor.status(), "Line: 2, Col: 0 | Lines: 2 *");
        assert!(editor
            .highlights()
            .iter()
            .any(|span| span.kind == HighlightKind::Keyword && span.start == 0));
    }

    #[test]
    fn test_move_past_line_break_is_rejected() {
        let mut editor = editor_with("ab\ncd");
        send(&mut editor, EditorEvent::MoveCursor(Position::new(0, 3)));

        assert_eq!(editor.take_alerts().len(), 1);
        assert_eq!(editor.document().cursor(), Position::new(1, 2));

        send(&mut editor, EditorEvent::MoveCursor(Position::new(0, 2)));
        assert_eq!(editor.status(), "Line: 1, Col: 2 | Lines: 2 *");
        send(&mut editor, EditorEvent::Insert("X".into()));
        assert_eq!(editor.document().text(), "abX\ncd");
    }

    #[test]
    fn test_open_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.py");
        std::fs::write(&path, "def f():\n    return 1\n").unwrap();

        let mut editor = editor();
        assert!(editor.open(&path, &mut accept()).unwrap());
        assert_eq!(editor.document().text(), "def f():\n    return 1\n");
        assert_eq!(editor.title(), "Plume - script.py");
        assert_eq!(editor.status(), format!("Opened: {}", path.display()));
        assert!(!editor.is_modified());
        assert!(!editor.highlights().is_empty());
    }

    #[test]
    fn test_open_failure_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor_with("keep me");

        send(&mut editor, EditorEvent::Open(dir.path().join("absent.txt")));

        assert_eq!(editor.document().text(), "keep me");
        assert!(editor.is_modified());
        let alerts = editor.take_alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Failed to open file"));
        assert!(editor.take_alerts().is_empty());
    }

    #[test]
    fn test_declined_open_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.txt");
        std::fs::write(&path, "other").unwrap();

        let mut editor = editor_with("draft");
        assert!(!editor.open(&path, &mut decline()).unwrap());
        assert_eq!(editor.document().text(), "draft");
        assert!(editor.is_modified());
    }

    #[test]
    fn test_new_file_asks_before_discarding() {
        let mut editor = editor_with("draft");

        assert!(!editor.new_file(&mut decline()));
        assert_eq!(editor.document().text(), "draft");

        assert!(editor.new_file(&mut accept()));
        assert!(editor.document().text().is_empty());
        assert!(!editor.is_modified());
        assert_eq!(editor.status(), "New file created");
    }

    #[test]
    fn test_unmodified_document_needs_no_confirmation() {
        let mut editor = editor();
        let mut asked = false;
        let mut confirm = |_: &str, _: &str| {
            asked = true;
            false
        };
        assert!(editor.new_file(&mut confirm));
        assert!(!asked);
    }

    #[test]
    fn test_save_and_save_as() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut editor = editor_with("hello");

        assert!(matches!(editor.save(), Err(CoreError::NoFilePath)));
        assert!(editor.is_modified());

        editor.save_as(&path).unwrap();
        assert!(!editor.is_modified());
        assert_eq!(editor.status(), format!("Saved as: {}", path.display()));

        editor.insert("!").unwrap();
        editor.save().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello!");
        assert_eq!(editor.status(), format!("Saved: {}", path.display()));
    }

    #[test]
    fn test_failed_save_keeps_modified_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor_with("unsaved");

        send(
            &mut editor,
            EditorEvent::SaveAs(dir.path().join("missing").join("out.txt")),
        );

        assert!(editor.is_modified());
        assert!(editor.document().path().is_none());
        assert!(editor.status().starts_with("Failed to save file"));
        assert_eq!(editor.take_alerts().len(), 1);
    }

    #[test]
    fn test_find_records_matches() {
        let mut editor = editor_with("Hello hello HELLO");
        send(&mut editor, EditorEvent::SetSearchTerm("hello".into()));
        send(&mut editor, EditorEvent::Find);
        assert_eq!(editor.found().len(), 3);
        assert_eq!(editor.status(), "Found: hello");

        send(&mut editor, EditorEvent::SetCaseSensitive(true));
        send(&mut editor, EditorEvent::Find);
        assert_eq!(editor.found(), &[Match::new(6, 11)]);

        send(&mut editor, EditorEvent::Insert("!".into()));
        assert!(editor.found().is_empty());
    }

    #[test]
    fn test_find_with_empty_term() {
        let mut editor = editor_with("text");
        assert_eq!(editor.find(), 0);
        assert_eq!(editor.status(), "Line: 1, Col: 4 | Lines: 1 *");
    }

    #[test]
    fn test_replace_next_starts_at_selection() {
        let mut editor = editor_with("cat cat cat");
        send(&mut editor, EditorEvent::SetSearchTerm("cat".into()));
        send(&mut editor, EditorEvent::SetReplaceTerm("dog".into()));
        send(
            &mut editor,
            EditorEvent::Select {
                start: Position::new(0, 2),
                end: Position::new(0, 5),
            },
        );

        assert!(editor.replace_next().unwrap());
        assert_eq!(editor.document().text(), "cat dog cat");
        assert_eq!(editor.document().cursor(), Position::new(0, 7));
        assert_eq!(editor.status(), "Replaced: cat with dog");
        assert_eq!(editor.found(), &[Match::new(0, 3), Match::new(8, 11)]);

        // No selection now, so the next one starts from the top
        assert!(editor.replace_next().unwrap());
        assert_eq!(editor.document().text(), "dog dog cat");
    }

    #[test]
    fn test_replace_needs_both_terms() {
        let mut editor = editor_with("abc");
        send(&mut editor, EditorEvent::SetSearchTerm("b".into()));
        assert!(!editor.replace_next().unwrap());
        assert_eq!(editor.replace_all().unwrap(), 0);
        assert_eq!(editor.document().text(), "abc");
    }

    #[test]
    fn test_replace_all() {
        let mut editor = editor_with("aaa");
        send(&mut editor, EditorEvent::SetSearchTerm("a".into()));
        send(&mut editor, EditorEvent::SetReplaceTerm("aa".into()));
        send(&mut editor, EditorEvent::Find);
        send(&mut editor, EditorEvent::ReplaceAll);

        assert_eq!(editor.document().text(), "aaaaaa");
        assert_eq!(editor.status(), "Replaced 3 occurrences");
        assert!(editor.found().is_empty());
        assert!(editor.is_modified());
    }

    #[test]
    fn test_replace_all_without_matches_keeps_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.txt");
        std::fs::write(&path, "nothing here").unwrap();

        let mut editor = editor();
        editor.open(&path, &mut accept()).unwrap();
        send(&mut editor, EditorEvent::SetSearchTerm("zzz".into()));
        send(&mut editor, EditorEvent::SetReplaceTerm("y".into()));
        assert_eq!(editor.replace_all().unwrap(), 0);
        assert!(!editor.is_modified());
        assert_eq!(editor.status(), "Replaced 0 occurrences");
    }

    #[test]
    fn test_toggles() {
        let mut editor = editor_with("while True: pass");

        send(&mut editor, EditorEvent::ToggleDarkMode);
        assert!(editor.is_dark_mode());
        assert!(editor.theme().is_dark);
        assert_eq!(editor.status(), "Dark mode on");

        send(&mut editor, EditorEvent::ToggleSyntax);
        assert!(!editor.is_syntax_enabled());
        assert!(editor.highlights().is_empty());
        assert_eq!(editor.status(), "Syntax highlighting off");

        send(&mut editor, EditorEvent::Insert(" # x".into()));
        assert!(editor.highlights().is_empty());

        send(&mut editor, EditorEvent::ToggleSyntax);
        assert!(editor
            .highlights()
            .iter()
            .any(|span| span.kind == HighlightKind::Comment));
        assert_eq!(editor.status(), "Syntax highlighting on");
    }

    #[test]
    fn test_highlights_at_cursor() {
        let mut editor = editor_with("s = 'if x'  # note");
        assert_eq!(editor.highlight_count(HighlightKind::String), 1);
        assert_eq!(editor.highlight_count(HighlightKind::Comment), 1);

        send(&mut editor, EditorEvent::MoveCursor(Position::new(0, 5)));
        let kinds = editor.highlights_at_cursor();
        assert!(kinds.contains(&HighlightKind::Keyword));
        assert!(kinds.contains(&HighlightKind::String));

        send(&mut editor, EditorEvent::MoveCursor(Position::new(0, 1)));
        assert!(editor.highlights_at_cursor().is_empty());
    }

    #[test]
    fn test_set_font() {
        let mut editor = editor();
        send(
            &mut editor,
            EditorEvent::SetFont {
                family: "Courier New".into(),
                size: 16,
            },
        );
        assert_eq!(editor.font().family, "Courier New");
        assert_eq!(editor.font().size, 16);

        send(
            &mut editor,
            EditorEvent::SetFont {
                family: "Arial".into(),
                size: 0,
            },
        );
        assert_eq!(editor.font().family, "Courier New");
        assert_eq!(editor.take_alerts().len(), 1);
    }

    #[test]
    fn test_auto_save_writes_modified_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.txt");
        let mut editor = editor_with("v1");
        editor.save_as(&path).unwrap();

        send(&mut editor, EditorEvent::ToggleAutoSave);
        assert_eq!(editor.status(), "Auto-save enabled");

        // Unmodified: the tick is consumed without writing
        let (_, ticket) = editor.auto_save().next().unwrap();
        send(&mut editor, EditorEvent::AutoSaveTick(ticket));
        assert_eq!(editor.status(), "Auto-save enabled");

        editor.insert("+").unwrap();
        let (_, ticket) = editor.auto_save().next().unwrap();
        send(&mut editor, EditorEvent::AutoSaveTick(ticket));
        assert!(!editor.is_modified());
        assert!(editor.status().starts_with("Auto-saved at "));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v1+");
    }

    #[test]
    fn test_disabling_auto_save_cancels_pending_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.txt");
        let mut editor = editor_with("v1");
        editor.save_as(&path).unwrap();

        send(&mut editor, EditorEvent::ToggleAutoSave);
        let (_, ticket) = editor.auto_save().next().unwrap();
        send(&mut editor, EditorEvent::ToggleAutoSave);
        assert_eq!(editor.status(), "Auto-save disabled");

        editor.insert("+").unwrap();
        send(&mut editor, EditorEvent::AutoSaveTick(ticket));
        assert!(editor.is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v1");
    }

    #[test]
    fn test_auto_save_without_file_name() {
        let mut editor = editor_with("scratch");
        editor.toggle_auto_save(Instant::now());
        let (_, ticket) = editor.auto_save().next().unwrap();
        send(&mut editor, EditorEvent::AutoSaveTick(ticket));

        assert!(editor.is_modified());
        assert_eq!(editor.status(), "Auto-save skipped: document has no file name");
        assert!(editor.take_alerts().is_empty());
    }

    #[test]
    fn test_exit_asks_and_writes_session() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("editor_session.json");
        let mut config = Config::default();
        config.session.path = session_path.clone();

        let mut editor = Editor::new(config).unwrap();
        editor.insert("unsaved").unwrap();
        send(&mut editor, EditorEvent::SetGeometry("800x600+0+0".into()));

        assert_eq!(editor.handle(EditorEvent::Exit, &mut decline()), Flow::Continue);
        assert!(!session_path.exists());

        assert_eq!(editor.handle(EditorEvent::Exit, &mut accept()), Flow::Exit);
        let record = SessionRecord::try_load(&session_path, SessionRecord::default()).unwrap();
        assert_eq!(record.geometry.as_deref(), Some("800x600+0+0"));
        assert!(record.syntax);
    }

    #[test]
    fn test_exit_survives_session_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.path = dir.path().join("missing").join("session.json");

        let mut editor = Editor::new(config).unwrap();
        assert_eq!(send(&mut editor, EditorEvent::Exit), Flow::Exit);
    }

    #[test]
    fn test_session_restore() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.py");
        std::fs::write(&file, "print(1)\n").unwrap();

        let record = SessionRecord {
            file: Some(file.clone()),
            geometry: Some("1000x700".into()),
            dark_mode: true,
            syntax: false,
            font: "Arial".into(),
            size: 14,
        };
        let mut editor = editor();
        editor.restore_session(&record);

        assert_eq!(editor.document().path(), Some(file.as_path()));
        assert!(editor.is_dark_mode());
        assert!(!editor.is_syntax_enabled());
        assert!(editor.highlights().is_empty());
        assert_eq!(editor.font().size, 14);
        assert_eq!(editor.session_record(), record);
    }

    #[test]
    fn test_missing_session_keeps_configured_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.ui.dark_mode = true;
        config.ui.font_family = "Consolas".into();
        config.ui.font_size = 18;
        config.editor.syntax_highlighting = false;

        let mut editor = Editor::new(config).unwrap();
        editor.load_session(dir.path().join("editor_session.json"));

        assert!(editor.is_dark_mode());
        assert!(!editor.is_syntax_enabled());
        assert_eq!(editor.font().family, "Consolas");
        assert_eq!(editor.font().size, 18);
    }

    #[test]
    fn test_partial_session_overrides_only_its_fields() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("editor_session.json");
        std::fs::write(&session_path, r#"{"size": 20, "syntax": true}"#).unwrap();

        let mut config = Config::default();
        config.ui.dark_mode = true;
        config.editor.syntax_highlighting = false;

        let mut editor = Editor::new(config).unwrap();
        editor.load_session(&session_path);

        assert!(editor.is_dark_mode());
        assert!(editor.is_syntax_enabled());
        assert_eq!(editor.font().size, 20);
        assert_eq!(editor.font().family, "monospace");
    }

    #[test]
    fn test_session_restore_with_unreadable_file() {
        let record = SessionRecord {
            file: Some(PathBuf::from("/definitely/not/here.txt")),
            ..SessionRecord::default()
        };
        let mut editor = editor();
        editor.restore_session(&record);

        assert!(editor.document().path().is_none());
        assert_eq!(editor.take_alerts().len(), 1);
    }
}
