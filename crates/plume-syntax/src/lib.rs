//! # Plume Syntax
//!
//! Rule-based syntax highlighting.
//!
//! A [`RuleSet`] is an ordered list of regular expressions, each tagged
//! with a [`HighlightKind`]. Highlighting runs every rule over the whole
//! document and records each non-overlapping match as a [`HighlightSpan`].
//!
//! Kinds are independent layers rather than the output of a tokenizer:
//! a keyword inside a string literal is reported both as a keyword and as
//! part of the string. Renderers decide how to stack the layers.

mod rules;

pub use rules::{Rule, RuleSet};

/// Errors that can occur while building highlight rules.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Categories of highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightKind {
    Keyword,
    Builtin,
    String,
    Comment,
    Number,
}

impl HighlightKind {
    /// Every kind, in the order the default rules apply them.
    pub const ALL: [HighlightKind; 5] = [
        HighlightKind::Keyword,
        HighlightKind::Builtin,
        HighlightKind::String,
        HighlightKind::Comment,
        HighlightKind::Number,
    ];

    /// Returns the theme color key for this kind.
    pub fn theme_key(&self) -> &'static str {
        match self {
            HighlightKind::Keyword => "keyword",
            HighlightKind::Builtin => "builtin",
            HighlightKind::String => "string",
            HighlightKind::Comment => "comment",
            HighlightKind::Number => "number",
        }
    }
}

/// A highlighted span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Kind of syntax element
    pub kind: HighlightKind,
}

impl HighlightSpan {
    /// Returns true if the byte offset falls inside this span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Runs every rule over `text` and collects the matches.
///
/// Spans are grouped by rule, in rule order, and ordered by position
/// within each rule. The result depends only on `text` and `rules`.
pub fn highlight(text: &str, rules: &RuleSet) -> Vec<HighlightSpan> {
    rules
        .iter()
        .flat_map(|rule| {
            rule.regex().find_iter(text).map(move |m| HighlightSpan {
                start: m.start(),
                end: m.end(),
                kind: rule.kind(),
            })
        })
        .collect()
}

/// Holds the current highlight layers of one document.
///
/// Call [`Highlighter::refresh`] after every text change. Each refresh
/// throws away all previous spans and rescans the whole text.
#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: RuleSet,
    enabled: bool,
    spans: Vec<HighlightSpan>,
}

impl Highlighter {
    /// Creates an enabled highlighter with no spans yet.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            enabled: true,
            spans: Vec::new(),
        }
    }

    /// Creates a highlighter with the built-in Python rules.
    pub fn python() -> Result<Self, SyntaxError> {
        Ok(Self::new(RuleSet::python()?))
    }

    /// Recomputes all spans for `text`. Does nothing but clear when
    /// highlighting is disabled.
    pub fn refresh(&mut self, text: &str) {
        self.spans.clear();
        if !self.enabled {
            return;
        }
        self.spans = highlight(text, &self.rules);
        tracing::trace!(spans = self.spans.len(), "Highlight refreshed");
    }

    /// Enables or disables highlighting. Enabling rescans `text` from
    /// scratch; disabling drops every span.
    pub fn set_enabled(&mut self, enabled: bool, text: &str) {
        self.enabled = enabled;
        self.refresh(text);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns all current spans.
    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    /// Returns the spans of one kind.
    pub fn spans_of(&self, kind: HighlightKind) -> impl Iterator<Item = &HighlightSpan> {
        self.spans.iter().filter(move |span| span.kind == kind)
    }

    /// Returns the spans covering a byte offset.
    pub fn spans_at(&self, offset: usize) -> impl Iterator<Item = &HighlightSpan> {
        self.spans.iter().filter(move |span| span.contains(offset))
    }
}
