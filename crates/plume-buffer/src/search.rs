//! Literal find and replace over plain text.
//!
//! Every function here works on a `&str` snapshot of the document and
//! returns byte ranges into it. The term is matched literally, never as a
//! regular expression. Case-insensitive matching folds each character to
//! lowercase on both sides before comparing, so a match always covers as
//! many characters of the text as the term has.
//!
//! An empty term never matches. Replacement with an empty term or an empty
//! replacement string does nothing.

use std::ops::Range;

/// A matched region of text, as a half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of a single replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// The full text after the replacement
    pub text: String,
    /// The region of the original text that was replaced
    pub span: Match,
}

impl Replaced {
    /// Where the replacement text now sits in [`Replaced::text`].
    pub fn inserted(&self, replacement: &str) -> Match {
        Match::new(self.span.start, self.span.start + replacement.len())
    }
}

/// Finds the first occurrence of `term` starting at or after byte `from`.
///
/// A `from` inside a multi-byte character is moved forward to the next
/// character boundary.
pub fn find_next(text: &str, term: &str, case_sensitive: bool, from: usize) -> Option<Match> {
    if term.is_empty() || from > text.len() {
        return None;
    }
    let from = ceil_char_boundary(text, from);
    let rest = &text[from..];

    if case_sensitive {
        rest.find(term)
            .map(|offset| Match::new(from + offset, from + offset + term.len()))
    } else {
        rest.char_indices().find_map(|(offset, _)| {
            let start = from + offset;
            folded_prefix_len(&text[start..], term).map(|len| Match::new(start, start + len))
        })
    }
}

/// Finds every non-overlapping occurrence of `term`, scanning left to right
/// from the start of the text.
pub fn find_all(text: &str, term: &str, case_sensitive: bool) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut pos = 0;
    while let Some(found) = find_next(text, term, case_sensitive, pos) {
        pos = found.end;
        matches.push(found);
    }
    matches
}

/// Replaces the first occurrence of `term` at or after byte `from`.
///
/// Returns `None` when there is nothing to replace or either string is
/// empty.
pub fn replace_next(
    text: &str,
    term: &str,
    replacement: &str,
    case_sensitive: bool,
    from: usize,
) -> Option<Replaced> {
    if term.is_empty() || replacement.is_empty() {
        return None;
    }
    let span = find_next(text, term, case_sensitive, from)?;

    let mut replaced = String::with_capacity(text.len() - span.len() + replacement.len());
    replaced.push_str(&text[..span.start]);
    replaced.push_str(replacement);
    replaced.push_str(&text[span.end..]);

    Some(Replaced {
        text: replaced,
        span,
    })
}

/// Replaces every occurrence of `term` and returns the new text with the
/// number of replacements made.
///
/// The scan resumes right after the inserted replacement, so text that
/// the replacement itself contributes is never matched again.
pub fn replace_all(
    text: &str,
    term: &str,
    replacement: &str,
    case_sensitive: bool,
) -> (String, usize) {
    let mut result = text.to_string();
    if term.is_empty() || replacement.is_empty() {
        return (result, 0);
    }

    let mut count = 0;
    let mut pos = 0;
    while let Some(found) = find_next(&result, term, case_sensitive, pos) {
        result.replace_range(found.range(), replacement);
        count += 1;
        pos = found.start + replacement.len();
    }

    (result, count)
}

/// Byte length of the prefix of `haystack` that equals `needle` under
/// lowercase folding, if there is one.
fn folded_prefix_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for expected in needle.chars() {
        let (_, actual) = hay.next()?;
        if !chars_equal_folded(actual, expected) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len(), |(idx, _)| idx))
}

fn chars_equal_folded(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
