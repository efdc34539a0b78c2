//! Highlight rules and the built-in Python rule set.

use regex::Regex;

use crate::{HighlightKind, SyntaxError};

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const PYTHON_BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len",
    "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open",
    "ord", "pow", "print", "property", "range", "repr", "reversed", "round", "set", "setattr",
    "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

const DOUBLE_QUOTED: &str = r#""[^"\\]*(?:\\.[^"\\]*)*""#;
const SINGLE_QUOTED: &str = r"'[^'\\]*(?:\\.[^'\\]*)*'";
const LINE_COMMENT: &str = r"#[^\n]*";
const DECIMAL_INTEGER: &str = r"\b[0-9]+\b";

/// A single pattern tagged with the kind it highlights.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    kind: HighlightKind,
}

impl Rule {
    /// Compiles a rule from a regular expression.
    pub fn new(pattern: &str, kind: HighlightKind) -> Result<Self, SyntaxError> {
        let regex = Regex::new(pattern).map_err(|source| SyntaxError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex, kind })
    }

    /// Builds a rule matching any of `words` as a whole word.
    pub fn words(words: &[&str], kind: HighlightKind) -> Result<Self, SyntaxError> {
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(&format!(r"\b(?:{alternation})\b"), kind)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn kind(&self) -> HighlightKind {
        self.kind
    }
}

/// An ordered list of highlight rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keywords, builtins, both quote styles, `#` comments and decimal
    /// integers, in that order.
    pub fn python() -> Result<Self, SyntaxError> {
        Ok(Self::new()
            .with(Rule::words(PYTHON_KEYWORDS, HighlightKind::Keyword)?)
            .with(Rule::words(PYTHON_BUILTINS, HighlightKind::Builtin)?)
            .with(Rule::new(DOUBLE_QUOTED, HighlightKind::String)?)
            .with(Rule::new(SINGLE_QUOTED, HighlightKind::String)?)
            .with(Rule::new(LINE_COMMENT, HighlightKind::Comment)?)
            .with(Rule::new(DECIMAL_INTEGER, HighlightKind::Number)?))
    }

    /// Appends a rule.
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
