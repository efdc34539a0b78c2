//! Light and dark color themes.

use plume_syntax::HighlightKind;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colors for the window chrome and the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub text_background: Color,
    pub text_foreground: Color,
    pub selection_background: Color,
    pub selection_foreground: Color,
    pub status_background: Color,
    pub status_foreground: Color,
    pub menu_background: Color,
    pub menu_foreground: Color,
    /// Background of find matches
    pub found_background: Color,
}

/// Foreground colors for highlighted syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxColors {
    pub keyword: Color,
    pub builtin: Color,
    pub string: Color,
    pub comment: Color,
    pub number: Color,
}

impl SyntaxColors {
    /// Returns the color for a highlight kind.
    pub fn color(&self, kind: HighlightKind) -> Color {
        match kind {
            HighlightKind::Keyword => self.keyword,
            HighlightKind::Builtin => self.builtin,
            HighlightKind::String => self.string,
            HighlightKind::Comment => self.comment,
            HighlightKind::Number => self.number,
        }
    }
}

impl Default for SyntaxColors {
    fn default() -> Self {
        Self {
            keyword: Color::rgb(0x00, 0x00, 0xFF),
            builtin: Color::rgb(0x80, 0x00, 0x80),
            string: Color::rgb(0x00, 0x80, 0x00),
            comment: Color::gray(0x80),
            number: Color::rgb(0xFF, 0x00, 0xFF),
        }
    }
}

/// Editor theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name
    pub name: &'static str,

    /// Is this a dark theme?
    pub is_dark: bool,

    pub palette: Palette,

    pub syntax: SyntaxColors,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            is_dark: false,
            palette: Palette {
                background: Color::gray(0xFF),
                foreground: Color::gray(0x00),
                text_background: Color::gray(0xFF),
                text_foreground: Color::gray(0x00),
                selection_background: Color::gray(0xCC),
                selection_foreground: Color::gray(0x00),
                status_background: Color::gray(0xF0),
                status_foreground: Color::gray(0x00),
                menu_background: Color::gray(0xF0),
                menu_foreground: Color::gray(0x00),
                found_background: Color::rgb(0xFF, 0xFF, 0x00),
            },
            syntax: SyntaxColors::default(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            is_dark: true,
            palette: Palette {
                background: Color::gray(0x2E),
                foreground: Color::gray(0xE0),
                text_background: Color::gray(0x1E),
                text_foreground: Color::gray(0xE0),
                selection_background: Color::gray(0x3E),
                selection_foreground: Color::gray(0xFF),
                status_background: Color::gray(0x1E),
                status_foreground: Color::gray(0xE0),
                menu_background: Color::gray(0x1E),
                menu_foreground: Color::gray(0xE0),
                found_background: Color::rgb(0xFF, 0xFF, 0x00),
            },
            syntax: SyntaxColors::default(),
        }
    }

    /// Picks the dark or light theme.
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }
}
