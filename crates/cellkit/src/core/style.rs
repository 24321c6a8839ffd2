//! Display attributes, the color-pair palette, and the special glyph table.
//!
//! Attributes are kept in a backend-agnostic [`AttrSet`]. Only the display
//! surface translates them into a terminal's native representation.
use bitflags::bitflags;

bitflags! {
    /// Text attribute flags that can be combined.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrSet: u8 {
        /// Bold text.
        const BOLD = 1 << 0;
        /// Dim text.
        const DIM = 1 << 1;
        /// Blinking text.
        const BLINK = 1 << 2;
        /// Reversed foreground and background.
        const REVERSE = 1 << 3;
        /// Standout text.
        const STANDOUT = 1 << 4;
        /// Underlined text.
        const UNDERLINE = 1 << 5;
    }
}

/// Markup letters for each attribute flag, in the order toggles are emitted.
pub const ATTR_CODES: &[(char, AttrSet)] = &[
    ('B', AttrSet::BOLD),
    ('D', AttrSet::DIM),
    ('K', AttrSet::BLINK),
    ('R', AttrSet::REVERSE),
    ('S', AttrSet::STANDOUT),
    ('U', AttrSet::UNDERLINE),
];

impl AttrSet {
    /// Look up an attribute by its markup letter.
    pub fn from_code(c: char) -> Option<Self> {
        ATTR_CODES
            .iter()
            .find(|(code, _)| *code == c)
            .map(|(_, flag)| *flag)
    }
}

/// The largest valid color-pair index.
pub const MAX_PAIR: u8 = 63;

/// The complete set of attributes applied to one cell: flags plus at most one
/// color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    /// Attribute flags.
    pub flags: AttrSet,
    /// Active color pair, if any.
    pub pair: Option<u8>,
}

impl Attributes {
    /// Plain attributes with no flags and no color.
    pub const fn plain() -> Self {
        Self {
            flags: AttrSet::empty(),
            pair: None,
        }
    }

    /// Attributes with the given flags and no color.
    pub const fn with_flags(flags: AttrSet) -> Self {
        Self { flags, pair: None }
    }

    /// Return a copy with additional flags set.
    pub fn with(mut self, flags: AttrSet) -> Self {
        self.flags |= flags;
        self
    }

    /// Return a copy with the given color pair.
    pub fn with_pair(mut self, pair: u8) -> Self {
        self.pair = Some(pair);
        self
    }

    /// True if no flag and no pair is active.
    pub fn is_plain(&self) -> bool {
        self.flags.is_empty() && self.pair.is_none()
    }
}

/// Base terminal colors used by the color-pair palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// White.
    White,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// Black.
    Black,
}

/// Palette order used to derive color pairs.
pub const PALETTE: [Color; 8] = [
    Color::White,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Black,
];

/// Foreground and background for a color pair. Pair 0 is the terminal
/// default and yields `None`, as does any pair above [`MAX_PAIR`].
pub fn pair_colors(pair: u8) -> Option<(Color, Color)> {
    if pair == 0 || pair > MAX_PAIR {
        return None;
    }
    let n = (pair - 1) as usize;
    Some((PALETTE[n / 8], PALETTE[n % 8]))
}

/// Named special glyphs available to markup through `<#XX>`.
const GLYPHS: &[(&str, char)] = &[
    ("UL", '┌'),
    ("UR", '┐'),
    ("LL", '└'),
    ("LR", '┘'),
    ("LT", '├'),
    ("RT", '┤'),
    ("TT", '┬'),
    ("BT", '┴'),
    ("HL", '─'),
    ("VL", '│'),
    ("PL", '┼'),
    ("PM", '±'),
    ("DG", '°'),
    ("CB", '▒'),
    ("DI", '◆'),
    ("BU", '•'),
    ("S1", '⎺'),
    ("S9", '⎽'),
    ("LA", '←'),
    ("RA", '→'),
    ("TA", '↑'),
    ("BA", '↓'),
];

/// Look up a glyph by its two-letter markup name.
pub fn glyph(name: &str) -> Option<char> {
    GLYPHS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// Look up the markup name of a glyph character.
pub fn glyph_name(ch: char) -> Option<&'static str> {
    GLYPHS.iter().find(|(_, c)| *c == ch).map(|(n, _)| *n)
}

/// Box-drawing glyphs used for widget borders.
pub mod boxchars {
    /// Upper-left corner.
    pub const UL: char = '┌';
    /// Upper-right corner.
    pub const UR: char = '┐';
    /// Lower-left corner.
    pub const LL: char = '└';
    /// Lower-right corner.
    pub const LR: char = '┘';
    /// Horizontal line.
    pub const HL: char = '─';
    /// Vertical line.
    pub const VL: char = '│';
    /// Drop shadow fill.
    pub const SHADOW: char = ' ';
}
