//! The markup compiler.
//!
//! Markup strings carry inline formatting directives that compile into a line
//! of attributed cells. A string may open with one leading directive:
//!
//! | Token      | Meaning                                  |
//! |------------|------------------------------------------|
//! | `<L>`      | left alignment (the default)             |
//! | `<C>`      | centered                                 |
//! | `<R>`      | right alignment                          |
//! | `<I=n>`    | indent by `n` blank columns              |
//! | `<B=text>` | bold bullet followed by one blank column |
//! | `<F=name>` | file link, recorded but not displayed    |
//!
//! Inline markers start with `<` followed by `/`, `!` or `#`, and may chain
//! several commands: `</B/31>` turns on bold and color pair 31, `<!B!U>` turns
//! both off, `<#HL(10)>` draws ten horizontal line glyphs. `\<` is a literal
//! `<`, and a tab advances to the next multiple of eight columns.
//!
//! Compilation never fails. Anything that is not a well-formed directive is
//! copied through as literal text.
use super::style::{ATTR_CODES, AttrSet, Attributes, MAX_PAIR, glyph};

/// Tab stops fall on multiples of this width.
const TAB_WIDTH: usize = 8;

/// Horizontal alignment of a line inside its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Alignment {
    /// Flush left.
    #[default]
    Left,
    /// Flush right.
    Right,
    /// Centered, rounding towards the left.
    Center,
}

/// One display cell: a character and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The displayed character.
    pub ch: char,
    /// Display attributes.
    pub attrs: Attributes,
}

impl Cell {
    /// Construct a cell.
    pub const fn new(ch: char, attrs: Attributes) -> Self {
        Self { ch, attrs }
    }

    /// A blank cell with no attributes.
    pub const fn blank() -> Self {
        Self::new(' ', Attributes::plain())
    }
}

/// A compiled line of markup. Immutable once compiled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributedText {
    /// Cells in display order.
    cells: Vec<Cell>,
    /// Alignment requested by the leading directive.
    align: Alignment,
    /// Columns consumed by a bullet or indent prefix.
    leading: usize,
    /// File link target from a `<F=...>` directive.
    link: Option<String>,
}

impl AttributedText {
    /// Plain text with uniform attributes and no markup interpretation.
    pub fn styled(text: &str, attrs: Attributes) -> Self {
        Self {
            cells: text.chars().map(|ch| Cell::new(ch, attrs)).collect(),
            ..Self::default()
        }
    }

    /// The compiled cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Alignment requested by the markup.
    pub fn alignment(&self) -> Alignment {
        self.align
    }

    /// Width of the bullet or indent prefix.
    pub fn leading_width(&self) -> usize {
        self.leading
    }

    /// File link target, if the markup named one.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Display width in columns.
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// True if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The text with all attributes stripped.
    pub fn plain_text(&self) -> String {
        self.cells.iter().map(|c| c.ch).collect()
    }
}

/// A single inline toggle target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    /// An attribute flag.
    Flag(AttrSet),
    /// A color pair index.
    Pair(u8),
}

/// One command parsed out of an inline marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Turn a toggle on.
    On(Toggle),
    /// Turn a toggle off.
    Off(Toggle),
    /// Emit a glyph `n` times.
    Glyph(char, usize),
}

/// Result of parsing a leading directive.
#[derive(Debug, Default)]
struct Leading {
    /// Index of the first character after the directive.
    start: usize,
    /// Requested alignment.
    align: Alignment,
    /// Cells injected by a bullet or indent.
    cells: Vec<Cell>,
    /// File link target.
    link: Option<String>,
}

/// Compile markup assuming the display supports color.
pub fn compile(raw: &str) -> AttributedText {
    compile_for(raw, true)
}

/// Compile markup. Without color support, color-pair toggles degrade to bold.
pub fn compile_for(raw: &str, colors: bool) -> AttributedText {
    let chars: Vec<char> = raw.chars().collect();
    let lead = parse_leading(&chars);
    let leading = lead.cells.len();
    let mut cells = lead.cells;
    let mut attrs = Attributes::plain();

    let mut i = lead.start;
    while i < chars.len() {
        let c = chars[i];
        if c == '<'
            && matches!(chars.get(i + 1), Some('/' | '!' | '#'))
            && let Some((cmds, end)) = parse_marker(&chars, i)
        {
            for cmd in cmds {
                match cmd {
                    Command::On(t) => apply_on(&mut attrs, t, colors),
                    Command::Off(t) => apply_off(&mut attrs, t, colors),
                    Command::Glyph(g, n) => {
                        cells.extend(std::iter::repeat_n(Cell::new(g, attrs), n));
                    }
                }
            }
            i = end;
            continue;
        }
        if c == '\\' && chars.get(i + 1) == Some(&'<') {
            cells.push(Cell::new('<', attrs));
            i += 2;
            continue;
        }
        if c == '\t' {
            loop {
                cells.push(Cell::new(' ', attrs));
                if cells.len() % TAB_WIDTH == 0 {
                    break;
                }
            }
        } else {
            cells.push(Cell::new(c, attrs));
        }
        i += 1;
    }

    AttributedText {
        cells,
        align: lead.align,
        leading,
        link: lead.link,
    }
}

/// Recognise a leading directive at the start of the line. Anything malformed
/// yields the default, so the text is compiled from the first character.
fn parse_leading(chars: &[char]) -> Leading {
    if chars.first() != Some(&'<') {
        return Leading::default();
    }
    let Some(close) = chars.iter().position(|c| *c == '>') else {
        return Leading::default();
    };
    let body = &chars[1..close];
    let start = close + 1;
    match body {
        ['L'] => Leading {
            start,
            ..Leading::default()
        },
        ['C'] => Leading {
            start,
            align: Alignment::Center,
            ..Leading::default()
        },
        ['R'] => Leading {
            start,
            align: Alignment::Right,
            ..Leading::default()
        },
        ['B', '=', bullet @ ..] => {
            let bold = Attributes::with_flags(AttrSet::BOLD);
            let mut cells: Vec<Cell> = bullet.iter().map(|ch| Cell::new(*ch, bold)).collect();
            cells.push(Cell::blank());
            Leading {
                start,
                cells,
                ..Leading::default()
            }
        }
        ['I', '=', digits @ ..] => match parse_number(digits) {
            Some(n) => Leading {
                start,
                cells: vec![Cell::blank(); n],
                ..Leading::default()
            },
            None => Leading::default(),
        },
        ['F', '=', name @ ..] if !name.is_empty() => Leading {
            start,
            link: Some(name.iter().collect()),
            ..Leading::default()
        },
        _ => Leading::default(),
    }
}

/// Parse a bounded decimal number made only of ASCII digits.
fn parse_number(digits: &[char]) -> Option<usize> {
    if digits.is_empty() || digits.len() > 4 || !digits.iter().all(char::is_ascii_digit) {
        return None;
    }
    digits.iter().collect::<String>().parse().ok()
}

/// Parse an inline marker starting at `start` (the `<`). Returns the commands
/// and the index just past the closing `>`, or `None` if the marker is
/// malformed.
fn parse_marker(chars: &[char], start: usize) -> Option<(Vec<Command>, usize)> {
    let close = start + chars[start..].iter().position(|c| *c == '>')?;
    let body = &chars[start + 1..close];
    let mut cmds = Vec::new();
    let mut k = 0;
    while k < body.len() {
        match body[k] {
            op @ ('/' | '!') => {
                let (toggle, used) = parse_toggle(&body[k + 1..])?;
                cmds.push(if op == '/' {
                    Command::On(toggle)
                } else {
                    Command::Off(toggle)
                });
                k += 1 + used;
            }
            '#' => {
                let name: String = body.get(k + 1..k + 3)?.iter().collect();
                let g = glyph(&name)?;
                k += 3;
                let mut repeat = 1;
                if body.get(k) == Some(&'(') {
                    let len = body[k..].iter().position(|c| *c == ')')?;
                    repeat = parse_number(&body[k + 1..k + len])?;
                    k += len + 1;
                }
                cmds.push(Command::Glyph(g, repeat));
            }
            _ => return None,
        }
    }
    if cmds.is_empty() {
        return None;
    }
    Some((cmds, close + 1))
}

/// Parse the target of a `/` or `!` command, returning it and the number of
/// characters consumed.
fn parse_toggle(body: &[char]) -> Option<(Toggle, usize)> {
    let first = *body.first()?;
    if let Some(flag) = AttrSet::from_code(first) {
        return Some((Toggle::Flag(flag), 1));
    }
    let len = body.iter().take(2).take_while(|c| c.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let pair: u8 = body[..len].iter().collect::<String>().parse().ok()?;
    if pair > MAX_PAIR {
        return None;
    }
    Some((Toggle::Pair(pair), len))
}

/// Apply an "on" toggle to the running attribute state.
fn apply_on(attrs: &mut Attributes, t: Toggle, colors: bool) {
    match t {
        Toggle::Flag(f) => attrs.flags |= f,
        Toggle::Pair(_) if !colors => attrs.flags |= AttrSet::BOLD,
        Toggle::Pair(0) => attrs.pair = None,
        Toggle::Pair(p) => attrs.pair = Some(p),
    }
}

/// Apply an "off" toggle to the running attribute state. Turning off a color
/// pair only clears it if it is the active one.
fn apply_off(attrs: &mut Attributes, t: Toggle, colors: bool) {
    match t {
        Toggle::Flag(f) => attrs.flags.remove(f),
        Toggle::Pair(_) if !colors => attrs.flags.remove(AttrSet::BOLD),
        Toggle::Pair(p) => {
            if attrs.pair == Some(p) {
                attrs.pair = None;
            }
        }
    }
}

/// Produce the markup fragment that turns attributes `prev` into `next`.
///
/// Each differing flag becomes one toggle directive and a color change is a
/// single directive. The order in which simultaneous toggles are emitted is
/// not part of the contract.
pub fn decompile(prev: Attributes, next: Attributes) -> String {
    let mut out = String::new();
    for (code, flag) in ATTR_CODES {
        let was = prev.flags.contains(*flag);
        let is = next.flags.contains(*flag);
        if was != is {
            let op = if is { '/' } else { '!' };
            out.push_str(&format!("<{op}{code}>"));
        }
    }
    if prev.pair != next.pair {
        match (prev.pair, next.pair) {
            (_, Some(p)) => out.push_str(&format!("</{p}>")),
            (Some(p), None) => out.push_str(&format!("<!{p}>")),
            (None, None) => {}
        }
    }
    out
}

/// Reconstruct markup for a whole line. Cell attributes are diffed against
/// their predecessor. Alignment and link survive, but bullet and indent
/// prefixes come back as literal cells.
pub fn to_markup(text: &AttributedText) -> String {
    let mut out = String::new();
    if let Some(link) = text.link() {
        out.push_str(&format!("<F={link}>"));
    } else {
        match text.alignment() {
            Alignment::Left => {}
            Alignment::Center => out.push_str("<C>"),
            Alignment::Right => out.push_str("<R>"),
        }
    }
    let mut prev = Attributes::plain();
    for cell in text.cells() {
        out.push_str(&decompile(prev, cell.attrs));
        prev = cell.attrs;
        if cell.ch == '<' {
            out.push('\\');
        }
        out.push(cell.ch);
    }
    out
}

/// Escape text so that it compiles back to itself verbatim.
pub fn escape(text: &str) -> String {
    text.replace('<', "\\<")
}

/// Offset at which content of `content` columns starts inside a field of
/// `field` columns. Content as wide as the field or wider is never shifted.
pub fn justify(field: usize, content: usize, align: Alignment) -> usize {
    if content >= field {
        return 0;
    }
    match align {
        Alignment::Left => 0,
        Alignment::Right => field - content,
        Alignment::Center => (field - content) / 2,
    }
}
