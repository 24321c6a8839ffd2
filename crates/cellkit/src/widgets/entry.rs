//! A single-line text entry field.
use serde_json::Value;

use crate::{
    config::{self, Options, Schema},
    draw,
    error::{Error, Result},
    event::{Key, KeyCode, keys},
    filter::{CharacterFilter, DisplayType},
    geom::{Expanse, GeometrySpec, LineSegment, Position, Rect, resolve_extent},
    kernel::{COMMON_SIGNALS, Chrome, Kernel, Step, Widget, construct},
    markup::{AttributedText, Cell},
    screen::{PasteBuffer, Screen},
    style::Attributes,
    surface::RegionId,
};

/// Entry options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryConfig {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Title lines, as markup.
    pub title: Vec<String>,
    /// Label drawn to the left of the field, as markup.
    pub label: String,
    /// Field width: positive is absolute, zero is full width, negative is
    /// relative to the screen width.
    pub field_width: i32,
    /// Character drawn in unused field columns.
    pub filler: char,
    /// Character drawn in place of masked input.
    pub hidden: char,
    /// Display discipline.
    pub display: DisplayType,
    /// Initial text.
    pub value: String,
    /// Minimum length accepted on confirm.
    pub min: usize,
    /// Maximum length.
    pub max: usize,
    /// Draw a border.
    pub boxed: bool,
    /// Draw a drop shadow.
    pub shadow: bool,
}

impl EntryConfig {
    /// The option schema.
    pub fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .field("x", "CENTER", |c, v| {
                c.x = config::as_position(v)?;
                Ok(())
            })
            .field("y", "CENTER", |c, v| {
                c.y = config::as_position(v)?;
                Ok(())
            })
            .field("title", Value::Null, |c, v| {
                c.title = config::as_lines(v)?;
                Ok(())
            })
            .field("label", "", |c, v| {
                c.label = config::as_str(v)?;
                Ok(())
            })
            .field("field_width", 0, |c, v| {
                c.field_width = config::as_i32(v)?;
                Ok(())
            })
            .field("filler", ".", |c, v| {
                c.filler = config::as_char(v)?;
                Ok(())
            })
            .field("hidden", "*", |c, v| {
                c.hidden = config::as_char(v)?;
                Ok(())
            })
            .field("display", "MIXED", |c, v| {
                c.display = config::as_display_type(v)?;
                Ok(())
            })
            .field("value", "", |c, v| {
                c.value = config::as_str(v)?;
                Ok(())
            })
            .field("min", 0, |c, v| {
                c.min = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("max", 256, |c, v| {
                c.max = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("box", true, |c, v| {
                c.boxed = config::as_bool(v)?;
                Ok(())
            })
            .field("shadow", false, |c, v| {
                c.shadow = config::as_bool(v)?;
                Ok(())
            })
    }

    /// Build a config from option overrides.
    pub fn from_options(opts: &Options) -> Result<Self> {
        Self::schema().build(opts)
    }
}

/// An editable line of characters with a display window that slides to keep
/// the cursor visible.
#[derive(Debug, PartialEq, Eq, Clone)]
struct TextBuf {
    /// The characters in the buffer.
    value: Vec<char>,
    /// Cursor position, in characters.
    cursor: u32,
    /// The visible window into the value.
    window: LineSegment,
}

impl TextBuf {
    /// A buffer with a display window `width` columns wide.
    fn new(width: u32) -> Self {
        Self {
            value: vec![],
            cursor: 0,
            window: LineSegment::new(0, width),
        }
    }

    fn len(&self) -> u32 {
        self.value.len() as u32
    }

    /// The cursor's column inside the window.
    fn cursor_display(&self) -> u32 {
        self.cursor - self.window.off
    }

    /// Clamp the cursor and bring it into view. The window keeps one spare
    /// column past the end of the text for the cursor.
    fn fix_window(&mut self) {
        self.cursor = self.cursor.min(self.len());
        self.window = self.window.reveal(self.cursor, self.len() + 1);
    }

    fn goto(&mut self, pos: u32) {
        self.cursor = pos;
        self.fix_window();
    }

    fn set(&mut self, text: &str, max: usize) {
        self.value = text.chars().take(max).collect();
        self.goto(self.len());
    }

    fn insert(&mut self, c: char) {
        self.value.insert(self.cursor as usize, c);
        self.goto(self.cursor + 1);
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 || self.value.is_empty() {
            return false;
        }
        self.value.remove(self.cursor as usize - 1);
        self.goto(self.cursor - 1);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.value.remove(self.cursor as usize);
        self.fix_window();
        true
    }

    fn left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.goto(self.cursor - 1);
        true
    }

    fn right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.goto(self.cursor + 1);
        true
    }

    /// Swap the character under the cursor with the one after it.
    fn transpose(&mut self) -> bool {
        let at = self.cursor as usize;
        if at + 1 >= self.value.len() {
            return false;
        }
        self.value.swap(at, at + 1);
        true
    }

    /// The visible characters.
    fn visible(&self) -> &[char] {
        let start = (self.window.off as usize).min(self.value.len());
        let end = (self.window.far() as usize).min(self.value.len());
        &self.value[start..end]
    }
}

/// A single-line text field with a label, filler, character discipline and
/// minimum and maximum lengths.
pub struct Entry {
    /// Kernel state.
    kernel: Kernel<Entry>,
    /// Compiled label.
    label: AttributedText,
    /// The field's region, nested in the window.
    field: RegionId,
    /// Text and display window.
    buf: TextBuf,
    /// Accepted characters.
    filter: CharacterFilter,
    /// Filler character.
    filler: char,
    /// Mask character.
    hidden: char,
    /// Minimum length on confirm.
    min: usize,
    /// Maximum length.
    max: usize,
    /// Shared cut/copy/paste buffer.
    paste: PasteBuffer,
}

impl Entry {
    /// Build an entry field on the screen.
    pub fn new(screen: &mut Screen, conf: EntryConfig) -> Result<Self> {
        construct(screen, "entry", |screen, id| {
            let parent = screen.size();
            let border = u32::from(conf.boxed);
            let label = screen.compile(&conf.label);
            let label_w = label.width() as u32;
            let title_w = conf
                .title
                .iter()
                .map(|t| screen.compile(t).width() as u32)
                .max()
                .unwrap_or(0);

            let field_w = resolve_extent(parent.w, conf.field_width, 1);
            let width = (field_w + label_w)
                .max(title_w)
                .saturating_add(2 * border)
                .min(parent.w);
            let field_w = field_w.min(width.saturating_sub(label_w + 2 * border));
            if field_w == 0 {
                return Err(Error::Construct(format!(
                    "entry: no room for a field in {parent:?}"
                )));
            }
            let height = 2 * border + 1 + conf.title.len() as u32;
            let spec = GeometrySpec::new(conf.x, conf.y, width as i32, height as i32);
            let chrome = Chrome {
                boxed: conf.boxed,
                shadow: conf.shadow,
                title: conf.title.clone(),
            };
            let kernel = Kernel::new(
                screen,
                id,
                "entry",
                COMMON_SIGNALS,
                spec,
                Expanse::new(width, height),
                &chrome,
            )?;

            let o = kernel.content_origin();
            let pad = kernel.inner_width().saturating_sub(label_w + field_w) / 2;
            let field = screen.create_region(
                id,
                Some(kernel.window()),
                Rect::new(o.x + pad + label_w, o.y, field_w, 1),
            )?;

            let mut buf = TextBuf::new(field_w);
            buf.set(&conf.value, conf.max);
            Ok(Self {
                kernel,
                label,
                field,
                buf,
                filter: conf.display.into(),
                filler: conf.filler,
                hidden: conf.hidden,
                min: conf.min,
                max: conf.max,
                paste: screen.paste_buffer(),
            })
        })
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.buf.value.iter().collect()
    }

    /// Replace the text, truncated to the maximum length, and put the cursor
    /// at its end.
    pub fn set_text(&mut self, text: &str) {
        self.buf.set(text, self.max);
    }

    /// Is the field empty?
    pub fn is_empty(&self) -> bool {
        self.buf.value.is_empty()
    }

    /// Clear the text.
    pub fn clean(&mut self) {
        self.buf.set("", self.max);
    }

    /// Cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.buf.cursor as usize
    }

    /// The first visible character.
    pub fn scroll_offset(&self) -> usize {
        self.buf.window.off as usize
    }

    /// Minimum length accepted on confirm.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Set the minimum length.
    pub fn set_min(&mut self, min: usize) {
        self.min = min;
    }

    /// Maximum length.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Set the maximum length. Text beyond it is dropped.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        if self.buf.value.len() > max {
            let text = self.text();
            self.buf.set(&text, max);
        }
    }

    /// Set the filler character.
    pub fn set_filler(&mut self, filler: char) {
        self.filler = filler;
    }

    /// Set the mask character.
    pub fn set_hidden(&mut self, hidden: char) {
        self.hidden = hidden;
    }

    /// The field's region.
    pub fn field_region(&self) -> RegionId {
        self.field
    }

    /// Draw the field alone, and place the cursor in it.
    pub fn draw_field(&mut self, screen: &mut Screen) -> Result<()> {
        let cells: Vec<Cell> = self
            .buf
            .visible()
            .iter()
            .map(|c| {
                let ch = if self.filter.is_masked() { self.hidden } else { *c };
                Cell::new(ch, Attributes::plain())
            })
            .collect();
        draw::write_padded(
            screen,
            self.field,
            0,
            0,
            self.buf.window.len,
            &cells,
            Cell::new(self.filler, Attributes::plain()),
        )?;
        screen.move_cursor(self.field, 0, self.buf.cursor_display())
    }

    /// Type one character.
    fn type_char(&mut self, c: char) -> Step {
        match self.filter.filter(c) {
            Some(c) if self.buf.value.len() < self.max => {
                self.buf.insert(c);
                Step::Handled
            }
            _ => Step::Notice,
        }
    }

    fn handled_if(ok: bool) -> Step {
        if ok { Step::Handled } else { Step::Notice }
    }
}

impl Widget for Entry {
    type Output = String;

    fn kernel(&self) -> &Kernel<Self> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Self> {
        &mut self.kernel
    }

    fn draw(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.draw_chrome(screen)?;
        let o = self.kernel.content_origin();
        let label_w = self.label.width() as u32;
        if label_w > 0 {
            let pad = self
                .kernel
                .inner_width()
                .saturating_sub(label_w + self.buf.window.len)
                / 2;
            draw::write_text(screen, self.kernel.window(), o.y, o.x + pad, label_w, &self.label)?;
        }
        self.draw_field(screen)
    }

    fn handle_input(&mut self, screen: &mut Screen, key: Key) -> Result<Step> {
        let k = key.normalize();
        let step = if k == keys::ERASE {
            self.clean();
            Step::Handled
        } else if k == keys::CUT || k == keys::COPY {
            if self.is_empty() {
                Step::Notice
            } else {
                self.paste.set(&self.text());
                if k == keys::CUT {
                    self.clean();
                }
                Step::Handled
            }
        } else if k == keys::PASTE {
            if self.paste.is_empty() {
                Step::Notice
            } else {
                self.set_text(&self.paste.get());
                Step::Handled
            }
        } else if k == keys::TRANSPOSE {
            Self::handled_if(self.buf.transpose())
        } else if k == keys::BEGIN_OF_LINE {
            self.buf.goto(0);
            Step::Handled
        } else if k == keys::END_OF_LINE {
            self.buf.goto(self.buf.len());
            Step::Handled
        } else if k == keys::REFRESH {
            self.draw(screen)?;
            Step::Handled
        } else if let Some(c) = k.printable() {
            self.type_char(c)
        } else {
            match k.key {
                KeyCode::Up | KeyCode::Down => Step::Notice,
                KeyCode::Home => {
                    self.buf.goto(0);
                    Step::Handled
                }
                KeyCode::End => {
                    self.buf.goto(self.buf.len());
                    Step::Handled
                }
                KeyCode::Left => Self::handled_if(self.buf.left()),
                KeyCode::Right => Self::handled_if(self.buf.right()),
                KeyCode::Backspace if !self.filter.is_view_only() => {
                    Self::handled_if(self.buf.backspace())
                }
                KeyCode::Delete if !self.filter.is_view_only() => {
                    Self::handled_if(self.buf.delete())
                }
                KeyCode::Tab | KeyCode::Enter => {
                    return Ok(if self.buf.value.len() >= self.min {
                        Step::Leave
                    } else {
                        Step::Notice
                    });
                }
                _ => Step::Notice,
            }
        };
        if step == Step::Handled {
            self.draw_field(screen)?;
        }
        Ok(step)
    }

    fn output(&self) -> String {
        self.text()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{kernel::Outcome, testing::Harness};

    fn entry(h: &mut Harness, opts: Value) -> Result<Entry> {
        let opts = match opts {
            Value::Object(m) => m,
            _ => Options::new(),
        };
        Entry::new(&mut h.screen, EntryConfig::from_options(&opts)?)
    }

    fn typed(s: &str) -> Vec<Key> {
        s.chars().map(Key::from).collect()
    }

    #[test]
    fn textbuf_window() {
        let mut b = TextBuf::new(4);
        b.set("abcdef", 100);
        assert_eq!(b.cursor, 6);
        assert_eq!(b.window.off, 3);
        assert_eq!(b.visible(), &['d', 'e', 'f']);
        b.goto(0);
        assert_eq!(b.window.off, 0);
        assert!(!b.left());
        assert!(b.right());
        assert!(b.transpose());
        assert_eq!(b.value.iter().collect::<String>(), "acbdef");
        assert!(b.backspace());
        assert_eq!(b.value.iter().collect::<String>(), "cbdef");
        assert_eq!(b.cursor, 0);
        assert!(!b.backspace());
        assert!(b.delete());
        assert_eq!(b.value.iter().collect::<String>(), "bdef");
    }

    #[test]
    fn typing_and_confirming() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"label": "Name: ", "field_width": 8, "x": 0, "y": 0}))?;
        let mut keys = typed("hello");
        keys.push(keys::RETURN);
        assert_eq!(e.activate(&mut h.screen, Some(&keys))?, Outcome::Confirmed("hello".into()));
        assert!(h.canvas().row_text(1).starts_with("│Name: hello...│"));
        Ok(())
    }

    #[test]
    fn filtering_and_limits() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"display": "UCHAR", "max": 3, "field_width": 5}))?;
        let out = e.activate(&mut h.screen, Some(&typed("a1bcd")))?;
        assert_eq!(out, Outcome::Exhausted);
        assert_eq!(e.text(), "ABC");
        // The digit and the character past the limit.
        assert_eq!(h.canvas().beeps(), 2);
        Ok(())
    }

    #[test]
    fn minimum_length() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"min": 2, "field_width": 5}))?;
        let mut keys = typed("a");
        keys.push(Key::from(KeyCode::Tab));
        assert_eq!(e.activate(&mut h.screen, Some(&keys))?, Outcome::Exhausted);
        assert_eq!(h.canvas().beeps(), 1);
        let keys = [Key::from('b'), Key::from(KeyCode::Tab)];
        assert_eq!(e.activate(&mut h.screen, Some(&keys))?, Outcome::Confirmed("ab".into()));
        Ok(())
    }

    #[test]
    fn editing_keys() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"value": "abcd", "field_width": 10}))?;
        let keys = [
            Key::from(KeyCode::Home),
            keys::TRANSPOSE,
            Key::from(KeyCode::Delete),
            keys::END_OF_LINE,
            Key::from(KeyCode::Backspace),
            Key::from(KeyCode::Up),
        ];
        e.activate(&mut h.screen, Some(&keys))?;
        assert_eq!(e.text(), "ac");
        assert_eq!(h.canvas().beeps(), 1);
        Ok(())
    }

    #[test]
    fn cut_and_paste_share_the_buffer() -> Result<()> {
        let mut h = Harness::new(30, 10);
        let mut a = entry(&mut h, json!({"value": "shared", "field_width": 10, "y": 0}))?;
        let mut b = entry(&mut h, json!({"field_width": 10, "y": 4}))?;
        a.activate(&mut h.screen, Some(&[keys::CUT]))?;
        assert!(a.is_empty());
        assert_eq!(h.screen.paste_buffer().get(), "shared");
        b.activate(&mut h.screen, Some(&[keys::PASTE]))?;
        assert_eq!(b.text(), "shared");
        Ok(())
    }

    #[test]
    fn empty_copy_and_paste_are_notices() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"field_width": 5}))?;
        e.activate(&mut h.screen, Some(&[keys::COPY, keys::PASTE, keys::CUT]))?;
        assert_eq!(h.canvas().beeps(), 3);
        Ok(())
    }

    #[test]
    fn masked_and_view_only() -> Result<()> {
        let mut h = Harness::new(30, 10);
        let mut e = entry(&mut h, json!({"display": "HMIXED", "field_width": 6, "y": 0, "box": false}))?;
        e.activate(&mut h.screen, Some(&typed("pw")))?;
        assert!(h.canvas().row_text(0).contains("**...."));
        assert_eq!(e.text(), "pw");

        let mut v = entry(&mut h, json!({"display": "VIEWONLY", "value": "ro", "y": 4}))?;
        let keys = [Key::from('x'), Key::from(KeyCode::Backspace)];
        v.activate(&mut h.screen, Some(&keys))?;
        assert_eq!(v.text(), "ro");
        assert_eq!(h.canvas().beeps(), 2);
        Ok(())
    }

    #[test]
    fn scrolling_window() -> Result<()> {
        let mut h = Harness::new(30, 6);
        let mut e = entry(&mut h, json!({"field_width": 4, "box": false, "x": 0, "y": 0}))?;
        e.activate(&mut h.screen, Some(&typed("abcdef")))?;
        assert_eq!(e.scroll_offset(), 3);
        assert!(h.canvas().row_text(0).starts_with("def."));
        e.activate(&mut h.screen, Some(&[Key::from(KeyCode::Home)]))?;
        assert!(h.canvas().row_text(0).starts_with("abcd"));
        Ok(())
    }

    #[test]
    fn no_room() {
        let mut h = Harness::new(4, 6);
        let r = entry(&mut h, json!({"label": "A long label: "}));
        assert!(matches!(r, Err(Error::Construct(_))));
        assert_eq!(h.screen.widgets().count(), 0);
    }
}
