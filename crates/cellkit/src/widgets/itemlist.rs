//! A scrolling list of markup items.
use serde_json::Value;

use crate::{
    config::{self, Options, Schema},
    draw,
    error::{Error, Result},
    event::{Key, KeyCode},
    geom::{Expanse, GeometrySpec, LineSegment, Position, resolve_extent},
    kernel::{Chrome, Kernel, Signal, Step, Widget, construct},
    markup::{self, AttributedText, Cell, justify},
    screen::Screen,
    style::{AttrSet, Attributes},
};

/// Signals an item list emits.
const SIGNALS: &[Signal] = &[
    Signal::BeforeInput,
    Signal::AfterInput,
    Signal::BeforeLeaving,
    Signal::AfterLeaving,
    Signal::BeforePressing,
    Signal::Pressed,
];

/// Item list options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemListConfig {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Requested width.
    pub width: i32,
    /// Requested height.
    pub height: i32,
    /// Title lines, as markup.
    pub title: Vec<String>,
    /// The items, as markup.
    pub items: Vec<String>,
    /// Prefix each item with its number.
    pub numbers: bool,
    /// Attributes of the highlighted item.
    pub highlight: AttrSet,
    /// Draw a border.
    pub boxed: bool,
    /// Draw a drop shadow.
    pub shadow: bool,
}

impl ItemListConfig {
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
            .field("width", 0, |c, v| {
                c.width = config::as_i32(v)?;
                Ok(())
            })
            .field("height", 0, |c, v| {
                c.height = config::as_i32(v)?;
                Ok(())
            })
            .field("title", Value::Null, |c, v| {
                c.title = config::as_lines(v)?;
                Ok(())
            })
            .field("items", Value::Null, |c, v| {
                c.items = config::as_lines(v)?;
                Ok(())
            })
            .field("numbers", false, |c, v| {
                c.numbers = config::as_bool(v)?;
                Ok(())
            })
            .field("highlight", "R", |c, v| {
                let codes = config::as_str(v)?;
                c.highlight = AttrSet::empty();
                for ch in codes.chars() {
                    c.highlight |= AttrSet::from_code(ch)
                        .ok_or_else(|| Error::Config(format!("unknown attribute code: {ch}")))?;
                }
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

/// A vertically scrolling list with a current item.
pub struct ItemList {
    /// Kernel state.
    kernel: Kernel<ItemList>,
    /// Item markup, as given.
    items: Vec<String>,
    /// Compiled items, with numbers when enabled.
    lines: Vec<AttributedText>,
    /// Number items?
    numbers: bool,
    /// The current item.
    current: usize,
    /// The visible rows of the list.
    view: LineSegment,
    /// Highlight attributes.
    highlight: AttrSet,
}

impl ItemList {
    /// Build an item list on the screen. An empty item list fails.
    pub fn new(screen: &mut Screen, conf: ItemListConfig) -> Result<Self> {
        construct(screen, "itemlist", |screen, id| {
            if conf.items.is_empty() {
                return Err(Error::Construct("itemlist: no items".into()));
            }
            let parent = screen.size();
            let border = u32::from(conf.boxed);
            let chrome_h = 2 * border + conf.title.len() as u32;
            let size = Expanse::new(
                resolve_extent(parent.w, conf.width, 2 * border + 1),
                resolve_extent(parent.h, conf.height, chrome_h + 1),
            );
            if size.h <= chrome_h || size.w <= 2 * border {
                return Err(Error::Construct(format!(
                    "itemlist: no room for items in {size:?}"
                )));
            }
            let spec = GeometrySpec::new(conf.x, conf.y, size.w as i32, size.h as i32);
            let chrome = Chrome {
                boxed: conf.boxed,
                shadow: conf.shadow,
                title: conf.title.clone(),
            };
            let kernel = Kernel::new(screen, id, "itemlist", SIGNALS, spec, size, &chrome)?;
            let mut list = Self {
                kernel,
                items: vec![],
                lines: vec![],
                numbers: conf.numbers,
                current: 0,
                view: LineSegment::new(0, size.h - chrome_h),
                highlight: conf.highlight,
            };
            list.set_items(screen, &conf.items)?;
            Ok(list)
        })
    }

    /// Replace the items and select the first one.
    pub fn set_items<S: AsRef<str>>(&mut self, screen: &Screen, items: &[S]) -> Result<()> {
        if items.is_empty() {
            return Err(Error::Invalid("itemlist: no items".into()));
        }
        self.items = items.iter().map(|s| s.as_ref().to_string()).collect();
        let width = self.items.len().to_string().len();
        self.lines = self
            .items
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if self.numbers {
                    screen.compile(&format!("{:>width$}. {s}", i + 1))
                } else {
                    screen.compile(s)
                }
            })
            .collect();
        self.current = 0;
        self.view.off = 0;
        Ok(())
    }

    /// The items, as given.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the list empty? Never true for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the current item.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The current item, as given.
    pub fn current_item(&self) -> &str {
        &self.items[self.current]
    }

    /// The current item's text without markup.
    pub fn current_text(&self) -> String {
        markup::compile(&self.items[self.current]).plain_text()
    }

    /// Select an item, clamping to the list and scrolling it into view.
    pub fn set_current(&mut self, index: usize) {
        self.current = index.min(self.items.len() - 1);
        self.view = self.view.reveal(self.current as u32, self.items.len() as u32);
    }

    /// The first visible item.
    pub fn top(&self) -> usize {
        self.view.off as usize
    }

    /// Move the selection by a signed amount. Returns false, leaving the
    /// selection alone, when it is already at the end being moved toward.
    fn step(&mut self, delta: i64) -> bool {
        let last = self.items.len() as i64 - 1;
        let cur = self.current as i64;
        if (delta < 0 && cur == 0) || (delta > 0 && cur == last) {
            return false;
        }
        self.set_current((cur + delta).clamp(0, last) as usize);
        true
    }

    fn page(&self) -> i64 {
        i64::from(self.view.len.max(1))
    }
}

impl Widget for ItemList {
    type Output = usize;

    fn kernel(&self) -> &Kernel<Self> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Self> {
        &mut self.kernel
    }

    fn draw(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.draw_chrome(screen)?;
        let o = self.kernel.content_origin();
        let width = self.kernel.inner_width();
        let window = self.kernel.window();
        for row in 0..self.view.len {
            let i = (self.view.off + row) as usize;
            let y = o.y + row;
            let Some(line) = self.lines.get(i) else {
                draw::fill(screen, window, y, o.x, width, Cell::blank())?;
                continue;
            };
            let (attrs, pad) = if i == self.current && self.kernel.focused() {
                (
                    self.highlight,
                    Cell::new(' ', Attributes::with_flags(self.highlight)),
                )
            } else {
                (AttrSet::empty(), Cell::blank())
            };
            let off = justify(width as usize, line.width(), line.alignment());
            let mut cells = vec![pad; off];
            cells.extend(line.cells().iter().map(|c| Cell::new(c.ch, c.attrs.with(attrs))));
            draw::write_padded(screen, window, y, o.x, width, &cells, pad)?;
        }
        Ok(())
    }

    fn handle_input(&mut self, screen: &mut Screen, key: Key) -> Result<Step> {
        let moved = match key.key {
            KeyCode::Up => self.step(-1),
            KeyCode::Down => self.step(1),
            KeyCode::PageUp => self.step(-self.page()),
            KeyCode::PageDown => self.step(self.page()),
            KeyCode::Home => self.step(-(self.items.len() as i64)),
            KeyCode::End => self.step(self.items.len() as i64),
            KeyCode::Enter => {
                if !self.emit(screen, Signal::BeforePressing, key)? {
                    return Ok(Step::Handled);
                }
                self.emit(screen, Signal::Pressed, key)?;
                return Ok(Step::Leave);
            }
            _ => false,
        };
        if !moved {
            return Ok(Step::Notice);
        }
        self.draw(screen)?;
        Ok(Step::Handled)
    }

    fn output(&self) -> usize {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{kernel::Outcome, kernel::observer, testing::Harness};

    fn list(h: &mut Harness, opts: Value) -> Result<ItemList> {
        let opts = match opts {
            Value::Object(m) => m,
            _ => Options::new(),
        };
        ItemList::new(&mut h.screen, ItemListConfig::from_options(&opts)?)
    }

    fn ten() -> Vec<String> {
        (1..=10).map(|i| format!("item {i}")).collect()
    }

    #[test]
    fn navigation() -> Result<()> {
        let mut h = Harness::new(20, 10);
        let mut l = list(&mut h, json!({"items": ten(), "width": 12, "height": 6}))?;
        let down = Key::from(KeyCode::Down);
        l.activate(&mut h.screen, Some(&[down, down, down, down]))?;
        assert_eq!(l.current(), 4);
        assert_eq!(l.top(), 1);

        l.activate(&mut h.screen, Some(&[Key::from(KeyCode::PageDown)]))?;
        assert_eq!(l.current(), 8);
        l.activate(&mut h.screen, Some(&[Key::from(KeyCode::End), down]))?;
        assert_eq!(l.current(), 9);
        assert_eq!(l.top(), 6);
        assert_eq!(h.canvas().beeps(), 1);

        let out = l.activate(&mut h.screen, Some(&[Key::from(KeyCode::Home), Key::from(KeyCode::Enter)]))?;
        assert_eq!(out, Outcome::Confirmed(0));
        assert_eq!(l.top(), 0);
        Ok(())
    }

    #[test]
    fn highlight_follows_focus() -> Result<()> {
        let mut h = Harness::new(20, 10);
        let mut l = list(&mut h, json!({"items": ["<C>one", "two"], "x": 0, "y": 0, "width": 10, "height": 4}))?;
        l.draw(&mut h.screen)?;
        let reversed = |h: &Harness| {
            h.canvas()
                .cell(3, 1)
                .is_some_and(|c| c.attrs.flags.contains(AttrSet::REVERSE))
        };
        assert!(!reversed(&h));
        l.focus(&mut h.screen)?;
        assert!(reversed(&h));
        assert_eq!(h.canvas().row_text(1), "│  one   │          ");
        Ok(())
    }

    #[test]
    fn pressing_can_be_vetoed() -> Result<()> {
        let mut h = Harness::new(20, 10);
        let mut l = list(&mut h, json!({"items": ["a", "b"], "height": 4}))?;
        let pressed = Rc::new(RefCell::new(vec![]));
        let allow = Rc::new(RefCell::new(false));
        {
            let allow = allow.clone();
            l.connect(
                Signal::BeforePressing,
                observer(move |_: &mut ItemList, _: &mut Screen, _| Ok(*allow.borrow())),
            )?;
            let pressed = pressed.clone();
            l.connect(
                Signal::Pressed,
                observer(move |l: &mut ItemList, _: &mut Screen, _| {
                    pressed.borrow_mut().push(l.current());
                    Ok(true)
                }),
            )?;
        }
        let enter = Key::from(KeyCode::Enter);
        assert_eq!(l.activate(&mut h.screen, Some(&[enter]))?, Outcome::Exhausted);
        assert!(pressed.borrow().is_empty());
        *allow.borrow_mut() = true;
        let down = Key::from(KeyCode::Down);
        assert_eq!(l.activate(&mut h.screen, Some(&[down, enter]))?, Outcome::Confirmed(1));
        assert_eq!(*pressed.borrow(), vec![1]);
        Ok(())
    }

    #[test]
    fn numbered_items() -> Result<()> {
        let mut h = Harness::new(20, 14);
        let mut l = list(
            &mut h,
            json!({"items": ten(), "numbers": true, "box": false, "x": 0, "y": 0, "height": 10}),
        )?;
        l.draw(&mut h.screen)?;
        assert!(h.canvas().row_text(0).starts_with(" 1. item 1"));
        assert!(h.canvas().row_text(9).starts_with("10. item 10"));
        assert_eq!(l.current_text(), "item 1");
        Ok(())
    }

    #[test]
    fn construction_failures() {
        let mut h = Harness::new(20, 10);
        assert!(matches!(list(&mut h, json!({"items": []})), Err(Error::Construct(_))));
        assert!(matches!(
            list(&mut h, json!({"items": ["a"], "height": 2})),
            Err(Error::Construct(_))
        ));
        assert!(matches!(
            list(&mut h, json!({"highlight": "Q"})),
            Err(Error::Config(_))
        ));
        assert_eq!(h.screen.widgets().count(), 0);
    }
}
