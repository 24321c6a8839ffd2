//! An entry field over a list, where typing narrows the selection.
use serde_json::Value;

use super::{Entry, EntryConfig, ItemList, ItemListConfig};
use crate::{
    config::{self, Options, Schema},
    error::{Error, Result},
    event::{Key, KeyCode},
    filter::DisplayType,
    geom::{Expanse, GeometrySpec, Position, resolve_extent},
    kernel::{COMMON_SIGNALS, Chrome, Kernel, Step, Widget, construct, draw_focused_as},
    screen::Screen,
    style::AttrSet,
};

/// AlphaList options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlphaListConfig {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Requested width.
    pub width: i32,
    /// Requested height.
    pub height: i32,
    /// Title lines of the entry, as markup.
    pub title: Vec<String>,
    /// Entry label, as markup.
    pub label: String,
    /// The items, as markup.
    pub items: Vec<String>,
    /// Entry filler character.
    pub filler: char,
    /// Attributes of the highlighted item, as attribute codes.
    pub highlight: String,
    /// Draw borders.
    pub boxed: bool,
    /// Draw a drop shadow.
    pub shadow: bool,
}

impl AlphaListConfig {
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
            .field("label", "", |c, v| {
                c.label = config::as_str(v)?;
                Ok(())
            })
            .field("items", Value::Null, |c, v| {
                c.items = config::as_lines(v)?;
                Ok(())
            })
            .field("filler", ".", |c, v| {
                c.filler = config::as_char(v)?;
                Ok(())
            })
            .field("highlight", "R", |c, v| {
                c.highlight = config::as_str(v)?;
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

/// An [`Entry`] stacked on an [`ItemList`]. Typing in the entry moves the
/// list to the first item starting with the typed text; list navigation keys
/// move the list and copy the selection into the entry. Focus lives in the
/// entry, and the list is highlighted whenever the entry is focused.
pub struct AlphaList {
    /// Kernel state; owns the shadow.
    kernel: Kernel<AlphaList>,
    /// The entry field.
    entry: Entry,
    /// The list.
    list: ItemList,
}

impl AlphaList {
    /// Build an alpha list on the screen.
    pub fn new(screen: &mut Screen, conf: AlphaListConfig) -> Result<Self> {
        construct(screen, "alphalist", |screen, id| {
            if conf.items.is_empty() {
                return Err(Error::Construct("alphalist: no items".into()));
            }
            let parent = screen.size();
            let border = u32::from(conf.boxed);
            let entry_h = 2 * border + 1 + conf.title.len() as u32;
            let size = Expanse::new(
                resolve_extent(parent.w, conf.width, 2 * border + 1),
                resolve_extent(parent.h, conf.height, entry_h + 1),
            );
            let list_h = (size.h + border).saturating_sub(entry_h);
            if list_h <= 2 * border {
                return Err(Error::Construct(format!(
                    "alphalist: no room for a list in {size:?}"
                )));
            }
            let label_w = screen.compile(&conf.label).width() as u32;
            let field_w = size.w.saturating_sub(2 * border + label_w);
            if field_w == 0 {
                return Err(Error::Construct(format!(
                    "alphalist: no room for a field in {size:?}"
                )));
            }
            let highlight = conf
                .highlight
                .chars()
                .map(|c| {
                    AttrSet::from_code(c)
                        .ok_or_else(|| Error::Construct(format!("unknown attribute code: {c}")))
                })
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .fold(AttrSet::empty(), |a, b| a | b);

            let spec = GeometrySpec::new(conf.x, conf.y, size.w as i32, size.h as i32);
            let chrome = Chrome {
                boxed: false,
                shadow: conf.shadow,
                title: vec![],
            };
            let kernel = Kernel::new(screen, id, "alphalist", COMMON_SIGNALS, spec, size, &chrome)?;
            let tl = kernel.rect().tl;

            let entry = Entry::new(
                screen,
                EntryConfig {
                    x: Position::At(tl.x as i32),
                    y: Position::At(tl.y as i32),
                    title: conf.title.clone(),
                    label: conf.label.clone(),
                    field_width: field_w as i32,
                    filler: conf.filler,
                    hidden: '*',
                    display: DisplayType::Mixed,
                    value: String::new(),
                    min: 0,
                    max: 256,
                    boxed: conf.boxed,
                    shadow: false,
                },
            )?;
            let list = ItemList::new(
                screen,
                ItemListConfig {
                    x: Position::At(tl.x as i32),
                    y: Position::At((tl.y + entry_h - border) as i32),
                    width: size.w as i32,
                    height: list_h as i32,
                    title: vec![],
                    items: conf.items.clone(),
                    numbers: false,
                    highlight,
                    boxed: conf.boxed,
                    shadow: false,
                },
            );
            let list = match list {
                Ok(l) => l,
                Err(e) => {
                    entry.destroy(screen)?;
                    return Err(e);
                }
            };
            Ok(Self {
                kernel,
                entry,
                list,
            })
        })
    }

    /// The entry field.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// The entry field, mutably.
    pub fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }

    /// The list.
    pub fn list(&self) -> &ItemList {
        &self.list
    }

    /// The list, mutably.
    pub fn list_mut(&mut self) -> &mut ItemList {
        &mut self.list
    }

    /// The selected item's text.
    pub fn current_item(&self) -> String {
        self.list.current_text()
    }

    /// Select an item and copy it into the entry.
    pub fn set_current(&mut self, index: usize) {
        self.list.set_current(index);
        self.entry.set_text(&self.list.current_text());
    }

    /// Replace the items, clear the entry, and redraw.
    pub fn set_items<S: AsRef<str>>(&mut self, screen: &mut Screen, items: &[S]) -> Result<()> {
        self.list.set_items(screen, items)?;
        self.entry.clean();
        self.erase(screen)?;
        self.draw(screen)
    }

    /// Draw the list highlighted as if it shared the entry's focus.
    fn draw_list(&mut self, screen: &mut Screen) -> Result<()> {
        let focused = self.entry.kernel().focused();
        draw_focused_as(&mut self.list, screen, focused)
    }

    /// Move the list to the first item starting with `prefix`.
    fn seek(&mut self, prefix: &str) -> bool {
        let found = self
            .list
            .items()
            .iter()
            .position(|s| crate::markup::compile(s).plain_text().starts_with(prefix));
        match found {
            Some(i) => {
                self.list.set_current(i);
                true
            }
            None => false,
        }
    }
}

impl Widget for AlphaList {
    type Output = String;

    fn kernel(&self) -> &Kernel<Self> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Self> {
        &mut self.kernel
    }

    fn draw(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.draw_chrome(screen)?;
        self.entry.draw(screen)?;
        self.draw_list(screen)
    }

    fn handle_input(&mut self, screen: &mut Screen, key: Key) -> Result<Step> {
        let k = key.normalize();
        match k.key {
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                self.list.inject(screen, k)?;
                self.entry.set_text(&self.list.current_text());
                self.entry.draw_field(screen)?;
                self.draw_list(screen)?;
                Ok(Step::Handled)
            }
            KeyCode::Tab => {
                self.entry.set_text(&self.list.current_text());
                self.entry.draw_field(screen)?;
                Ok(Step::Handled)
            }
            KeyCode::Enter => Ok(Step::Leave),
            _ => {
                let before = self.entry.text();
                self.entry.inject(screen, key)?;
                let after = self.entry.text();
                if after == before {
                    return Ok(Step::Handled);
                }
                if !self.seek(&after) {
                    self.entry.set_text(&before);
                    self.entry.draw_field(screen)?;
                    return Ok(Step::Notice);
                }
                self.draw_list(screen)?;
                self.entry.draw_field(screen)?;
                Ok(Step::Handled)
            }
        }
    }

    fn output(&self) -> String {
        self.list.current_text()
    }

    fn focus(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.set_focused(true);
        self.entry.kernel_mut().set_focused(true);
        self.draw(screen)
    }

    fn unfocus(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.set_focused(false);
        self.entry.kernel_mut().set_focused(false);
        self.draw(screen)
    }

    fn erase(&mut self, screen: &mut Screen) -> Result<()> {
        self.list.erase(screen)?;
        self.entry.erase(screen)?;
        screen.erase_widget(self.id())
    }

    fn destroy(mut self, screen: &mut Screen) -> Result<()> {
        self.erase(screen)?;
        let id = self.id();
        self.list.destroy(screen)?;
        self.entry.destroy(screen)?;
        screen.unregister(id)
    }

    fn move_to(&mut self, screen: &mut Screen, x: Position, y: Position, relative: bool) -> Result<()> {
        self.erase(screen)?;
        let before = self.kernel.rect().tl;
        self.kernel.relocate(screen, x, y, relative)?;
        let after = self.kernel.rect().tl;
        let dx = Position::At(after.x as i32 - before.x as i32);
        let dy = Position::At(after.y as i32 - before.y as i32);
        self.entry.kernel_mut().relocate(screen, dx, dy, true)?;
        self.list.kernel_mut().relocate(screen, dx, dy, true)?;
        self.draw(screen)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{event::keys, kernel::Outcome, testing::Harness};

    fn fruit(h: &mut Harness) -> Result<AlphaList> {
        let opts = json!({
            "items": ["apple", "banana", "blueberry", "cherry"],
            "label": "Fruit: ",
            "width": 20,
            "height": 9,
            "x": 2,
            "y": 1,
        });
        let Value::Object(opts) = opts else {
            return Err(Error::Invalid("options".into()));
        };
        AlphaList::new(&mut h.screen, AlphaListConfig::from_options(&opts)?)
    }

    #[test]
    fn layout() -> Result<()> {
        let mut h = Harness::new(30, 12);
        let mut a = fruit(&mut h)?;
        a.draw(&mut h.screen)?;
        assert_eq!(a.entry().kernel().rect().tl.y, 1);
        assert_eq!(a.list().kernel().rect().tl.y, 3);
        assert_eq!(a.list().kernel().rect().h, 7);
        assert!(h.canvas().row_text(2).contains("│Fruit: ...........│"));
        assert!(h.canvas().row_text(4).contains("│apple"));
        Ok(())
    }

    #[test]
    fn typing_narrows() -> Result<()> {
        let mut h = Harness::new(30, 12);
        let mut a = fruit(&mut h)?;
        let keys = [Key::from('b'), Key::from('l'), Key::from('x')];
        assert_eq!(a.activate(&mut h.screen, Some(&keys))?, Outcome::Exhausted);
        assert_eq!(a.list().current(), 2);
        assert_eq!(a.entry().text(), "bl");
        assert_eq!(h.canvas().beeps(), 1);

        let keys = [Key::from(KeyCode::Backspace), Key::from(KeyCode::Backspace), Key::from('c')];
        a.activate(&mut h.screen, Some(&keys))?;
        assert_eq!(a.current_item(), "cherry");

        let out = a.activate(&mut h.screen, Some(&[Key::from(KeyCode::Enter)]))?;
        assert_eq!(out, Outcome::Confirmed("cherry".to_string()));
        Ok(())
    }

    #[test]
    fn list_keys_and_completion() -> Result<()> {
        let mut h = Harness::new(30, 12);
        let mut a = fruit(&mut h)?;
        let down = Key::from(KeyCode::Down);
        a.activate(&mut h.screen, Some(&[down, down]))?;
        assert_eq!(a.entry().text(), "blueberry");
        assert_eq!(a.list().current(), 2);

        a.activate(&mut h.screen, Some(&[keys::ERASE, Key::from('c'), Key::from(KeyCode::Tab)]))?;
        assert_eq!(a.entry().text(), "cherry");
        Ok(())
    }

    #[test]
    fn focus_is_forwarded() -> Result<()> {
        let mut h = Harness::new(30, 12);
        let mut a = fruit(&mut h)?;
        a.focus(&mut h.screen)?;
        assert!(a.entry().kernel().focused());
        assert!(!a.list().kernel().focused());
        let highlighted = h
            .canvas()
            .cell(3, 4)
            .is_some_and(|c| c.attrs.flags.contains(AttrSet::REVERSE));
        assert!(highlighted);

        a.unfocus(&mut h.screen)?;
        assert!(!a.entry().kernel().focused());
        let highlighted = h
            .canvas()
            .cell(3, 4)
            .is_some_and(|c| c.attrs.flags.contains(AttrSet::REVERSE));
        assert!(!highlighted);
        Ok(())
    }

    #[test]
    fn moves_and_destroys_as_one() -> Result<()> {
        let mut h = Harness::new(30, 12);
        let mut a = fruit(&mut h)?;
        assert_eq!(h.screen.widgets().count(), 3);
        a.move_to(&mut h.screen, Position::At(3), Position::At(1), true)?;
        assert_eq!(a.entry().kernel().rect().tl.x, 5);
        assert_eq!(a.list().kernel().rect().tl.y, 4);
        a.destroy(&mut h.screen)?;
        assert_eq!(h.screen.widgets().count(), 0);
        assert!(h.canvas().regions.is_empty());
        Ok(())
    }

    #[test]
    fn no_room_for_the_list() {
        let mut h = Harness::new(30, 12);
        let opts = json!({"items": ["a"], "width": 20, "height": 3});
        let Value::Object(opts) = opts else { return };
        let r = AlphaListConfig::from_options(&opts).and_then(|c| AlphaList::new(&mut h.screen, c));
        assert!(matches!(r, Err(Error::Construct(_))));
        assert_eq!(h.screen.widgets().count(), 0);
    }
}
