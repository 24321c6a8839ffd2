//! The screen registry: owns the display surface and input source, tracks
//! live widgets and the regions they hold, and hosts modal popups.
use std::{cell::RefCell, rc::Rc};

use slotmap::SlotMap;
use tracing::debug;

use super::{
    draw,
    error::{Error, Result},
    event::Key,
    markup::{self, AttributedText, Cell},
    surface::{InputSource, RegionId, Surface},
};
use crate::geom::{Expanse, GeometrySpec, Point, Position, Rect};

slotmap::new_key_type! {
    /// Identifier of a widget registered with a [`Screen`].
    pub struct WidgetId;
}

/// The text shared by every editing widget for cut, copy and paste. Clones
/// share the same buffer; the last write wins.
#[derive(Debug, Clone, Default)]
pub struct PasteBuffer {
    /// Buffer contents.
    text: Rc<RefCell<String>>,
}

impl PasteBuffer {
    /// The current contents.
    pub fn get(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the contents.
    pub fn set(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    /// True if nothing has been copied.
    pub fn is_empty(&self) -> bool {
        self.text.borrow().is_empty()
    }
}

/// A registered widget.
#[derive(Debug)]
struct Registration {
    /// Widget kind, for diagnostics.
    kind: &'static str,
    /// Regions owned by the widget, in allocation order.
    regions: Vec<RegionId>,
}

/// The screen registry.
pub struct Screen {
    /// The display.
    surface: Box<dyn Surface>,
    /// Where keys come from.
    input: Box<dyn InputSource>,
    /// Live widgets.
    widgets: SlotMap<WidgetId, Registration>,
    /// Shared paste buffer.
    paste: PasteBuffer,
}

impl Screen {
    /// Build a screen over a surface and an input source.
    pub fn new(surface: impl Surface + 'static, input: impl InputSource + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            input: Box::new(input),
            widgets: SlotMap::with_key(),
            paste: PasteBuffer::default(),
        }
    }

    /// The size of the display.
    pub fn size(&self) -> Expanse {
        self.surface.size()
    }

    /// Does the display support color pairs?
    pub fn has_colors(&self) -> bool {
        self.surface.has_colors()
    }

    /// Compile markup for this display, degrading colors to bold when the
    /// display has none.
    pub fn compile(&self, raw: &str) -> AttributedText {
        markup::compile_for(raw, self.has_colors())
    }

    /// The shared paste buffer.
    pub fn paste_buffer(&self) -> PasteBuffer {
        self.paste.clone()
    }

    /// Register a widget under construction.
    pub fn register(&mut self, kind: &'static str) -> WidgetId {
        let id = self.widgets.insert(Registration {
            kind,
            regions: vec![],
        });
        debug!(?id, kind, "widget registered");
        id
    }

    /// Unregister a widget, releasing every region it owns.
    pub fn unregister(&mut self, id: WidgetId) -> Result<()> {
        let reg = self
            .widgets
            .remove(id)
            .ok_or_else(|| Error::Invalid(format!("unknown widget: {id:?}")))?;
        let mut released: Vec<RegionId> = vec![];
        for r in reg.regions.iter().rev() {
            if !released.contains(r) {
                released.extend(self.surface.destroy_region(*r)?);
            }
        }
        debug!(?id, kind = reg.kind, regions = released.len(), "widget unregistered");
        Ok(())
    }

    /// Is the widget registered?
    pub fn is_registered(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Registered widgets and their kinds.
    pub fn widgets(&self) -> impl Iterator<Item = (WidgetId, &'static str)> + '_ {
        self.widgets.iter().map(|(id, r)| (id, r.kind))
    }

    /// Regions owned by a widget.
    pub fn regions(&self, id: WidgetId) -> &[RegionId] {
        self.widgets
            .get(id)
            .map(|r| r.regions.as_slice())
            .unwrap_or_default()
    }

    /// Allocate a region on behalf of a widget.
    pub fn create_region(
        &mut self,
        owner: WidgetId,
        parent: Option<RegionId>,
        rect: Rect,
    ) -> Result<RegionId> {
        if !self.widgets.contains_key(owner) {
            return Err(Error::Invalid(format!("unknown widget: {owner:?}")));
        }
        let region = self.surface.create_region(parent, rect)?;
        if let Some(reg) = self.widgets.get_mut(owner) {
            reg.regions.push(region);
        }
        Ok(region)
    }

    /// Release one region (and its nested regions) owned by a widget.
    pub fn destroy_region(&mut self, owner: WidgetId, region: RegionId) -> Result<()> {
        let released = self.surface.destroy_region(region)?;
        if let Some(reg) = self.widgets.get_mut(owner) {
            reg.regions.retain(|r| !released.contains(r));
        }
        Ok(())
    }

    /// Move a region to a new parent-relative origin.
    pub fn move_region(&mut self, region: RegionId, origin: Point) -> Result<()> {
        self.surface.move_region(region, origin)
    }

    /// The size of a region.
    pub fn region_size(&self, region: RegionId) -> Result<Expanse> {
        self.surface.region_size(region)
    }

    /// Write cells into a region.
    pub fn blit(&mut self, region: RegionId, row: u32, col: u32, cells: &[Cell]) -> Result<()> {
        self.surface.blit(region, row, col, cells)
    }

    /// Blank a region.
    pub fn erase_region(&mut self, region: RegionId) -> Result<()> {
        self.surface.erase(region)
    }

    /// Place the hardware cursor.
    pub fn move_cursor(&mut self, region: RegionId, row: u32, col: u32) -> Result<()> {
        self.surface.move_cursor(region, row, col)
    }

    /// Blank every region a widget owns.
    pub fn erase_widget(&mut self, id: WidgetId) -> Result<()> {
        let regions = self.regions(id).to_vec();
        for r in regions {
            self.surface.erase(r)?;
        }
        Ok(())
    }

    /// Blank every registered widget.
    pub fn erase_all(&mut self) -> Result<()> {
        let ids: Vec<WidgetId> = self.widgets.keys().collect();
        for id in ids {
            self.erase_widget(id)?;
        }
        Ok(())
    }

    /// Push pending output to the display.
    pub fn refresh_all(&mut self) -> Result<()> {
        self.surface.refresh()
    }

    /// Emit a notice for a rejected action.
    pub fn notice(&mut self) {
        debug!("notice");
        self.surface.beep();
    }

    /// Block for the next key.
    pub fn read_input(&mut self) -> Result<Key> {
        self.input.read()
    }

    /// Show a boxed, centered dialog of markup lines and wait for a key. The
    /// dialog is removed before returning.
    pub fn popup(&mut self, lines: &[&str]) -> Result<Key> {
        let texts: Vec<AttributedText> = lines.iter().map(|l| self.compile(l)).collect();
        let widest = texts.iter().map(|t| t.width()).max().unwrap_or(0) as u32;
        let size = Expanse::new(widest + 2, texts.len() as u32 + 2);
        let spec = GeometrySpec::new(Position::Center, Position::Center, 0, 0);
        let rect = spec.place(self.size(), size);

        let id = self.register("popup");
        let shown = self.show_popup(id, rect, &texts);
        let key = shown.and_then(|_| self.read_input());
        self.unregister(id)?;
        self.refresh_all()?;
        key
    }

    /// Draw a popup's region and contents.
    fn show_popup(&mut self, id: WidgetId, rect: Rect, texts: &[AttributedText]) -> Result<()> {
        let region = self.create_region(id, None, rect)?;
        self.erase_region(region)?;
        draw::draw_box(self, region, Default::default())?;
        let inner = rect.w.saturating_sub(2);
        for (i, t) in texts.iter().enumerate() {
            draw::write_text(self, region, i as u32 + 1, 1, inner, t)?;
        }
        self.refresh_all()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        event::keys,
        testing::{Canvas, ScriptedInput, TestSurface},
    };

    fn screen(keys: Vec<Key>) -> (Arc<Mutex<Canvas>>, Screen) {
        let (canvas, surface) = TestSurface::create(Expanse::new(20, 8));
        let (_, input) = ScriptedInput::create(keys);
        (canvas, Screen::new(surface, input))
    }

    #[test]
    fn registry() -> Result<()> {
        let (canvas, mut s) = screen(vec![]);
        let a = s.register("a");
        let b = s.register("b");
        let outer = s.create_region(a, None, Rect::new(0, 0, 5, 5))?;
        s.create_region(a, Some(outer), Rect::new(1, 1, 2, 2))?;
        s.create_region(b, None, Rect::new(6, 0, 5, 5))?;
        assert_eq!(s.widgets().count(), 2);
        assert_eq!(s.regions(a).len(), 2);

        s.unregister(a)?;
        assert!(!s.is_registered(a));
        assert_eq!(canvas.lock().unwrap().regions.len(), 1);
        assert!(s.unregister(a).is_err());
        assert!(s.create_region(a, None, Rect::new(0, 0, 1, 1)).is_err());
        Ok(())
    }

    #[test]
    fn paste_buffer_is_shared() {
        let (_, s) = screen(vec![]);
        let one = s.paste_buffer();
        let two = s.paste_buffer();
        assert!(one.is_empty());
        one.set("hello");
        assert_eq!(two.get(), "hello");
        two.set("bye");
        assert_eq!(s.paste_buffer().get(), "bye");
    }

    #[test]
    fn popup() -> Result<()> {
        let (canvas, mut s) = screen(vec![keys::RETURN]);
        let key = s.popup(&["<C>hello", "world!"])?;
        assert_eq!(key, keys::RETURN);
        let c = canvas.lock().unwrap();
        assert!(c.contains("│hello │"));
        assert!(c.contains("│world!│"));
        assert!(c.regions.is_empty());
        Ok(())
    }

    #[test]
    fn popup_without_input_cleans_up() {
        let (canvas, mut s) = screen(vec![]);
        assert!(s.popup(&["x"]).is_err());
        assert!(canvas.lock().unwrap().regions.is_empty());
        assert_eq!(s.widgets().count(), 0);
    }
}
