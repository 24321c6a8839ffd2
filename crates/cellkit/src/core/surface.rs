//! The display surface: the character-cell primitive widgets draw through.
//!
//! A surface hands out rectangular regions, optionally nested inside a parent
//! region, and accepts runs of attributed cells blitted at region-relative
//! coordinates. Backends share region bookkeeping through [`RegionTable`].
use slotmap::SlotMap;
use tracing::debug;

use super::{
    error::{Error, Result},
    event::Key,
    markup::Cell,
};
use crate::geom::{Expanse, Point, Rect};

slotmap::new_key_type! {
    /// Identifier of a region allocated on a display surface.
    pub struct RegionId;
}

/// A character-cell display.
pub trait Surface {
    /// The full size of the display.
    fn size(&self) -> Expanse;

    /// Does the display support color pairs?
    fn has_colors(&self) -> bool;

    /// Allocate a region. `rect` is relative to the parent region, or to the
    /// screen for top-level regions, and must fit inside it.
    fn create_region(&mut self, parent: Option<RegionId>, rect: Rect) -> Result<RegionId>;

    /// Release a region and every region nested inside it, returning every
    /// released id.
    fn destroy_region(&mut self, id: RegionId) -> Result<Vec<RegionId>>;

    /// Move a region to a new origin relative to its parent.
    fn move_region(&mut self, id: RegionId, origin: Point) -> Result<()>;

    /// The size of a region.
    fn region_size(&self, id: RegionId) -> Result<Expanse>;

    /// Write a run of cells at a region-relative position. Cells falling past
    /// the right edge are clipped; a row outside the region writes nothing.
    fn blit(&mut self, id: RegionId, row: u32, col: u32, cells: &[Cell]) -> Result<()>;

    /// Blank a region.
    fn erase(&mut self, id: RegionId) -> Result<()>;

    /// Move the hardware cursor to a region-relative position.
    fn move_cursor(&mut self, id: RegionId, row: u32, col: u32) -> Result<()>;

    /// Push pending output to the display.
    fn refresh(&mut self) -> Result<()>;

    /// Emit an audible or visual notice.
    fn beep(&mut self);
}

/// A blocking source of key input.
pub trait InputSource {
    /// Block until the next key is available.
    fn read(&mut self) -> Result<Key>;
}

/// Bookkeeping for one allocated region.
#[derive(Debug, Clone)]
struct Region {
    /// Parent region, if nested.
    parent: Option<RegionId>,
    /// Bounds relative to the parent.
    rect: Rect,
    /// Regions nested inside this one.
    children: Vec<RegionId>,
}

/// Region allocation shared by surface backends.
#[derive(Debug)]
pub struct RegionTable {
    /// Size of the whole display.
    screen: Expanse,
    /// Live regions.
    regions: SlotMap<RegionId, Region>,
}

/// The visible part of a clipped blit, in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Absolute position of the first visible cell.
    pub at: Point,
    /// Number of visible cells.
    pub len: usize,
}

impl RegionTable {
    /// A table for a display of the given size.
    pub fn new(screen: Expanse) -> Self {
        Self {
            screen,
            regions: SlotMap::with_key(),
        }
    }

    /// The display size.
    pub fn screen(&self) -> Expanse {
        self.screen
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if no regions are allocated.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Is this region still allocated?
    pub fn contains(&self, id: RegionId) -> bool {
        self.regions.contains_key(id)
    }

    /// Look up a region.
    fn get(&self, id: RegionId) -> Result<&Region> {
        self.regions
            .get(id)
            .ok_or_else(|| Error::Surface(format!("no such region: {id:?}")))
    }

    /// The extent a region's rect must fit inside.
    fn parent_extent(&self, parent: Option<RegionId>) -> Result<Expanse> {
        match parent {
            Some(p) => Ok(self.get(p)?.rect.expanse()),
            None => Ok(self.screen),
        }
    }

    /// Allocate a region.
    pub fn create(&mut self, parent: Option<RegionId>, rect: Rect) -> Result<RegionId> {
        let bounds = self.parent_extent(parent)?.rect();
        bounds.ensure_encloses(&rect)?;
        let id = self.regions.insert(Region {
            parent,
            rect,
            children: vec![],
        });
        if let Some(p) = parent
            && let Some(pr) = self.regions.get_mut(p)
        {
            pr.children.push(id);
        }
        debug!(?id, ?parent, ?rect, "region created");
        Ok(id)
    }

    /// Release a region and its descendants. Returns every released id.
    pub fn destroy(&mut self, id: RegionId) -> Result<Vec<RegionId>> {
        let parent = self.get(id)?.parent;
        if let Some(p) = parent
            && let Some(pr) = self.regions.get_mut(p)
        {
            pr.children.retain(|c| *c != id);
        }
        let mut released = vec![];
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(r) = self.regions.remove(next) {
                stack.extend(r.children);
                released.push(next);
            }
        }
        debug!(?id, count = released.len(), "region destroyed");
        Ok(released)
    }

    /// Move a region within its parent.
    pub fn move_to(&mut self, id: RegionId, origin: Point) -> Result<()> {
        let r = self.get(id)?;
        let bounds = self.parent_extent(r.parent)?.rect();
        let moved = Rect {
            tl: origin,
            ..r.rect
        };
        bounds.ensure_encloses(&moved)?;
        if let Some(r) = self.regions.get_mut(id) {
            r.rect = moved;
        }
        Ok(())
    }

    /// The region's size.
    pub fn size(&self, id: RegionId) -> Result<Expanse> {
        Ok(self.get(id)?.rect.expanse())
    }

    /// The region's bounds in absolute screen coordinates.
    pub fn absolute(&self, id: RegionId) -> Result<Rect> {
        let r = self.get(id)?;
        let mut rect = r.rect;
        let mut parent = r.parent;
        while let Some(p) = parent {
            let pr = self.get(p)?;
            rect = rect.shift(pr.rect.tl);
            parent = pr.parent;
        }
        Ok(rect)
    }

    /// Clip a run of `len` cells written at a region-relative position.
    /// Returns `None` when nothing is visible.
    pub fn clip(&self, id: RegionId, row: u32, col: u32, len: usize) -> Result<Option<Span>> {
        let abs = self.absolute(id)?;
        if row >= abs.h || col >= abs.w || len == 0 {
            return Ok(None);
        }
        let room = (abs.w - col) as usize;
        Ok(Some(Span {
            at: Point {
                x: abs.tl.x + col,
                y: abs.tl.y + row,
            },
            len: len.min(room),
        }))
    }
}
