use super::{Point, Rect};

/// A width and height with no location. Screen sizes and the parent extents
/// handed to the resolver are expressed this way.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Does this expanse cover no cells?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The rectangle this expanse covers when placed at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        r.expanse()
    }
}
