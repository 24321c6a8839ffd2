use super::{Expanse, Point};
use crate::{Error, Result};

/// A rectangle of cells, located by its top-left corner.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Does the rectangle cover no cells?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The last column inside the rectangle. Meaningless for empty rects.
    pub fn right(&self) -> u32 {
        (self.tl.x + self.w).saturating_sub(1)
    }

    /// The last row inside the rectangle. Meaningless for empty rects.
    pub fn bottom(&self) -> u32 {
        (self.tl.y + self.h).saturating_sub(1)
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        (self.tl.x..self.tl.x + self.w).contains(&p.x) && (self.tl.y..self.tl.y + self.h).contains(&p.y)
    }

    /// Does this rectangle completely enclose the other? Empty rectangles are
    /// never enclosed.
    pub fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty()
            && self.contains_point(other.tl)
            && self.contains_point(Point::new(other.right(), other.bottom()))
    }

    /// Fail unless this rectangle encloses `other`.
    pub fn ensure_encloses(&self, other: &Self) -> Result<()> {
        if other.is_empty() {
            return Err(Error::Geometry(format!("empty rect {other:?}")));
        }
        if !self.contains_rect(other) {
            return Err(Error::Geometry(format!("{other:?} does not fit in {self:?}")));
        }
        Ok(())
    }

    /// The same rectangle with its origin offset by `origin`.
    pub fn shift(&self, origin: Point) -> Self {
        Self {
            tl: self.tl + origin,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        let r = Rect::new(2, 2, 4, 3);
        assert!(r.contains_point(Point { x: 2, y: 2 }));
        assert!(r.contains_point(Point { x: 5, y: 4 }));
        assert!(!r.contains_point(Point { x: 6, y: 4 }));
        assert!(r.contains_rect(&Rect::new(3, 3, 3, 2)));
        assert!(!r.contains_rect(&Rect::new(3, 3, 4, 2)));
        assert!(!r.contains_rect(&Rect::new(3, 3, 0, 2)));
        assert!(r.ensure_encloses(&Rect::new(2, 2, 4, 3)).is_ok());
        assert!(r.ensure_encloses(&Rect::new(3, 3, 0, 2)).is_err());
        assert!(r.ensure_encloses(&Rect::new(0, 0, 3, 3)).is_err());
    }

    #[test]
    fn edges_of_a_grid_cell() {
        let cell = Rect::new(4, 2, 7, 3);
        assert_eq!((cell.right(), cell.bottom()), (10, 4));
        assert_eq!(cell.shift(Point::new(1, 1)), Rect::new(5, 3, 7, 3));
        assert_eq!(Rect::new(0, 0, 1, 1).right(), 0);
    }
}
