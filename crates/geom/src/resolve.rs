use super::{Expanse, Point, Rect};

/// A requested position along one axis. `Left`/`Top` and `Right`/`Bottom` are
/// interchangeable aliases so that callers can use the name that reads
/// naturally for the axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Position {
    /// Flush with the start of the parent's horizontal extent.
    Left,
    /// Flush with the end of the parent's horizontal extent.
    Right,
    /// Flush with the start of the parent's vertical extent.
    Top,
    /// Flush with the end of the parent's vertical extent.
    Bottom,
    /// Centered in the parent's extent.
    Center,
    /// An absolute coordinate, clamped so the child stays inside the parent.
    At(i32),
}

impl Default for Position {
    fn default() -> Self {
        Self::At(0)
    }
}

impl From<i32> for Position {
    fn from(v: i32) -> Self {
        Self::At(v)
    }
}

/// Resolve a requested extent against the parent's extent.
///
/// - `0` takes the full parent extent.
/// - A negative request means "parent minus |n|", but never less than
///   `minimum`.
/// - A positive request is capped at the parent extent.
pub fn resolve_extent(parent: u32, requested: i32, minimum: u32) -> u32 {
    match requested {
        0 => parent,
        n if n < 0 => {
            let shrunk = i64::from(parent) + i64::from(n);
            shrunk.max(i64::from(minimum)) as u32
        }
        n => n.unsigned_abs().min(parent),
    }
}

/// Resolve a requested position for a child of extent `child` inside a parent
/// of extent `parent`.
pub fn resolve_position(parent: u32, requested: Position, child: u32) -> u32 {
    let room = parent.saturating_sub(child);
    match requested {
        Position::Left | Position::Top => 0,
        Position::Right | Position::Bottom => room,
        Position::Center => room / 2,
        Position::At(v) => (v.max(0) as u32).min(room),
    }
}

/// A symbolic geometry request, resolved once at construction and again on
/// an explicit move.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct GeometrySpec {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Requested width: positive is absolute, zero is full, negative is
    /// parent-relative.
    pub width: i32,
    /// Requested height, interpreted like `width`.
    pub height: i32,
}

impl GeometrySpec {
    /// Construct a spec.
    pub fn new(x: Position, y: Position, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Resolve this spec inside a parent, with a lower bound on each
    /// dimension. The resulting rect is relative to the parent's origin.
    pub fn resolve(&self, parent: Expanse, minimum: Expanse) -> Rect {
        let w = resolve_extent(parent.w, self.width, minimum.w);
        let h = resolve_extent(parent.h, self.height, minimum.h);
        self.place(parent, Expanse::new(w, h))
    }

    /// Place an already-sized child inside a parent according to this
    /// spec's position. The child is clipped to the parent's size.
    pub fn place(&self, parent: Expanse, child: Expanse) -> Rect {
        let w = child.w.min(parent.w);
        let h = child.h.min(parent.h);
        Rect {
            tl: Point {
                x: resolve_position(parent.w, self.x, w),
                y: resolve_position(parent.h, self.y, h),
            },
            w,
            h,
        }
    }
}
