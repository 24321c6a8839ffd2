/// A directionless one-dimensional segment: a scrolling window over a line of
/// text, a list, or one axis of a grid.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct LineSegment {
    /// The offset of this segment.
    pub off: u32,
    /// The length of this segment.
    pub len: u32,
}

impl LineSegment {
    /// Construct a segment.
    pub fn new(off: u32, len: u32) -> Self {
        Self { off, len }
    }

    /// The far limit of the segment (exclusive).
    pub fn far(&self) -> u32 {
        self.off + self.len
    }

    /// Does the segment cover the offset?
    pub fn contains_offset(&self, pos: u32) -> bool {
        pos >= self.off && pos < self.far()
    }

    /// Does this segment completely enclose the other?
    pub fn contains(&self, other: &Self) -> bool {
        other.off >= self.off && other.far() <= self.far()
    }

    /// Shift the segment by the smallest amount that brings `pos` inside it,
    /// without letting the far edge pass `limit`. Returns the new segment;
    /// when `pos` is already covered the segment is unchanged.
    pub fn reveal(&self, pos: u32, limit: u32) -> Self {
        let max_off = limit.saturating_sub(self.len);
        let off = if pos < self.off {
            pos
        } else if self.len > 0 && pos >= self.far() {
            pos + 1 - self.len
        } else {
            self.off
        };
        Self {
            off: off.min(max_off),
            len: self.len,
        }
    }

    /// Move the segment by a signed amount, saturating at zero and at the
    /// point where the far edge meets `limit`.
    pub fn shift_within(&self, delta: i32, limit: u32) -> Self {
        let max_off = limit.saturating_sub(self.len);
        let off = if delta < 0 {
            self.off.saturating_sub(delta.unsigned_abs())
        } else {
            self.off.saturating_add(delta.unsigned_abs())
        };
        Self {
            off: off.min(max_off),
            len: self.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_scrolls_minimally() {
        let w = LineSegment::new(0, 3);
        assert_eq!(w.reveal(2, 10), w);
        assert_eq!(w.reveal(3, 10), LineSegment::new(1, 3));
        assert_eq!(w.reveal(9, 10), LineSegment::new(7, 3));
        assert_eq!(LineSegment::new(5, 3).reveal(1, 10), LineSegment::new(1, 3));
    }

    #[test]
    fn reveal_saturates_at_limit() {
        // A window longer than the line stays pinned at zero.
        assert_eq!(LineSegment::new(0, 5).reveal(4, 3), LineSegment::new(0, 5));
        assert_eq!(LineSegment::new(0, 4).reveal(20, 10), LineSegment::new(6, 4));
    }

    #[test]
    fn shift_within() {
        let w = LineSegment::new(2, 4);
        assert_eq!(w.shift_within(-5, 10), LineSegment::new(0, 4));
        assert_eq!(w.shift_within(3, 10), LineSegment::new(5, 4));
        assert_eq!(w.shift_within(30, 10), LineSegment::new(6, 4));
        assert!(w.contains(&LineSegment::new(3, 2)));
        assert!(!w.contains_offset(6));
    }
}
