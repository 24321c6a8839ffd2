use std::ops::Add;

/// A cell location: `x` counts columns and `y` counts rows, both from zero
/// at the top-left of whatever the point is relative to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Point {
    /// Construct a point.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    /// Translate a parent-relative point into its parent's frame.
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_origins_accumulate() {
        let window = Point::new(10, 4);
        let field = Point::new(7, 1);
        assert_eq!(window + field, Point::new(17, 5));
        assert_eq!(Point::default() + field, field);
        assert_eq!(Point::from((3, 2)), Point { x: 3, y: 2 });
    }
}
