//! Geometry primitives used across cellkit, and the resolver that turns
//! symbolic or parent-relative size and position requests into concrete
//! bounds.

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// One-dimensional segment operations.
mod linesegment;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Symbolic geometry resolution.
mod resolve;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use linesegment::LineSegment;
pub use point::Point;
pub use rect::Rect;
pub use resolve::{GeometrySpec, Position, resolve_extent, resolve_position};

/// Cardinal directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}
