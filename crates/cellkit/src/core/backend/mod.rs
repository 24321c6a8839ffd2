/// Crossterm backend implementation.
pub mod crossterm;
