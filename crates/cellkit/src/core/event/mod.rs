//! Input events consumed by the interaction kernel.

/// Keyboard input primitives.
pub mod key;

pub use key::{Key, KeyCode, Mods, keys};
