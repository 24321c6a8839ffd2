//! Concrete widgets built on the interaction kernel.
//!
//! Each widget has a typed config with an option schema, a constructor that
//! either returns a fully built widget or releases everything it acquired,
//! and a [`Widget`](crate::Widget) implementation supplying its drawing and
//! built-in key handling.

/// Entry fields over item lists.
pub mod alphalist;
/// Single-line text entry.
pub mod entry;
/// Scrolling item lists.
pub mod itemlist;
/// Static markup labels.
pub mod label;
/// Scrolling grids of editable cells.
pub mod matrix;

pub use alphalist::{AlphaList, AlphaListConfig};
pub use entry::{Entry, EntryConfig};
pub use itemlist::{ItemList, ItemListConfig};
pub use label::{Label, LabelConfig};
pub use matrix::{Matrix, MatrixConfig};
