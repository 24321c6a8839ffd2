//! Core types and traits for cellkit.

/// Backend implementations.
pub mod backend;
/// Configuration schemas.
pub mod config;
/// Drawing helpers.
pub mod draw;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Entry disciplines and character filters.
pub mod filter;
/// The interaction kernel.
pub mod kernel;
/// Log capture.
pub mod logging;
/// The markup compiler.
pub mod markup;
/// The screen registry.
pub mod screen;
/// Display surface interfaces.
pub mod surface;
/// Attributes, colors and glyphs.
pub mod style;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
