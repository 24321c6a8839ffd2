//! cellkit: a terminal widget toolkit.
//!
//! Widgets are built from two layers:
//!
//! - the [`markup`] compiler, which turns strings with inline formatting
//!   directives into lines of attributed cells, and
//! - the interaction [`kernel`], which resolves geometry, dispatches key
//!   bindings and signals, and runs the synchronous inject/activate cycle.
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives and the geometry resolver
//! - [`screen`] - The screen registry and shared paste buffer
//! - [`surface`] - The display surface and input source traits
//! - [`widgets`] - Concrete widgets built on the kernel

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub mod widgets;

pub use core::{
    backend, config, draw, error, event, filter, kernel, logging, markup, screen, style, surface,
};
#[cfg(any(test, feature = "testing"))]
pub use core::testing;

pub use error::{Error, Result};
pub use geom;
pub use kernel::{Chrome, ExitStatus, Outcome, Widget};
pub use screen::{PasteBuffer, Screen, WidgetId};
