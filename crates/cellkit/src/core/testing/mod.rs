/// Harness that builds a screen over test doubles.
pub mod harness;
/// Scripted input source.
pub mod input;
/// In-memory display surface.
pub mod surface;

pub use harness::Harness;
pub use input::{Script, ScriptedInput};
pub use surface::{Blit, Canvas, TestSurface};
