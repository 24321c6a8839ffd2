use std::sync::{Arc, Mutex, MutexGuard};

use super::{Canvas, Script, ScriptedInput, TestSurface};
use crate::{event::Key, geom::Expanse, screen::Screen};

/// A [`Screen`] over a [`TestSurface`] and a [`ScriptedInput`]. Tests build
/// widgets on `screen`, queue live keys on `script`, and inspect the
/// rendered result through [`Harness::canvas`].
pub struct Harness {
    /// The screen under test.
    pub screen: Screen,
    /// Queue feeding the screen's input source.
    pub script: Script,
    /// What the surface has rendered.
    canvas: Arc<Mutex<Canvas>>,
}

impl Harness {
    /// A harness with a color-capable display of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_colors(width, height, true)
    }

    /// A harness choosing whether the display supports colors.
    pub fn with_colors(width: u32, height: u32, colors: bool) -> Self {
        let (canvas, surface) = TestSurface::create_with_colors(Expanse::new(width, height), colors);
        let (script, input) = ScriptedInput::create(Vec::<Key>::new());
        Self {
            screen: Screen::new(surface, input),
            script,
            canvas,
        }
    }

    /// Lock the canvas for inspection.
    pub fn canvas(&self) -> MutexGuard<'_, Canvas> {
        self.canvas.lock().unwrap()
    }
}
