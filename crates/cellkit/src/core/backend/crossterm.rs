use std::{
    io::{self, Stderr, Write},
    panic,
};

use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{
    ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style, terminal,
};
use scopeguard::guard;
use tracing::debug;

use crate::{
    error::{Error, Result},
    event::key,
    geom::{Expanse, Point, Rect},
    markup::Cell,
    style::{AttrSet, Attributes, Color, pair_colors},
    surface::{InputSource, RegionId, RegionTable, Surface},
};

/// Map an io error onto the surface error.
fn translate_result<T>(e: io::Result<T>) -> Result<T> {
    match e {
        Ok(t) => Ok(t),
        Err(e) => Err(Error::Surface(e.to_string())),
    }
}

/// Map a palette color onto crossterm's.
fn translate_color(c: Color) -> style::Color {
    match c {
        Color::White => style::Color::White,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::Black => style::Color::Black,
    }
}

/// Restore the terminal to its normal state.
#[allow(unused_must_use)]
fn restore(fp: &mut Stderr) {
    fp.execute(terminal::LeaveAlternateScreen);
    fp.execute(ccursor::Show);
    terminal::disable_raw_mode();
}

/// A display surface drawing to the terminal through crossterm. The terminal
/// is put into raw mode on the alternate screen for the surface's lifetime.
pub struct CrosstermSurface {
    /// Output stream.
    fp: Stderr,
    /// Region bookkeeping.
    regions: RegionTable,
    /// Whether the terminal reports color support.
    colors: bool,
    /// Attributes most recently sent to the terminal.
    current: Option<Attributes>,
}

impl CrosstermSurface {
    /// Take over the terminal.
    pub fn new() -> Result<Self> {
        let (w, h) = translate_result(terminal::size())?;
        let mut fp = io::stderr();
        translate_result(terminal::enable_raw_mode())?;
        translate_result(crossterm::execute!(
            fp,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            ccursor::Hide
        ))?;
        let colors = style::available_color_count() >= 8;
        debug!(w, h, colors, "terminal initialised");
        Ok(Self {
            fp,
            regions: RegionTable::new(Expanse::new(u32::from(w), u32::from(h))),
            colors,
            current: None,
        })
    }

    fn style(&mut self, a: Attributes) -> io::Result<()> {
        if self.current == Some(a) {
            return Ok(());
        }
        // Reset first: a reset after setting colors would clear them.
        self.fp.queue(style::SetAttribute(style::Attribute::Reset))?;
        let table = [
            (AttrSet::BOLD, style::Attribute::Bold),
            (AttrSet::DIM, style::Attribute::Dim),
            (AttrSet::BLINK, style::Attribute::SlowBlink),
            (AttrSet::REVERSE, style::Attribute::Reverse),
            (AttrSet::STANDOUT, style::Attribute::Reverse),
            (AttrSet::UNDERLINE, style::Attribute::Underlined),
        ];
        for (flag, attr) in table {
            if a.flags.contains(flag) {
                self.fp.queue(style::SetAttribute(attr))?;
            }
        }
        if self.colors
            && let Some((fg, bg)) = a.pair.and_then(pair_colors)
        {
            self.fp.queue(style::SetForegroundColor(translate_color(fg)))?;
            self.fp.queue(style::SetBackgroundColor(translate_color(bg)))?;
        }
        self.current = Some(a);
        Ok(())
    }

    fn put(&mut self, at: Point, cells: &[Cell]) -> io::Result<()> {
        self.fp.queue(ccursor::MoveTo(at.x as u16, at.y as u16))?;
        for c in cells {
            self.style(c.attrs)?;
            self.fp.queue(style::Print(c.ch))?;
        }
        Ok(())
    }

    fn fill(&mut self, r: Rect) -> io::Result<()> {
        let blank = vec![Cell::blank(); r.w as usize];
        for y in r.tl.y..r.tl.y + r.h {
            self.put(Point { x: r.tl.x, y }, &blank)?;
        }
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        restore(&mut self.fp);
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> Expanse {
        self.regions.screen()
    }

    fn has_colors(&self) -> bool {
        self.colors
    }

    fn create_region(&mut self, parent: Option<RegionId>, rect: Rect) -> Result<RegionId> {
        self.regions.create(parent, rect)
    }

    fn destroy_region(&mut self, id: RegionId) -> Result<Vec<RegionId>> {
        self.regions.destroy(id)
    }

    fn move_region(&mut self, id: RegionId, origin: Point) -> Result<()> {
        self.regions.move_to(id, origin)
    }

    fn region_size(&self, id: RegionId) -> Result<Expanse> {
        self.regions.size(id)
    }

    fn blit(&mut self, id: RegionId, row: u32, col: u32, cells: &[Cell]) -> Result<()> {
        if let Some(span) = self.regions.clip(id, row, col, cells.len())? {
            translate_result(self.put(span.at, &cells[..span.len]))?;
        }
        Ok(())
    }

    fn erase(&mut self, id: RegionId) -> Result<()> {
        let r = self.regions.absolute(id)?;
        translate_result(self.fill(r))
    }

    fn move_cursor(&mut self, id: RegionId, row: u32, col: u32) -> Result<()> {
        let r = self.regions.absolute(id)?;
        translate_result(
            self.fp
                .queue(ccursor::MoveTo((r.tl.x + col) as u16, (r.tl.y + row) as u16))
                .map(|_| ()),
        )
    }

    fn refresh(&mut self) -> Result<()> {
        translate_result(self.fp.flush())
    }

    #[allow(unused_must_use)]
    fn beep(&mut self) {
        self.fp.write_all(b"\x07");
        self.fp.flush();
    }
}

/// Map crossterm modifiers onto ours.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    let mut out = key::Mods::empty();
    out.set(key::Mods::SHIFT, mods.contains(cevent::KeyModifiers::SHIFT));
    out.set(key::Mods::CTRL, mods.contains(cevent::KeyModifiers::CONTROL));
    out.set(key::Mods::ALT, mods.contains(cevent::KeyModifiers::ALT));
    out
}

/// Translate a crossterm key event. Keys with no counterpart are dropped.
fn translate_key(k: cevent::KeyEvent) -> Option<key::Key> {
    let code = match k.code {
        cevent::KeyCode::Backspace => key::KeyCode::Backspace,
        cevent::KeyCode::Enter => key::KeyCode::Enter,
        cevent::KeyCode::Left => key::KeyCode::Left,
        cevent::KeyCode::Right => key::KeyCode::Right,
        cevent::KeyCode::Up => key::KeyCode::Up,
        cevent::KeyCode::Down => key::KeyCode::Down,
        cevent::KeyCode::Home => key::KeyCode::Home,
        cevent::KeyCode::End => key::KeyCode::End,
        cevent::KeyCode::PageUp => key::KeyCode::PageUp,
        cevent::KeyCode::PageDown => key::KeyCode::PageDown,
        cevent::KeyCode::Tab => key::KeyCode::Tab,
        cevent::KeyCode::BackTab => key::KeyCode::BackTab,
        cevent::KeyCode::Delete => key::KeyCode::Delete,
        cevent::KeyCode::Insert => key::KeyCode::Insert,
        cevent::KeyCode::F(x) => key::KeyCode::F(x),
        cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
        cevent::KeyCode::Null => key::KeyCode::Null,
        cevent::KeyCode::Esc => key::KeyCode::Esc,
        _ => return None,
    };
    Some(key::Key {
        mods: translate_key_modifiers(k.modifiers),
        key: code,
    })
}

/// Blocking keyboard input from the terminal.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn read(&mut self) -> Result<key::Key> {
        loop {
            let evt = cevent::read().map_err(|e| Error::Input(e.to_string()))?;
            if let cevent::Event::Key(k) = evt
                && k.kind != cevent::KeyEventKind::Release
                && let Some(key) = translate_key(k)
            {
                return Ok(key);
            }
        }
    }
}

/// Install a panic hook that restores the terminal before printing a
/// backtrace. The previous hook is reinstated when `f` returns.
pub fn with_panic_hook<T>(f: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    let _restore = guard(previous, |hook| panic::set_hook(hook));
    panic::set_hook(Box::new(|pi| {
        restore(&mut io::stderr());
        BacktracePrinter::new()
            .print_panic_info(pi, &mut default_output_stream())
            .ok();
    }));
    f()
}
