use std::sync::{Arc, Mutex};

use crate::{
    error::Result,
    geom::{Expanse, Point, Rect},
    markup::Cell,
    surface::{RegionId, RegionTable, Surface},
};

/// One recorded blit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blit {
    /// Target region.
    pub region: RegionId,
    /// Region-relative row.
    pub row: u32,
    /// Region-relative column.
    pub col: u32,
    /// The characters written, before clipping.
    pub text: String,
}

/// The state behind a [`TestSurface`]: a grid of cells plus a record of
/// everything written to it.
#[derive(Debug)]
pub struct Canvas {
    /// Region bookkeeping.
    pub regions: RegionTable,
    /// Whether the surface claims color support.
    pub colors: bool,
    /// Cell grid, indexed by row then column.
    cells: Vec<Vec<Cell>>,
    /// Blits in the order they happened.
    log: Vec<Blit>,
    /// Number of notices emitted.
    beeps: usize,
    /// Number of refreshes requested.
    refreshes: usize,
    /// Last cursor position, in absolute coordinates.
    cursor: Option<Point>,
}

impl Canvas {
    /// A blank canvas.
    fn new(size: Expanse, colors: bool) -> Self {
        Self {
            regions: RegionTable::new(size),
            colors,
            cells: vec![vec![Cell::blank(); size.w as usize]; size.h as usize],
            log: vec![],
            beeps: 0,
            refreshes: 0,
            cursor: None,
        }
    }

    /// The text of one screen row.
    pub fn row_text(&self, y: u32) -> String {
        self.cells
            .get(y as usize)
            .map(|r| r.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// All screen rows.
    pub fn text(&self) -> Vec<String> {
        (0..self.cells.len() as u32).map(|y| self.row_text(y)).collect()
    }

    /// Does any row contain the substring?
    pub fn contains(&self, s: &str) -> bool {
        self.text().iter().any(|l| l.contains(s))
    }

    /// The cell at an absolute position.
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        self.cells.get(y as usize)?.get(x as usize).copied()
    }

    /// Take the blit log, leaving it empty.
    pub fn take_log(&mut self) -> Vec<Blit> {
        std::mem::take(&mut self.log)
    }

    /// The blit log so far.
    pub fn log(&self) -> &[Blit] {
        &self.log
    }

    /// Number of blits recorded against a region.
    pub fn blits_to(&self, region: RegionId) -> usize {
        self.log.iter().filter(|b| b.region == region).count()
    }

    /// Number of notices emitted.
    pub fn beeps(&self) -> usize {
        self.beeps
    }

    /// Number of refreshes requested.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Last cursor position.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }
}

/// A display surface that renders into memory.
pub struct TestSurface {
    /// Shared canvas.
    pub canvas: Arc<Mutex<Canvas>>,
}

impl TestSurface {
    /// Create returns a `Canvas` protected by a mutex, and a `TestSurface`
    /// writing to it. The canvas can be inspected after the surface has been
    /// handed to a screen.
    pub fn create(size: Expanse) -> (Arc<Mutex<Canvas>>, Self) {
        Self::create_with_colors(size, true)
    }

    /// Like [`TestSurface::create`], choosing whether colors are supported.
    pub fn create_with_colors(size: Expanse, colors: bool) -> (Arc<Mutex<Canvas>>, Self) {
        let canvas = Arc::new(Mutex::new(Canvas::new(size, colors)));
        (canvas.clone(), Self { canvas })
    }

    /// Lock the canvas.
    fn canvas(&self) -> std::sync::MutexGuard<'_, Canvas> {
        self.canvas.lock().unwrap()
    }
}

impl Surface for TestSurface {
    fn size(&self) -> Expanse {
        self.canvas().regions.screen()
    }

    fn has_colors(&self) -> bool {
        self.canvas().colors
    }

    fn create_region(&mut self, parent: Option<RegionId>, rect: Rect) -> Result<RegionId> {
        self.canvas().regions.create(parent, rect)
    }

    fn destroy_region(&mut self, id: RegionId) -> Result<Vec<RegionId>> {
        self.canvas().regions.destroy(id)
    }

    fn move_region(&mut self, id: RegionId, origin: Point) -> Result<()> {
        self.canvas().regions.move_to(id, origin)
    }

    fn region_size(&self, id: RegionId) -> Result<Expanse> {
        self.canvas().regions.size(id)
    }

    fn blit(&mut self, id: RegionId, row: u32, col: u32, cells: &[Cell]) -> Result<()> {
        let mut c = self.canvas();
        let span = c.regions.clip(id, row, col, cells.len())?;
        c.log.push(Blit {
            region: id,
            row,
            col,
            text: cells.iter().map(|c| c.ch).collect(),
        });
        if let Some(span) = span {
            let y = span.at.y as usize;
            for (i, cell) in cells[..span.len].iter().enumerate() {
                c.cells[y][span.at.x as usize + i] = *cell;
            }
        }
        Ok(())
    }

    fn erase(&mut self, id: RegionId) -> Result<()> {
        let mut c = self.canvas();
        let r = c.regions.absolute(id)?;
        for y in r.tl.y..r.tl.y + r.h {
            for x in r.tl.x..r.tl.x + r.w {
                c.cells[y as usize][x as usize] = Cell::blank();
            }
        }
        Ok(())
    }

    fn move_cursor(&mut self, id: RegionId, row: u32, col: u32) -> Result<()> {
        let mut c = self.canvas();
        let r = c.regions.absolute(id)?;
        c.cursor = Some(Point {
            x: r.tl.x + col,
            y: r.tl.y + row,
        });
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.canvas().refreshes += 1;
        Ok(())
    }

    fn beep(&mut self) {
        self.canvas().beeps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::compile;

    #[test]
    fn blits_clip_and_log() -> Result<()> {
        let (canvas, mut s) = TestSurface::create(Expanse::new(10, 3));
        let r = s.create_region(None, Rect::new(2, 1, 4, 1))?;
        s.blit(r, 0, 1, compile("abcdef").cells())?;
        let c = canvas.lock().unwrap();
        assert_eq!(c.row_text(1), "   abc    ");
        assert_eq!(c.blits_to(r), 1);
        assert_eq!(c.log()[0].text, "abcdef");
        Ok(())
    }
}
