//! Drawing helpers shared by widgets: borders, shadows, fills and justified
//! text.
use super::{
    error::Result,
    markup::{AttributedText, Cell, justify},
    screen::Screen,
    style::{AttrSet, Attributes, boxchars},
    surface::RegionId,
};
use crate::geom::Rect;

/// Fill a horizontal run of `len` cells.
pub fn fill(
    screen: &mut Screen,
    region: RegionId,
    row: u32,
    col: u32,
    len: u32,
    cell: Cell,
) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    screen.blit(region, row, col, &vec![cell; len as usize])
}

/// Draw a single-line border around the edge of a region.
pub fn draw_box(screen: &mut Screen, region: RegionId, attrs: Attributes) -> Result<()> {
    let size = screen.region_size(region)?;
    draw_box_at(screen, region, size.rect(), attrs)
}

/// Draw a single-line border around a rectangle inside a region.
pub fn draw_box_at(screen: &mut Screen, region: RegionId, rect: Rect, attrs: Attributes) -> Result<()> {
    if rect.w < 2 || rect.h < 2 {
        return Ok(());
    }
    let edge = |ch| Cell::new(ch, attrs);
    let (left, top, right, bottom) = (rect.tl.x, rect.tl.y, rect.right(), rect.bottom());
    let inner = rect.w - 2;
    screen.blit(region, top, left, &[edge(boxchars::UL)])?;
    fill(screen, region, top, left + 1, inner, edge(boxchars::HL))?;
    screen.blit(region, top, right, &[edge(boxchars::UR)])?;
    for y in top + 1..bottom {
        screen.blit(region, y, left, &[edge(boxchars::VL)])?;
        screen.blit(region, y, right, &[edge(boxchars::VL)])?;
    }
    screen.blit(region, bottom, left, &[edge(boxchars::LL)])?;
    fill(screen, region, bottom, left + 1, inner, edge(boxchars::HL))?;
    screen.blit(region, bottom, right, &[edge(boxchars::LR)])
}

/// Paint a drop-shadow region.
pub fn draw_shadow(screen: &mut Screen, region: RegionId) -> Result<()> {
    let size = screen.region_size(region)?;
    let shade = Cell::new(boxchars::SHADOW, Attributes::with_flags(AttrSet::REVERSE));
    for y in 0..size.h {
        fill(screen, region, y, 0, size.w, shade)?;
    }
    Ok(())
}

/// Write a compiled line into a field of `width` columns starting at
/// (`row`, `col`), honoring the line's alignment and clipping it to the
/// field. Columns of the field not covered by text are left alone.
pub fn write_text(
    screen: &mut Screen,
    region: RegionId,
    row: u32,
    col: u32,
    width: u32,
    text: &AttributedText,
) -> Result<()> {
    let offset = justify(width as usize, text.width(), text.alignment()) as u32;
    let visible = (width - offset) as usize;
    let cells = text.cells();
    screen.blit(region, row, col + offset, &cells[..cells.len().min(visible)])
}

/// Write a line left-aligned into a field, padding the rest of the field
/// with `filler`.
pub fn write_padded(
    screen: &mut Screen,
    region: RegionId,
    row: u32,
    col: u32,
    width: u32,
    cells: &[Cell],
    filler: Cell,
) -> Result<()> {
    let mut line: Vec<Cell> = cells.iter().take(width as usize).copied().collect();
    line.resize(width as usize, filler);
    screen.blit(region, row, col, &line)
}
