//! A grid of editable cells viewed through a scrolling viewport.
//!
//! The logical grid has `rows x cols` cells, addressed from `(1, 1)`. A
//! viewport of `vrows x vcols` cells is anchored at (`top_row`, `left_col`),
//! and the cursor is always inside it. Each viewport slot owns its own cell
//! region, and the row and column titles live in separate strip regions, so
//! that scrolling along one axis only redraws the strip for that axis plus
//! the cells.
use serde_json::Value;
use tracing::{debug, trace};

use super::{Entry, EntryConfig};
use crate::{
    config::{self, Options, Schema},
    draw,
    error::{Error, Result},
    event::{Key, KeyCode, keys},
    filter::{CharacterFilter, DisplayType},
    geom::{Expanse, GeometrySpec, LineSegment, Position, Rect},
    kernel::{Action, COMMON_SIGNALS, Chrome, Kernel, Outcome, Step, Widget, construct},
    markup::{AttributedText, Cell},
    screen::{PasteBuffer, Screen},
    style::{AttrSet, Attributes},
    surface::RegionId,
};

/// Height of a cell slot: a border row, the content row, a border row.
const CELL_HEIGHT: u32 = 3;

/// Matrix options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixConfig {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Rows in the grid.
    pub rows: usize,
    /// Columns in the grid.
    pub cols: usize,
    /// Visible rows; zero shows every row.
    pub vrows: usize,
    /// Visible columns; zero shows every column.
    pub vcols: usize,
    /// Title lines, as markup.
    pub title: Vec<String>,
    /// Row titles, as markup, first row first.
    pub row_titles: Vec<String>,
    /// Column titles, as markup, first column first.
    pub col_titles: Vec<String>,
    /// Width of each column. A single value applies to every column.
    pub col_widths: Vec<u32>,
    /// Display discipline of each column. A single value applies to every
    /// column.
    pub col_types: Vec<DisplayType>,
    /// Character drawn in unused cell columns.
    pub filler: char,
    /// Draw a border around the matrix.
    pub boxed: bool,
    /// Draw a border around each cell.
    pub box_cell: bool,
    /// Draw a drop shadow.
    pub shadow: bool,
}

/// A list of values, or a single value standing for all of them.
fn as_list<T>(v: &Value, each: fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    match v {
        Value::Null => Ok(vec![]),
        Value::Array(items) => items.iter().map(each).collect(),
        other => Ok(vec![each(other)?]),
    }
}

impl MatrixConfig {
    /// The option schema.
    pub fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .field("x", "CENTER", |c, v| {
                c.x = config::as_position(v)?;
                Ok(())
            })
            .field("y", "CENTER", |c, v| {
                c.y = config::as_position(v)?;
                Ok(())
            })
            .field("rows", 0, |c, v| {
                c.rows = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("cols", 0, |c, v| {
                c.cols = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("vrows", 0, |c, v| {
                c.vrows = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("vcols", 0, |c, v| {
                c.vcols = config::as_u32(v)? as usize;
                Ok(())
            })
            .field("title", Value::Null, |c, v| {
                c.title = config::as_lines(v)?;
                Ok(())
            })
            .field("row_titles", Value::Null, |c, v| {
                c.row_titles = as_list(v, config::as_str)?;
                Ok(())
            })
            .field("col_titles", Value::Null, |c, v| {
                c.col_titles = as_list(v, config::as_str)?;
                Ok(())
            })
            .field("col_widths", 5, |c, v| {
                c.col_widths = as_list(v, config::as_u32)?;
                Ok(())
            })
            .field("col_types", "MIXED", |c, v| {
                c.col_types = as_list(v, config::as_display_type)?;
                Ok(())
            })
            .field("filler", ".", |c, v| {
                c.filler = config::as_char(v)?;
                Ok(())
            })
            .field("box", true, |c, v| {
                c.boxed = config::as_bool(v)?;
                Ok(())
            })
            .field("box_cell", true, |c, v| {
                c.box_cell = config::as_bool(v)?;
                Ok(())
            })
            .field("shadow", false, |c, v| {
                c.shadow = config::as_bool(v)?;
                Ok(())
            })
    }

    /// Build a config from option overrides.
    pub fn from_options(opts: &Options) -> Result<Self> {
        Self::schema().build(opts)
    }
}

/// Per-column settings, padded out from the config.
fn per_column<T: Clone>(given: &[T], cols: usize, default: T) -> Vec<T> {
    let fill = if given.len() == 1 {
        given[0].clone()
    } else {
        default
    };
    (0..cols)
        .map(|i| given.get(i).cloned().unwrap_or_else(|| fill.clone()))
        .collect()
}

/// Where the viewport and cursor stand, for working out what a move changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Place {
    /// Logical cursor row.
    row: usize,
    /// Logical cursor column.
    col: usize,
    /// First visible row.
    top_row: usize,
    /// First visible column.
    left_col: usize,
}

/// A grid of text cells with row and column titles, per-column widths and
/// display disciplines, and a viewport that scrolls in both directions.
pub struct Matrix {
    /// Kernel state.
    kernel: Kernel<Matrix>,
    /// Grid rows.
    rows: usize,
    /// Grid columns.
    cols: usize,
    /// Visible rows.
    vrows: usize,
    /// Visible columns.
    vcols: usize,
    /// Cell contents, indexed `[row - 1][col - 1]`.
    info: Vec<Vec<String>>,
    /// Width of each column.
    widths: Vec<u32>,
    /// Character filter of each column.
    filters: Vec<CharacterFilter>,
    /// Compiled row titles.
    row_titles: Vec<AttributedText>,
    /// Compiled column titles.
    col_titles: Vec<AttributedText>,
    /// Width of the row title strip.
    row_title_width: u32,
    /// Width of each viewport slot.
    slots: Vec<u32>,
    /// Filler character.
    filler: char,
    /// Draw cell borders?
    box_cell: bool,
    /// Cursor and viewport anchor.
    at: Place,
    /// Column title strip.
    col_title_region: Option<RegionId>,
    /// Row title strip.
    row_title_region: Option<RegionId>,
    /// Cell regions, indexed `[viewport row][viewport column]`.
    cells: Vec<Vec<RegionId>>,
    /// Shared cut/copy/paste buffer.
    paste: PasteBuffer,
}

impl Matrix {
    /// Build a matrix on the screen. Fails if the grid or viewport has no
    /// rows or columns, a column has zero width, or the matrix does not fit.
    pub fn new(screen: &mut Screen, conf: MatrixConfig) -> Result<Self> {
        construct(screen, "matrix", |screen, id| {
            if conf.rows == 0 || conf.cols == 0 {
                return Err(Error::Construct(format!(
                    "matrix: empty grid {}x{}",
                    conf.rows, conf.cols
                )));
            }
            let (rows, cols) = (conf.rows, conf.cols);
            let vrows = if conf.vrows == 0 { rows } else { conf.vrows.min(rows) };
            let vcols = if conf.vcols == 0 { cols } else { conf.vcols.min(cols) };
            let grid_h = u32::try_from(vrows)
                .ok()
                .and_then(|v| v.checked_mul(CELL_HEIGHT))
                .filter(|h| *h <= screen.size().h)
                .ok_or_else(|| {
                    Error::Construct(format!("matrix: {vrows} visible rows do not fit"))
                })?;

            let widths = per_column(&conf.col_widths, cols, 5);
            if let Some(c) = widths.iter().position(|w| *w == 0) {
                return Err(Error::Construct(format!("matrix: column {} has no width", c + 1)));
            }
            let filters = per_column(&conf.col_types, cols, DisplayType::Mixed)
                .into_iter()
                .map(CharacterFilter::from)
                .collect();
            let row_titles: Vec<AttributedText> = (0..rows)
                .map(|r| screen.compile(conf.row_titles.get(r).map_or("", String::as_str)))
                .collect();
            let col_titles: Vec<AttributedText> = (0..cols)
                .map(|c| screen.compile(conf.col_titles.get(c).map_or("", String::as_str)))
                .collect();
            let has_col_titles = col_titles.iter().any(|t| !t.is_empty());
            let row_title_width = row_titles
                .iter()
                .map(|t| t.width() as u32)
                .max()
                .filter(|w| *w > 0)
                .map_or(0, |w| w + 2);

            // When columns scroll, every slot must hold the widest column.
            let slots: Vec<u32> = if cols > vcols {
                let widest = widths.iter().copied().max().unwrap_or(1);
                vec![widest; vcols]
            } else {
                widths.clone()
            };

            let border = u32::from(conf.boxed);
            let cells_w = slots.iter().fold(0u32, |acc, s| acc.saturating_add(s.saturating_add(2)));
            let title_w = conf
                .title
                .iter()
                .map(|t| screen.compile(t).width() as u32)
                .max()
                .unwrap_or(0);
            let strip_h = u32::from(has_col_titles);
            let size = Expanse::new(
                (row_title_width.saturating_add(cells_w)).max(title_w).saturating_add(2 * border),
                2 * border + conf.title.len() as u32 + strip_h + grid_h,
            );
            let spec = GeometrySpec::new(conf.x, conf.y, size.w as i32, size.h as i32);
            let chrome = Chrome {
                boxed: conf.boxed,
                shadow: conf.shadow,
                title: conf.title.clone(),
            };
            let mut kernel = Kernel::new(screen, id, "matrix", COMMON_SIGNALS, spec, size, &chrome)?;
            kernel
                .bindings_mut()
                .bind(keys::FORWARD, Action::Remap(Key::from(KeyCode::PageDown)));
            kernel
                .bindings_mut()
                .bind(keys::BACKWARD, Action::Remap(Key::from(KeyCode::PageUp)));

            let window = kernel.window();
            let o = kernel.content_origin();
            let cells_x = o.x + row_title_width;
            let cells_y = o.y + strip_h;
            let col_title_region = if has_col_titles {
                Some(screen.create_region(id, Some(window), Rect::new(cells_x, o.y, cells_w, 1))?)
            } else {
                None
            };
            let row_title_region = if row_title_width > 0 {
                Some(screen.create_region(
                    id,
                    Some(window),
                    Rect::new(o.x, cells_y, row_title_width, grid_h),
                )?)
            } else {
                None
            };
            let mut cells = Vec::with_capacity(vrows);
            for vr in 0..vrows as u32 {
                let mut row = Vec::with_capacity(vcols);
                let mut x = cells_x;
                for slot in &slots {
                    let rect = Rect::new(x, cells_y + vr * CELL_HEIGHT, slot + 2, CELL_HEIGHT);
                    row.push(screen.create_region(id, Some(window), rect)?);
                    x += slot + 2;
                }
                cells.push(row);
            }

            debug!(rows, cols, vrows, vcols, "matrix created");
            Ok(Self {
                kernel,
                rows,
                cols,
                vrows,
                vcols,
                info: vec![vec![String::new(); cols]; rows],
                widths,
                filters,
                row_titles,
                col_titles,
                row_title_width,
                slots,
                filler: conf.filler,
                box_cell: conf.box_cell,
                at: Place {
                    row: 1,
                    col: 1,
                    top_row: 1,
                    left_col: 1,
                },
                col_title_region,
                row_title_region,
                cells,
                paste: screen.paste_buffer(),
            })
        })
    }

    /// Grid size as `(rows, cols)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Viewport size as `(vrows, vcols)`.
    pub fn viewport_size(&self) -> (usize, usize) {
        (self.vrows, self.vcols)
    }

    /// The logical cursor as `(row, col)`.
    pub fn current(&self) -> (usize, usize) {
        (self.at.row, self.at.col)
    }

    /// The viewport anchor as `(top_row, left_col)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.at.top_row, self.at.left_col)
    }

    /// The cursor inside the viewport as `(row, col)`, from `(1, 1)`.
    pub fn viewport_cursor(&self) -> (usize, usize) {
        (
            self.at.row - self.at.top_row + 1,
            self.at.col - self.at.left_col + 1,
        )
    }

    /// The column title strip, if there are column titles.
    pub fn col_title_region(&self) -> Option<RegionId> {
        self.col_title_region
    }

    /// The row title strip, if there are row titles.
    pub fn row_title_region(&self) -> Option<RegionId> {
        self.row_title_region
    }

    /// The region of a viewport slot, from `(1, 1)`.
    pub fn cell_region(&self, vrow: usize, vcol: usize) -> Option<RegionId> {
        self.cells
            .get(vrow.checked_sub(1)?)?
            .get(vcol.checked_sub(1)?)
            .copied()
    }

    fn in_grid(&self, row: usize, col: usize) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }

    /// The contents of a cell, or `None` outside the grid.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&str> {
        if !self.in_grid(row, col) {
            return None;
        }
        Some(&self.info[row - 1][col - 1])
    }

    /// Set a cell's contents, truncated to the column width. Returns false
    /// outside the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        if !self.in_grid(row, col) {
            return false;
        }
        let width = self.widths[col - 1] as usize;
        self.info[row - 1][col - 1] = value.chars().take(width).collect();
        true
    }

    /// Empty one cell. Returns false outside the grid.
    pub fn clean_cell(&mut self, row: usize, col: usize) -> bool {
        self.set_cell(row, col, "")
    }

    /// Empty every cell.
    pub fn clean(&mut self) {
        for row in &mut self.info {
            row.iter_mut().for_each(String::clear);
        }
    }

    /// Move the cursor to a cell, scrolling the viewport by the least amount
    /// that shows it. Targets outside the grid are rejected and nothing
    /// changes. Does not redraw.
    pub fn move_to_cell(&mut self, row: usize, col: usize) -> bool {
        if !self.in_grid(row, col) {
            trace!(row, col, "move outside grid");
            return false;
        }
        let rows = LineSegment::new(self.at.top_row as u32 - 1, self.vrows as u32)
            .reveal(row as u32 - 1, self.rows as u32);
        let cols = LineSegment::new(self.at.left_col as u32 - 1, self.vcols as u32)
            .reveal(col as u32 - 1, self.cols as u32);
        self.at = Place {
            row,
            col,
            top_row: rows.off as usize + 1,
            left_col: cols.off as usize + 1,
        };
        true
    }

    /// Move the cursor to a cell and redraw. A missing coordinate is asked
    /// for with a prompt that reads from the screen's input. Returns false if
    /// a prompt was cancelled or the cell is outside the grid.
    pub fn jump_to_cell(
        &mut self,
        screen: &mut Screen,
        row: Option<usize>,
        col: Option<usize>,
    ) -> Result<bool> {
        let row = match row {
            Some(r) => Some(r),
            None => self.prompt(screen, "Row", self.rows)?,
        };
        let Some(row) = row else {
            return Ok(false);
        };
        let col = match col {
            Some(c) => Some(c),
            None => self.prompt(screen, "Col", self.cols)?,
        };
        let Some(col) = col else {
            return Ok(false);
        };
        let moved = self.move_to_cell(row, col);
        self.draw(screen)?;
        Ok(moved)
    }

    /// Ask for a number between 1 and `limit`.
    fn prompt(&self, screen: &mut Screen, what: &str, limit: usize) -> Result<Option<usize>> {
        let digits = limit.to_string().len();
        let conf = EntryConfig {
            x: Position::Center,
            y: Position::Center,
            title: vec![],
            label: format!("</B>{what} (1-{limit}):<!B> "),
            field_width: digits as i32 + 1,
            filler: '_',
            hidden: '*',
            display: DisplayType::Int,
            value: String::new(),
            min: 1,
            max: digits,
            boxed: true,
            shadow: false,
        };
        let mut entry = Entry::new(screen, conf)?;
        let outcome = entry.activate(screen, None);
        entry.destroy(screen)?;
        screen.refresh_all()?;
        Ok(match outcome? {
            Outcome::Confirmed(s) => s.parse().ok(),
            _ => None,
        })
    }

    /// Draw one viewport slot.
    fn draw_cell(&self, screen: &mut Screen, vrow: usize, vcol: usize) -> Result<()> {
        let region = self.cells[vrow - 1][vcol - 1];
        let row = self.at.top_row + vrow - 1;
        let col = self.at.left_col + vcol - 1;
        let current = (row, col) == (self.at.row, self.at.col);
        let slot = self.slots[vcol - 1];
        let width = self.widths[col - 1];
        let filter = self.filters[col - 1];
        let text = &self.info[row - 1][col - 1];

        let attrs = if current {
            Attributes::with_flags(AttrSet::REVERSE)
        } else {
            Attributes::plain()
        };
        let mut line: Vec<Cell> = text
            .chars()
            .map(|c| Cell::new(if filter.is_masked() { self.filler } else { c }, attrs))
            .collect();
        line.resize(width as usize, Cell::new(self.filler, attrs));
        draw::write_padded(screen, region, 1, 1, slot, &line, Cell::blank())?;

        if current {
            draw::draw_box(screen, region, Attributes::with_flags(AttrSet::BOLD))?;
            let at = text.chars().count().min(width as usize - 1) as u32;
            screen.move_cursor(region, 1, 1 + at)?;
        } else if self.box_cell {
            draw::draw_box(screen, region, Attributes::plain())?;
        } else {
            let size = screen.region_size(region)?;
            for y in [0, size.h - 1] {
                draw::fill(screen, region, y, 0, size.w, Cell::blank())?;
            }
            screen.blit(region, 1, 0, &[Cell::blank()])?;
            screen.blit(region, 1, size.w - 1, &[Cell::blank()])?;
        }
        Ok(())
    }

    /// Draw every viewport slot.
    fn draw_cells(&self, screen: &mut Screen) -> Result<()> {
        for vr in 1..=self.vrows {
            for vc in 1..=self.vcols {
                self.draw_cell(screen, vr, vc)?;
            }
        }
        Ok(())
    }

    /// Draw the cell under the cursor.
    fn draw_current(&self, screen: &mut Screen) -> Result<()> {
        let (vr, vc) = self.viewport_cursor();
        self.draw_cell(screen, vr, vc)
    }

    /// Draw the column title strip.
    fn draw_col_titles(&self, screen: &mut Screen) -> Result<()> {
        let Some(region) = self.col_title_region else {
            return Ok(());
        };
        screen.erase_region(region)?;
        let mut x = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            let title = &self.col_titles[self.at.left_col - 1 + i];
            if !title.is_empty() {
                draw::write_text(screen, region, 0, x + 1, *slot, title)?;
            }
            x += slot + 2;
        }
        Ok(())
    }

    /// Draw the row title strip.
    fn draw_row_titles(&self, screen: &mut Screen) -> Result<()> {
        let Some(region) = self.row_title_region else {
            return Ok(());
        };
        screen.erase_region(region)?;
        for vr in 0..self.vrows {
            let title = &self.row_titles[self.at.top_row - 1 + vr];
            if !title.is_empty() {
                let y = vr as u32 * CELL_HEIGHT + 1;
                draw::write_text(screen, region, y, 1, self.row_title_width - 2, title)?;
            }
        }
        Ok(())
    }

    /// Redraw what changed between `before` and the current place: the
    /// title strip of each axis that scrolled, and either every cell (after a
    /// scroll) or just the cells the cursor left and entered.
    fn redraw_from(&self, screen: &mut Screen, before: Place) -> Result<()> {
        let scrolled_rows = before.top_row != self.at.top_row;
        let scrolled_cols = before.left_col != self.at.left_col;
        if scrolled_rows {
            self.draw_row_titles(screen)?;
        }
        if scrolled_cols {
            self.draw_col_titles(screen)?;
        }
        if scrolled_rows || scrolled_cols {
            self.draw_cells(screen)?;
        } else if before != self.at {
            let vr = before.row - before.top_row + 1;
            let vc = before.col - before.left_col + 1;
            self.draw_cell(screen, vr, vc)?;
            self.draw_current(screen)?;
        }
        Ok(())
    }

    fn move_right(&mut self) -> bool {
        let (crow, ccol) = self.viewport_cursor();
        let at = &mut self.at;
        if ccol < self.vcols {
            at.col += 1;
        } else if at.col < self.cols {
            at.col += 1;
            at.left_col += 1;
        } else if at.row < self.rows {
            at.row += 1;
            at.col = 1;
            at.left_col = 1;
            if crow == self.vrows {
                at.top_row += 1;
            }
        } else {
            return false;
        }
        true
    }

    fn move_left(&mut self) -> bool {
        let (crow, ccol) = self.viewport_cursor();
        let at = &mut self.at;
        if ccol > 1 {
            at.col -= 1;
        } else if at.left_col > 1 {
            at.col -= 1;
            at.left_col -= 1;
        } else if at.row > 1 {
            at.row -= 1;
            at.col = self.cols;
            at.left_col = self.cols - self.vcols + 1;
            if crow == 1 {
                at.top_row -= 1;
            }
        } else {
            return false;
        }
        true
    }

    fn move_up(&mut self) -> bool {
        let (crow, _) = self.viewport_cursor();
        if crow > 1 {
            self.at.row -= 1;
        } else if self.at.top_row > 1 {
            self.at.row -= 1;
            self.at.top_row -= 1;
        } else {
            return false;
        }
        true
    }

    fn move_down(&mut self) -> bool {
        let (crow, _) = self.viewport_cursor();
        if crow < self.vrows {
            self.at.row += 1;
        } else if self.at.top_row + self.vrows - 1 < self.rows {
            self.at.row += 1;
            self.at.top_row += 1;
        } else {
            return false;
        }
        true
    }

    /// Scroll a page of rows, keeping the cursor's viewport row. Fails when
    /// the viewport cannot move in that direction.
    fn page(&mut self, down: bool) -> bool {
        let step = (self.vrows - 1).max(1) as i32;
        let seg = LineSegment::new(self.at.top_row as u32 - 1, self.vrows as u32);
        let moved = seg.shift_within(if down { step } else { -step }, self.rows as u32);
        if moved == seg {
            return false;
        }
        let top_row = moved.off as usize + 1;
        self.at.row = self.at.row + top_row - self.at.top_row;
        self.at.top_row = top_row;
        true
    }

    /// Type a character into the current cell.
    fn type_char(&mut self, c: char) -> Step {
        let (row, col) = self.current();
        let width = self.widths[col - 1] as usize;
        let cell = &mut self.info[row - 1][col - 1];
        match self.filters[col - 1].filter(c) {
            Some(c) if cell.chars().count() < width => {
                cell.push(c);
                Step::Handled
            }
            _ => Step::Notice,
        }
    }

    /// Drop the last character of the current cell.
    fn erase_char(&mut self) -> Step {
        let (row, col) = self.current();
        let cell = &mut self.info[row - 1][col - 1];
        if self.filters[col - 1].is_view_only() || cell.pop().is_none() {
            return Step::Notice;
        }
        Step::Handled
    }

    /// Cell-editing keys. Returns `None` for keys that are not edits.
    fn edit(&mut self, k: Key) -> Option<Step> {
        let (row, col) = self.current();
        let text = self.info[row - 1][col - 1].clone();
        let step = if k == keys::PASTE {
            let buf = self.paste.get();
            if buf.is_empty() || buf.chars().count() > self.widths[col - 1] as usize {
                Step::Notice
            } else {
                self.set_cell(row, col, &buf);
                Step::Handled
            }
        } else if k == keys::COPY {
            self.paste.set(&text);
            Step::Handled
        } else if k == keys::CUT {
            self.paste.set(&text);
            self.clean_cell(row, col);
            Step::Handled
        } else if k == keys::ERASE {
            self.clean_cell(row, col);
            Step::Handled
        } else if let Some(c) = k.printable() {
            self.type_char(c)
        } else if matches!(k.key, KeyCode::Backspace | KeyCode::Delete) {
            self.erase_char()
        } else {
            return None;
        };
        Some(step)
    }
}

impl Widget for Matrix {
    type Output = Vec<Vec<String>>;

    fn kernel(&self) -> &Kernel<Self> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Self> {
        &mut self.kernel
    }

    fn draw(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.draw_chrome(screen)?;
        self.draw_col_titles(screen)?;
        self.draw_row_titles(screen)?;
        self.draw_cells(screen)
    }

    fn handle_input(&mut self, screen: &mut Screen, key: Key) -> Result<Step> {
        let k = key.normalize();
        if let Some(step) = self.edit(k) {
            if step == Step::Handled {
                self.draw_current(screen)?;
            }
            return Ok(step);
        }
        if k == keys::JUMP {
            let jumped = self.jump_to_cell(screen, None, None)?;
            return Ok(if jumped { Step::Handled } else { Step::Notice });
        }
        if k == keys::REFRESH {
            self.draw(screen)?;
            return Ok(Step::Handled);
        }

        let before = self.at;
        let moved = match k.key {
            KeyCode::Right | KeyCode::Tab => self.move_right(),
            KeyCode::Left | KeyCode::BackTab => self.move_left(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::PageDown => self.page(true),
            KeyCode::PageUp => self.page(false),
            KeyCode::Home => self.move_to_cell(self.at.row, 1) && before != self.at,
            KeyCode::End => self.move_to_cell(self.at.row, self.cols) && before != self.at,
            KeyCode::Enter => return Ok(Step::Leave),
            _ => false,
        };
        if !moved {
            return Ok(Step::Notice);
        }
        self.redraw_from(screen, before)?;
        Ok(Step::Handled)
    }

    fn output(&self) -> Vec<Vec<String>> {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::Harness;

    fn matrix(h: &mut Harness, opts: Value) -> Result<Matrix> {
        let Value::Object(opts) = opts else {
            return Err(Error::Invalid("options".into()));
        };
        Matrix::new(&mut h.screen, MatrixConfig::from_options(&opts)?)
    }

    fn right() -> Key {
        Key::from(KeyCode::Right)
    }

    fn down() -> Key {
        Key::from(KeyCode::Down)
    }

    #[test]
    fn wraps_at_the_right_edge() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(&mut h, json!({"rows": 3, "cols": 3, "vrows": 2, "vcols": 2, "col_widths": 3}))?;
        m.activate(&mut h.screen, Some(&[right(), right()]))?;
        assert_eq!(m.current(), (1, 3));
        assert_eq!(m.anchor(), (1, 2));
        m.activate(&mut h.screen, Some(&[right()]))?;
        assert_eq!(m.current(), (2, 1));
        assert_eq!(m.anchor(), (1, 1));
        m.activate(&mut h.screen, Some(&[right(), right(), right()]))?;
        assert_eq!(m.current(), (3, 1));
        assert_eq!(m.anchor(), (2, 1));
        assert_eq!(m.viewport_cursor(), (2, 1));
        Ok(())
    }

    #[test]
    fn wraps_at_the_left_edge() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(&mut h, json!({"rows": 3, "cols": 3, "vrows": 2, "vcols": 2, "col_widths": 3}))?;
        let left = Key::from(KeyCode::BackTab);
        m.activate(&mut h.screen, Some(&[left]))?;
        assert_eq!(m.current(), (1, 1));
        assert_eq!(h.canvas().beeps(), 1);
        m.jump_to_cell(&mut h.screen, Some(3), Some(1))?;
        assert_eq!(m.anchor(), (2, 1));
        m.activate(&mut h.screen, Some(&[left]))?;
        assert_eq!(m.current(), (2, 3));
        assert_eq!(m.anchor(), (2, 2));
        m.activate(&mut h.screen, Some(&[left, left, left]))?;
        assert_eq!(m.current(), (1, 3));
        assert_eq!(m.anchor(), (1, 2));
        Ok(())
    }

    #[test]
    fn vertical_moves() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(&mut h, json!({"rows": 4, "cols": 1, "vrows": 2}))?;
        let up = Key::from(KeyCode::Up);
        m.activate(&mut h.screen, Some(&[up]))?;
        assert_eq!(h.canvas().beeps(), 1);
        m.activate(&mut h.screen, Some(&[down(), down(), down(), down()]))?;
        assert_eq!(m.current(), (4, 1));
        assert_eq!(m.anchor(), (3, 1));
        assert_eq!(h.canvas().beeps(), 2);
        m.activate(&mut h.screen, Some(&[up, up]))?;
        assert_eq!(m.current(), (2, 1));
        assert_eq!(m.anchor(), (2, 1));
        Ok(())
    }

    #[test]
    fn paging_and_remapped_keys() -> Result<()> {
        let mut h = Harness::new(60, 30);
        let mut m = matrix(&mut h, json!({"rows": 10, "cols": 1, "vrows": 3}))?;
        m.activate(&mut h.screen, Some(&[Key::from(KeyCode::PageDown)]))?;
        assert_eq!(m.anchor(), (3, 1));
        assert_eq!(m.current(), (3, 1));
        let forward = [keys::FORWARD; 4];
        m.activate(&mut h.screen, Some(&forward))?;
        assert_eq!(m.anchor(), (8, 1));
        assert_eq!(h.canvas().beeps(), 1);
        m.activate(&mut h.screen, Some(&[keys::BACKWARD]))?;
        assert_eq!(m.anchor(), (6, 1));
        assert_eq!(m.current(), (6, 1));
        Ok(())
    }

    #[test]
    fn editing() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(
            &mut h,
            json!({"rows": 2, "cols": 2, "col_widths": [3, 4], "col_types": ["INT", "UCHAR"]}),
        )?;
        let typed: Vec<Key> = "12a34".chars().map(Key::from).collect();
        m.activate(&mut h.screen, Some(&typed))?;
        assert_eq!(m.get_cell(1, 1), Some("123"));
        assert_eq!(h.canvas().beeps(), 2);

        let mut script = vec![keys::COPY, right()];
        script.extend("ab".chars().map(Key::from));
        script.push(Key::from(KeyCode::Backspace));
        script.push(keys::PASTE);
        m.activate(&mut h.screen, Some(&script))?;
        assert_eq!(m.get_cell(1, 2), Some("123"));

        m.activate(&mut h.screen, Some(&[keys::CUT, Key::from(KeyCode::Delete)]))?;
        assert_eq!(m.get_cell(1, 2), Some(""));
        assert_eq!(h.screen.paste_buffer().get(), "123");
        assert_eq!(h.canvas().beeps(), 3);

        let out = m.activate(&mut h.screen, Some(&[Key::from(KeyCode::Enter)]))?;
        assert_eq!(
            out,
            Outcome::Confirmed(vec![
                vec!["123".to_string(), String::new()],
                vec![String::new(), String::new()],
            ])
        );
        Ok(())
    }

    #[test]
    fn paste_wider_than_the_column() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(&mut h, json!({"rows": 1, "cols": 1, "col_widths": 2}))?;
        m.activate(&mut h.screen, Some(&[keys::PASTE]))?;
        h.screen.paste_buffer().set("long");
        m.activate(&mut h.screen, Some(&[keys::PASTE]))?;
        assert_eq!(h.canvas().beeps(), 2);
        assert_eq!(m.get_cell(1, 1), Some(""));
        Ok(())
    }

    #[test]
    fn cell_access() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = matrix(&mut h, json!({"rows": 2, "cols": 2, "col_widths": 3}))?;
        assert!(m.set_cell(2, 2, "abcdef"));
        assert_eq!(m.get_cell(2, 2), Some("abc"));
        assert!(!m.set_cell(3, 1, "x"));
        assert_eq!(m.get_cell(0, 1), None);
        assert!(m.clean_cell(2, 2));
        assert_eq!(m.get_cell(2, 2), Some(""));
        m.set_cell(1, 1, "x");
        m.clean();
        assert!(m.output().iter().flatten().all(String::is_empty));
        Ok(())
    }

    #[test]
    fn rendering() -> Result<()> {
        let mut h = Harness::new(24, 9);
        let mut m = matrix(
            &mut h,
            json!({
                "rows": 2, "cols": 2, "col_widths": 3, "x": 0, "y": 0,
                "row_titles": ["a", "b"], "col_titles": ["X", "<R>Y"],
                "col_types": ["MIXED", "HMIXED"],
            }),
        )?;
        m.set_cell(1, 1, "hi");
        m.set_cell(1, 2, "pw");
        m.draw(&mut h.screen)?;
        assert_eq!(
            h.canvas().text(),
            vec![
                "┌─────────────┐         ",
                "│    X      Y │         ",
                "│   ┌───┐┌───┐│         ",
                "│ a │hi.││...││         ",
                "│   └───┘└───┘│         ",
                "│   ┌───┐┌───┐│         ",
                "│ b │...││...││         ",
                "│   └───┘└───┘│         ",
                "└─────────────┘         ",
            ]
        );
        Ok(())
    }

    #[test]
    fn failed_construction() {
        let mut h = Harness::new(20, 10);
        for opts in [
            json!({"rows": 0, "cols": 3}),
            json!({"rows": 3, "cols": 0}),
            json!({"rows": 2, "cols": 2, "col_widths": [3, 0]}),
            json!({"rows": 9, "cols": 9}),
        ] {
            assert!(matches!(matrix(&mut h, opts), Err(Error::Construct(_))));
        }
        assert_eq!(h.screen.widgets().count(), 0);
        assert!(h.canvas().regions.is_empty());
    }

    #[test]
    fn huge_dimensions_fail_without_overflow() {
        let mut h = Harness::new(20, 10);
        for opts in [
            json!({"rows": u32::MAX, "cols": 1}),
            json!({"rows": 1, "cols": 1, "col_widths": u32::MAX}),
            json!({"rows": 1, "cols": 2, "col_widths": [u32::MAX, u32::MAX]}),
        ] {
            assert!(matches!(matrix(&mut h, opts), Err(Error::Construct(_))));
        }
        assert_eq!(h.screen.widgets().count(), 0);
    }
}
