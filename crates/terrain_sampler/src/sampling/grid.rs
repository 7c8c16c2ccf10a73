//! Spatial hash grid over accepted samples.
//!
//! The cell size is `radius / √2`, so a cell holds at most one sample and every
//! sample closer than `radius` to a point lies in the 5x5 block of cells around it.
use glam::Vec2;

use crate::error::{Error, Result};

/// Half-width of the neighborhood block searched around a cell.
pub const NEIGHBORHOOD: usize = 2;

/// Upper bound on the number of cells a grid may allocate.
pub const MAX_CELLS: usize = 1 << 26;

/// Dense grid storing `sample index + 1` per cell, `0` for empty.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<u32>,
}

impl SpatialGrid {
    /// Allocate an empty grid covering `extent` for samples at least `radius` apart.
    ///
    /// Fails with [`Error::InvalidArgument`] if the grid would need more than
    /// [`MAX_CELLS`] cells.
    pub fn new(extent: Vec2, radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "grid radius must be > 0, got {radius}"
            )));
        }
        let cell_size = radius / std::f32::consts::SQRT_2;
        let cols = cells_along(extent.x, cell_size)?;
        let rows = cells_along(extent.y, cell_size)?;
        let count = cols
            .checked_mul(rows)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or_else(|| too_many_cells(extent, radius))?;
        Ok(Self {
            cell_size,
            cols,
            rows,
            cells: vec![0; count],
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid dimensions `(cols, rows)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Cell containing `point`, clamped to the grid.
    #[inline]
    pub fn cell_of(&self, point: Vec2) -> (usize, usize) {
        let x = ((point.x / self.cell_size) as isize).clamp(0, self.cols as isize - 1) as usize;
        let y = ((point.y / self.cell_size) as isize).clamp(0, self.rows as isize - 1) as usize;
        (x, y)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Sample index stored in the cell containing `point`.
    pub fn get(&self, point: Vec2) -> Option<usize> {
        let (x, y) = self.cell_of(point);
        match self.cells[self.index(x, y)] {
            0 => None,
            slot => Some(slot as usize - 1),
        }
    }

    /// Record that sample `index` lives at `point`.
    pub fn insert(&mut self, point: Vec2, index: usize) {
        let (x, y) = self.cell_of(point);
        let idx = self.index(x, y);
        self.cells[idx] = index as u32 + 1;
    }

    /// Indices of samples stored in the 5x5 block around `point`'s cell.
    pub fn neighbors(&self, point: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(point);
        let start_x = cx.saturating_sub(NEIGHBORHOOD);
        let end_x = (cx + NEIGHBORHOOD + 1).min(self.cols);
        let start_y = cy.saturating_sub(NEIGHBORHOOD);
        let end_y = (cy + NEIGHBORHOOD + 1).min(self.rows);

        (start_y..end_y).flat_map(move |y| {
            (start_x..end_x).filter_map(move |x| match self.cells[self.index(x, y)] {
                0 => None,
                slot => Some(slot as usize - 1),
            })
        })
    }
}

fn cells_along(length: f32, cell_size: f32) -> Result<usize> {
    let n = (length / cell_size).ceil();
    if !n.is_finite() || n > MAX_CELLS as f32 {
        return Err(Error::InvalidArgument(format!(
            "{length} units at cell size {cell_size} exceed {MAX_CELLS} cells"
        )));
    }
    Ok((n as usize).max(1))
}

fn too_many_cells(extent: Vec2, radius: f32) -> Error {
    Error::InvalidArgument(format!(
        "extent {}x{} with radius {radius} needs more than {MAX_CELLS} grid cells",
        extent.x, extent.y
    ))
}
