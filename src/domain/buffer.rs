//! Cell buffer decoder: a zero-copy 2D view over an engine's packed buffer.
//!
//! `CellView` borrows the engine immutably, so the borrow checker forbids any
//! tick, clear or edit while a view is alive. Build one per draw and drop it
//! when the draw returns.

use crate::domain::cell::Cell;
use crate::error::ViewerError;
use crate::sim::engine::Engine;

pub struct CellView<'a, E: Engine + ?Sized> {
    engine: &'a E,
    cells: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a, E: Engine + ?Sized> CellView<'a, E> {
    /// Fails when the buffer length disagrees with `width * height`.
    pub fn new(engine: &'a E) -> Result<Self, ViewerError> {
        let width = engine.width();
        let height = engine.height();
        let cells = engine.cells();
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(ViewerError::BufferLength { expected, actual: cells.len() });
        }
        Ok(CellView { engine, cells, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// State of `(row, col)`. Out-of-range coordinates are a caller bug.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> Cell {
        debug_assert!(row < self.height && col < self.width);
        Cell::from_byte(self.cells[self.engine.index(row, col)])
    }

    /// Row-major walk over the logical grid, independent of the engine's layout.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Cell)> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).map(move |col| (row, col, self.get(row, col)))
        })
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b != 0).count()
    }
}
