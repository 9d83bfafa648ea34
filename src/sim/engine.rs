//! The simulation engine contract the viewer consumes.
//!
//! The viewer never looks inside an engine. It reads dimensions, borrows the
//! packed cell buffer for the length of one draw, and asks for mutations.
//! Any `&mut self` call may reallocate the buffer, which is why the buffer is
//! only ever handed out as a borrow.

pub trait Engine {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Advance one generation in place.
    fn step(&mut self);

    /// Packed per-cell state, `width * height` bytes, laid out by `index`.
    fn cells(&self) -> &[u8];

    /// Linearization of `(row, col)` into `cells()`.
    fn index(&self, row: u32, col: u32) -> usize;

    fn set_alive(&mut self, row: u32, col: u32);

    /// Reset every cell to Dead.
    fn clear(&mut self);
}
