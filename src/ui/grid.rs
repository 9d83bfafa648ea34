//! Grid renderer: draws one frame of the universe onto a `Surface`.
//!
//! Layout along each axis, with `pitch = cell_size + 1`:
//!
//!   line at 0 | cell 0 fill [1, cell_size] | line at pitch | cell 1 ...
//!
//! so `n` cells need `pitch * n + 1` pixels and the last line lands on the
//! last pixel. Renderer and `ViewTransform::screen_to_grid` both derive
//! positions from `pitch`; keep them in step.

use crossterm::style::Color;

use crate::domain::buffer::CellView;
use crate::sim::engine::Engine;
use crate::ui::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub grid: Color,
    pub dead: Color,
    pub alive: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            grid: Color::Rgb { r: 0xCC, g: 0xCC, b: 0xCC },
            dead: Color::Rgb { r: 0xFF, g: 0xFF, b: 0xFF },
            alive: Color::Rgb { r: 0x00, g: 0x00, b: 0x00 },
        }
    }
}

/// Largest canvas, in pixels, a viewer will allocate.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 24;

/// Canvas pixel extent for `count` cells along one axis.
/// None when it does not fit the `i32` drawing coordinates.
pub fn canvas_extent(cell_size: u32, count: u32) -> Option<u32> {
    let extent = cell_size.checked_add(1)?.checked_mul(count)?.checked_add(1)?;
    i32::try_from(extent).ok()?;
    Some(extent)
}

pub struct GridRenderer {
    cell_size: u32,
    palette: Palette,
}

impl GridRenderer {
    pub fn new(cell_size: u32, palette: Palette) -> Self {
        GridRenderer { cell_size, palette }
    }

    fn pitch(&self) -> i32 {
        i32::try_from(self.cell_size).map_or(i32::MAX, |c| c.saturating_add(1))
    }

    /// `(width, height)` in pixels of the canvas this renderer draws into,
    /// or None if either side or the pixel count is too large.
    pub fn canvas_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let w = canvas_extent(self.cell_size, width)?;
        let h = canvas_extent(self.cell_size, height)?;
        (w as u64 * h as u64 <= MAX_CANVAS_PIXELS).then_some((w, h))
    }

    pub fn draw<E, S>(&self, surface: &mut S, cells: &CellView<'_, E>)
    where
        E: Engine + ?Sized,
        S: Surface + ?Sized,
    {
        self.draw_grid(surface, cells.width(), cells.height());
        self.draw_cells(surface, cells);
    }

    /// All lines go into one path and one stroke.
    fn draw_grid<S: Surface + ?Sized>(&self, surface: &mut S, width: u32, height: u32) {
        let pitch = self.pitch();
        let at = |n: u32| i32::try_from(n).unwrap_or(i32::MAX).saturating_mul(pitch);
        let (right, bottom) = (at(width), at(height));

        surface.begin_path();

        // Vertical lines.
        for col in 0..=width {
            surface.move_to(at(col), 0);
            surface.line_to(at(col), bottom);
        }

        // Horizontal lines.
        for row in 0..=height {
            surface.move_to(0, at(row));
            surface.line_to(right, at(row));
        }

        surface.stroke(self.palette.grid);
    }

    fn draw_cells<E, S>(&self, surface: &mut S, cells: &CellView<'_, E>)
    where
        E: Engine + ?Sized,
        S: Surface + ?Sized,
    {
        let pitch = self.pitch();
        let at = |n: u32| i32::try_from(n).unwrap_or(i32::MAX).saturating_mul(pitch).saturating_add(1);
        for (row, col, cell) in cells.iter() {
            let color = if cell.is_alive() { self.palette.alive } else { self.palette.dead };
            surface.fill_rect(
                at(col),
                at(row),
                self.cell_size,
                self.cell_size,
                color,
            );
        }
    }
}
