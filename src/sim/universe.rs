//! Universe: the bundled Game of Life engine.
//!
//! ## Layout
//!
//! One byte per cell (`Cell as u8`), row-major: `index = row * width + col`.
//! Edges wrap, so the grid is a torus.
//!
//! ## Rules (B3/S23)
//!
//!   - live cell with 2 or 3 live neighbours survives
//!   - dead cell with exactly 3 live neighbours is born
//!   - everything else is dead next generation

use std::fmt;

use rand::Rng;

use crate::domain::cell::Cell;
use crate::sim::engine::Engine;

#[derive(Clone, Debug)]
pub struct Universe {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    /// Scratch buffer for the next generation, swapped in on `step`.
    next: Vec<Cell>,
}

impl Universe {
    /// All-dead universe.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Universe {
            width,
            height,
            cells: vec![Cell::Dead; len],
            next: vec![Cell::Dead; len],
        }
    }

    /// Universe with each cell alive independently with probability `density`.
    pub fn random<R: Rng + ?Sized>(width: u32, height: u32, density: f64, rng: &mut R) -> Self {
        let density = density.clamp(0.0, 1.0);
        let mut u = Universe::new(width, height);
        for cell in u.cells.iter_mut() {
            if rng.gen_bool(density) {
                *cell = Cell::Alive;
            }
        }
        u
    }

    #[allow(dead_code)]
    pub fn get(&self, row: u32, col: u32) -> Cell {
        self.cells[self.index(row, col)]
    }

    fn live_neighbour_count(&self, row: u32, col: u32) -> u8 {
        let mut count = 0;
        // height-1 / width-1 stand in for -1 under the modulo.
        for dr in [self.height - 1, 0, 1] {
            for dc in [self.width - 1, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = (row + dr) % self.height;
                let c = (col + dc) % self.width;
                count += self.cells[self.index(r, c)] as u8;
            }
        }
        count
    }
}

impl Engine for Universe {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn step(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = self.index(row, col);
                let next = match (self.cells[idx], self.live_neighbour_count(row, col)) {
                    (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive,
                    (Cell::Dead, 3) => Cell::Alive,
                    _ => Cell::Dead,
                };
                self.next[idx] = next;
            }
        }
        std::mem::swap(&mut self.cells, &mut self.next);
    }

    fn cells(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    fn set_alive(&mut self, row: u32, col: u32) {
        if row < self.height && col < self.width {
            let idx = self.index(row, col);
            self.cells[idx] = Cell::Alive;
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for line in self.cells.chunks(self.width as usize) {
            for &cell in line {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn universe_from(rows: &[&str]) -> Universe {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let mut u = Universe::new(w, h);
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch == '#' {
                    u.set_alive(r as u32, c as u32);
                }
            }
        }
        u
    }

    fn alive(u: &Universe) -> Vec<(u32, u32)> {
        let mut out = vec![];
        for r in 0..u.height() {
            for c in 0..u.width() {
                if u.get(r, c).is_alive() {
                    out.push((r, c));
                }
            }
        }
        out
    }

    #[test]
    fn blinker_oscillates() {
        let mut u = universe_from(&[
            ".....",
            "..#..",
            "..#..",
            "..#..",
            ".....",
        ]);
        u.step();
        assert_eq!(alive(&u), vec![(2, 1), (2, 2), (2, 3)]);
        u.step();
        assert_eq!(alive(&u), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn block_is_still_life() {
        let mut u = universe_from(&[
            "....",
            ".##.",
            ".##.",
            "....",
        ]);
        let before = alive(&u);
        u.step();
        assert_eq!(alive(&u), before);
    }

    #[test]
    fn empty_universe_stays_empty() {
        let mut u = Universe::new(8, 6);
        for _ in 0..5 {
            u.step();
        }
        assert!(u.cells().iter().all(|&b| b == 0));
    }

    #[test]
    fn neighbours_wrap_around_edges() {
        // Vertical blinker split across the top/bottom edge.
        let mut u = universe_from(&[
            "..#..",
            ".....",
            ".....",
            "..#..",
            "..#..",
        ]);
        u.step();
        assert_eq!(alive(&u), vec![(4, 1), (4, 2), (4, 3)]);
    }

    #[test]
    fn cells_buffer_is_row_major_bytes() {
        let mut u = Universe::new(3, 2);
        u.set_alive(1, 2);
        assert_eq!(u.cells(), &[0, 0, 0, 0, 0, 1]);
        assert_eq!(u.index(1, 2), 5);
    }

    #[test]
    fn set_alive_out_of_range_is_ignored() {
        let mut u = Universe::new(3, 2);
        u.set_alive(2, 0);
        u.set_alive(0, 3);
        assert!(u.cells().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_kills_everything() {
        let mut u = universe_from(&["##", "##"]);
        u.clear();
        assert!(alive(&u).is_empty());
    }

    #[test]
    fn random_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let full = Universe::random(4, 4, 1.0, &mut rng);
        assert_eq!(alive(&full).len(), 16);
        let empty = Universe::random(4, 4, 0.0, &mut rng);
        assert!(alive(&empty).is_empty());
    }

    #[test]
    fn display_renders_one_line_per_row() {
        let u = universe_from(&["#.", ".#"]);
        assert_eq!(u.to_string(), "◼◻\n◻◼\n");
    }
}
