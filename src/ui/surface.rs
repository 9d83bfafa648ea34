//! Drawing surfaces.
//!
//! `Surface` is the small 2D-canvas subset the grid renderer needs: one path
//! built from move/line commands and stroked in a single call, plus filled
//! rectangles. `PixelCanvas` rasterizes it into memory; the terminal
//! presenter samples that raster through the view transform.

use crossterm::style::Color;

pub trait Surface {
    /// Discard any pending path.
    fn begin_path(&mut self);
    fn move_to(&mut self, x: i32, y: i32);
    fn line_to(&mut self, x: i32, y: i32);
    /// Stroke every segment of the pending path, 1px wide.
    fn stroke(&mut self, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color);
}

// ── PixelCanvas ──

/// Software raster with one `Color` per pixel.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    path: Vec<((i32, i32), (i32, i32))>,
    cursor: Option<(i32, i32)>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        PixelCanvas {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
            path: Vec::with_capacity(256),
            cursor: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Pixel at `(x, y)`, or None outside the canvas.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        if self.contains(x, y) {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: Color) {
        if self.contains(x as i64, y as i64) {
            let w = self.width as usize;
            self.pixels[y as usize * w + x as usize] = color;
        }
    }

    /// Bresenham, endpoints inclusive. Off-canvas pixels are clipped.
    fn raster_line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        // line_to without a current point behaves as move_to.
        if let Some(from) = self.cursor {
            self.path.push((from, (x, y)));
        }
        self.cursor = Some((x, y));
    }

    fn stroke(&mut self, color: Color) {
        let path = std::mem::take(&mut self.path);
        for &(a, b) in &path {
            self.raster_line(a, b, color);
        }
        // Canvas semantics: the path survives a stroke until the next begin_path.
        self.path = path;
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        let stride = self.width as usize;
        for py in y0..y1 {
            let row = py as usize * stride;
            for px in x0..x1 {
                self.pixels[row + px as usize] = color;
            }
        }
    }
}
