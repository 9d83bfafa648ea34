//! View transform: pan + zoom between canvas space and screen space.
//!
//!   screen = canvas * scale + offset
//!   canvas = (screen - offset) / scale
//!
//! Pans translate in screen space. Zooms rescale the whole current mapping
//! about an anchor point on screen, so a zoom also rescales earlier pans
//! (the anchor stays put, everything else moves toward or away from it).
//! Offset and scale are tracked as plain numbers and never read back from
//! what was drawn.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Cell layout of the canvas the transform maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub cell_size: u32,
    pub width: u32,
    pub height: u32,
}

impl GridGeometry {
    #[inline]
    pub fn pitch(&self) -> f64 {
        (self.cell_size + 1) as f64
    }

    /// Canvas extent in pixels, `pitch * count + 1` per axis.
    pub fn extent(&self) -> (f64, f64) {
        (self.pitch() * self.width as f64 + 1.0, self.pitch() * self.height as f64 + 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
    offset_x: f64,
    offset_y: f64,
    scale: f64,
    min_scale: f64,
    /// Scale change per unit of wheel delta. Negative: scrolling up zooms in.
    sensitivity: f64,
    geometry: GridGeometry,
}

impl ViewTransform {
    /// Identity transform. `min_scale` must be positive (checked by `Viewer::init`).
    pub fn new(geometry: GridGeometry, min_scale: f64, sensitivity: f64) -> Self {
        ViewTransform {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0_f64.max(min_scale),
            min_scale,
            sensitivity,
            geometry,
        }
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[allow(dead_code)]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.scale = 1.0_f64.max(self.min_scale);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom anchored at the screen origin.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom_at(delta, Point::ORIGIN);
    }

    /// Zoom keeping the screen point `anchor` fixed.
    pub fn zoom_at(&mut self, delta: f64, anchor: Point) {
        if !delta.is_finite() {
            return;
        }
        let next = (self.scale + delta * self.sensitivity).max(self.min_scale);
        let factor = next / self.scale;
        self.offset_x = anchor.x - (anchor.x - self.offset_x) * factor;
        self.offset_y = anchor.y - (anchor.y - self.offset_y) * factor;
        self.scale = next;
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        Point {
            x: (p.x - self.offset_x) / self.scale,
            y: (p.y - self.offset_y) / self.scale,
        }
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        Point {
            x: p.x * self.scale + self.offset_x,
            y: p.y * self.scale + self.offset_y,
        }
    }

    /// Is the screen point over the canvas (grid lines included)?
    pub fn hits_canvas(&self, p: Point) -> bool {
        let c = self.screen_to_canvas(p);
        let (w, h) = self.geometry.extent();
        c.x >= 0.0 && c.y >= 0.0 && c.x < w && c.y < h
    }

    /// `(row, col)` of the cell under a screen point, None off the grid.
    /// A point on a grid line belongs to the cell right of / below it.
    pub fn screen_to_grid(&self, p: Point) -> Option<(u32, u32)> {
        let c = self.screen_to_canvas(p);
        let pitch = self.geometry.pitch();
        let col = (c.x / pitch).floor();
        let row = (c.y / pitch).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        if col >= self.geometry.width as f64 || row >= self.geometry.height as f64 {
            return None;
        }
        Some((row as u32, col as u32))
    }

    /// Screen position of the centre of cell `(row, col)`.
    pub fn grid_to_screen(&self, row: u32, col: u32) -> Point {
        let pitch = self.geometry.pitch();
        let half = self.geometry.cell_size as f64 / 2.0;
        self.canvas_to_screen(Point {
            x: col as f64 * pitch + 1.0 + half,
            y: row as f64 * pitch + 1.0 + half,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_SCALE: f64 = 0.1;
    const SENSITIVITY: f64 = -0.01;

    fn geometry() -> GridGeometry {
        GridGeometry { cell_size: 10, width: 12, height: 9 }
    }

    fn view() -> ViewTransform {
        ViewTransform::new(geometry(), MIN_SCALE, SENSITIVITY)
    }

    fn assert_round_trip(v: &ViewTransform) {
        let g = v.geometry();
        for row in 0..g.height {
            for col in 0..g.width {
                let p = v.grid_to_screen(row, col);
                assert_eq!(
                    v.screen_to_grid(p), Some((row, col)),
                    "cell ({row},{col}) at offset {:?} scale {}", v.offset(), v.scale(),
                );
            }
        }
    }

    #[test]
    fn starts_at_identity() {
        let v = view();
        assert_eq!(v.offset(), (0.0, 0.0));
        assert_eq!(v.scale(), 1.0);
        assert_eq!(v.screen_to_grid(Point::new(12.0, 1.0)), Some((0, 1)));
    }

    #[test]
    fn round_trip_under_assorted_transforms() {
        let mut v = view();
        assert_round_trip(&v);

        v.pan_by(37.0, -120.5);
        assert_round_trip(&v);

        v.zoom_at(-250.0, Point::new(40.0, 30.0));
        assert_round_trip(&v);

        v.zoom_by(10_000.0);
        assert_eq!(v.scale(), MIN_SCALE);
        assert_round_trip(&v);

        v.pan_by(-3.25, 999.0);
        v.zoom_at(-17.0, Point::new(-5.0, 8.0));
        assert_round_trip(&v);
    }

    #[test]
    fn round_trip_with_smallest_cells_at_floor_scale() {
        let g = GridGeometry { cell_size: 1, width: 30, height: 20 };
        let mut v = ViewTransform::new(g, MIN_SCALE, SENSITIVITY);
        v.zoom_by(1_000.0);
        v.pan_by(-7.3, 2.9);
        assert_round_trip(&v);
    }

    #[test]
    fn pans_compose_by_summing() {
        let steps = [(3.0, -4.0), (10.0, 2.0), (-1.0, -1.0), (0.5, 8.25)];
        let mut stepwise = view();
        for (dx, dy) in steps {
            stepwise.pan_by(dx, dy);
        }
        let (sx, sy) = steps.iter().fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
        let mut once = view();
        once.pan_by(sx, sy);
        assert_eq!(stepwise.offset(), once.offset());

        let mut reversed = view();
        for (dx, dy) in steps.iter().rev() {
            reversed.pan_by(*dx, *dy);
        }
        assert_eq!(reversed.offset(), once.offset());
    }

    #[test]
    fn zoom_never_goes_below_floor() {
        let mut v = view();
        for _ in 0..500 {
            v.zoom_by(37.0);
            assert!(v.scale() >= MIN_SCALE);
        }
        assert_eq!(v.scale(), MIN_SCALE);
    }

    #[test]
    fn scrolling_up_zooms_in() {
        let mut v = view();
        v.zoom_by(-10.0);
        assert!((v.scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut v = view();
        v.pan_by(20.0, -6.0);
        let anchor = Point::new(64.0, 33.0);
        let before = v.screen_to_canvas(anchor);
        v.zoom_at(-80.0, anchor);
        let after = v.screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn pan_zoom_unpan_differs_from_zoom_alone() {
        let mut v = view();
        v.pan_by(50.0, 50.0);
        v.zoom_by(-10.0);
        v.pan_by(-50.0, -50.0);

        let mut z = view();
        z.zoom_by(-10.0);

        assert_eq!(v.scale(), z.scale());
        let (ox, oy) = v.offset();
        assert!((ox - 5.0).abs() < 1e-9 && (oy - 5.0).abs() < 1e-9);
        assert_ne!(v.offset(), z.offset());
        assert_round_trip(&v);
    }

    #[test]
    fn off_grid_points_map_to_none() {
        let mut v = view();
        assert_eq!(v.screen_to_grid(Point::new(-0.5, 3.0)), None);
        let (w, h) = geometry().extent();
        assert_eq!(v.screen_to_grid(Point::new(w, 3.0)), None);
        assert_eq!(v.screen_to_grid(Point::new(3.0, h)), None);
        v.pan_by(100.0, 100.0);
        assert_eq!(v.screen_to_grid(Point::new(50.0, 150.0)), None);
        assert_eq!(v.screen_to_grid(Point::new(100.0, 100.0)), Some((0, 0)));
    }

    #[test]
    fn hits_canvas_tracks_transform() {
        let mut v = view();
        assert!(v.hits_canvas(Point::new(0.0, 0.0)));
        v.pan_by(10.0, 0.0);
        assert!(!v.hits_canvas(Point::new(5.0, 5.0)));
        assert!(v.hits_canvas(Point::new(10.0, 5.0)));
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut v = view();
        v.pan_by(4.0, 4.0);
        v.zoom_by(-30.0);
        v.reset();
        assert_eq!(v.offset(), (0.0, 0.0));
        assert_eq!(v.scale(), 1.0);
    }
}
