//! Viewer: the one context object that ties engine, view and loop together.
//!
//! Every piece of mutable UI state (transform, gesture, play flag, pending
//! frame) lives here and is reached through `&mut self`, so a handler always
//! finishes its mutation before it asks for a redraw. The host owns the
//! terminal; the viewer only knows the `FrameScheduler` seam.

use crate::config::ViewerConfig;
use crate::domain::buffer::CellView;
use crate::error::ViewerError;
use crate::sim::engine::Engine;
use crate::ui::animation::{AnimationLoop, FrameOutcome};
use crate::ui::controller::{InteractionController, PointerEvent, Response};
use crate::ui::grid::GridRenderer;
use crate::ui::scheduler::{FrameHandle, FrameScheduler};
use crate::ui::surface::PixelCanvas;
use crate::ui::view::{GridGeometry, ViewTransform};

/// Snapshot for the status line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Status {
    pub playing: bool,
    pub generation: u64,
    pub alive: usize,
    pub scale: f64,
    pub offset: (f64, f64),
}

pub struct Viewer<E: Engine, S: FrameScheduler> {
    engine: E,
    scheduler: S,
    view: ViewTransform,
    controller: InteractionController,
    animation: AnimationLoop,
    grid: GridRenderer,
    canvas: PixelCanvas,
    generation: u64,
    alive: usize,
}

impl<E: Engine, S: FrameScheduler> Viewer<E, S> {
    /// Validate the engine against the view settings, size the canvas and
    /// book the first frame. Nothing is drawn if this fails.
    pub fn init(engine: E, mut scheduler: S, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let (width, height) = (engine.width(), engine.height());
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidDimensions { width, height });
        }
        let settings = &config.view;
        if settings.cell_size == 0 {
            return Err(ViewerError::InvalidCellSize(settings.cell_size));
        }
        if !(settings.min_scale.is_finite() && settings.min_scale > 0.0) {
            return Err(ViewerError::InvalidScale(settings.min_scale));
        }
        let alive = CellView::new(&engine)?.alive_count();

        let geometry = GridGeometry { cell_size: settings.cell_size, width, height };
        let grid = GridRenderer::new(settings.cell_size, config.palette);
        let (cw, ch) = grid.canvas_size(width, height).ok_or(ViewerError::CanvasTooLarge {
            cell_size: settings.cell_size,
            width,
            height,
        })?;
        let canvas = PixelCanvas::new(cw, ch, config.palette.grid);
        let view = ViewTransform::new(geometry, settings.min_scale, settings.zoom_sensitivity);

        let mut animation = AnimationLoop::new(config.timing.start_playing);
        animation.request_redraw(&mut scheduler);

        log::info!(
            "viewer ready: {width}x{height} cells, canvas {cw}x{ch}px, {}",
            if animation.is_playing() { "playing" } else { "paused" },
        );

        Ok(Viewer {
            engine,
            scheduler,
            view,
            controller: InteractionController::new(),
            animation,
            grid,
            canvas,
            generation: 0,
            alive,
        })
    }

    // ── Accessors ──

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[allow(dead_code)]
    pub fn is_playing(&self) -> bool {
        self.animation.is_playing()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> Status {
        Status {
            playing: self.animation.is_playing(),
            generation: self.generation,
            alive: self.alive,
            scale: self.view.scale(),
            offset: self.view.offset(),
        }
    }

    // ── Input ──

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Response {
        let response = self.controller.handle(event, &mut self.view, &mut self.engine);
        if response == Response::Redraw {
            self.animation.request_redraw(&mut self.scheduler);
        }
        response
    }

    pub fn toggle_play(&mut self) -> bool {
        let playing = self.animation.toggle(&mut self.scheduler);
        log::debug!("play toggled: {playing}");
        playing
    }

    /// Kill every cell and restart the generation count.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.generation = 0;
        self.animation.request_redraw(&mut self.scheduler);
    }

    /// Advance one generation by hand. Only while paused.
    pub fn step_once(&mut self) {
        if self.animation.is_playing() {
            return;
        }
        self.engine.step();
        self.generation += 1;
        self.animation.request_redraw(&mut self.scheduler);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view.pan_by(dx, dy);
        self.animation.request_redraw(&mut self.scheduler);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.view.zoom_by(delta);
        self.animation.request_redraw(&mut self.scheduler);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.animation.request_redraw(&mut self.scheduler);
    }

    /// Force a repaint, e.g. after the host surface was resized.
    pub fn request_redraw(&mut self) {
        self.animation.request_redraw(&mut self.scheduler);
    }

    pub fn stop(&mut self) {
        self.animation.stop(&mut self.scheduler);
    }

    // ── Frame ──

    /// Run the frame callback for `handle`. Returns whether the canvas was
    /// redrawn, i.e. whether the host should present it.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<bool, ViewerError> {
        let Viewer { engine, scheduler, animation, grid, canvas, alive, .. } = self;
        let outcome = animation.on_frame(handle, engine, scheduler, |e| {
            let cells = CellView::new(e)?;
            grid.draw(canvas, &cells);
            *alive = cells.alive_count();
            Ok(())
        })?;
        match outcome {
            FrameOutcome::Stepped => {
                self.generation += 1;
                log::trace!("frame drawn, stepped to generation {}", self.generation);
                Ok(true)
            }
            FrameOutcome::Drawn => Ok(true),
            FrameOutcome::Stale => {
                log::debug!("ignored stale frame {:?}", handle);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::universe::Universe;
    use crate::ui::controller::Button;
    use crate::ui::scheduler::ManualScheduler;
    use crate::ui::view::Point;

    fn config(cell_size: u32) -> ViewerConfig {
        let mut cfg = ViewerConfig::default();
        cfg.view.cell_size = cell_size;
        cfg
    }

    fn viewer(w: u32, h: u32) -> Viewer<Universe, ManualScheduler> {
        Viewer::init(Universe::new(w, h), ManualScheduler::default(), &config(10)).unwrap()
    }

    fn run_pending(v: &mut Viewer<Universe, ManualScheduler>) -> usize {
        let mut frames = 0;
        while let Some(h) = v.scheduler_mut().fire() {
            v.on_frame(h).unwrap();
            frames += 1;
            if frames > 1000 {
                break;
            }
        }
        frames
    }

    #[test]
    fn init_books_first_frame_and_sizes_canvas() {
        let mut v = viewer(100, 50);
        assert_eq!((v.canvas().width(), v.canvas().height()), (1101, 551));
        assert_eq!(v.scheduler_mut().queue.len(), 1);
        assert_eq!(run_pending(&mut v), 1);
        assert_eq!(v.generation(), 0);
    }

    #[test]
    fn init_rejects_bad_preconditions() {
        let err = Viewer::init(Universe::new(0, 5), ManualScheduler::default(), &config(10));
        assert!(matches!(err, Err(ViewerError::InvalidDimensions { width: 0, height: 5 })));

        let err = Viewer::init(Universe::new(4, 4), ManualScheduler::default(), &config(0));
        assert!(matches!(err, Err(ViewerError::InvalidCellSize(0))));

        let mut cfg = config(4);
        cfg.view.min_scale = 0.0;
        let err = Viewer::init(Universe::new(4, 4), ManualScheduler::default(), &cfg);
        assert!(matches!(err, Err(ViewerError::InvalidScale(_))));
    }

    #[test]
    fn init_rejects_sizes_that_overflow_the_canvas() {
        let err = Viewer::init(Universe::new(4, 4), ManualScheduler::default(), &config(u32::MAX));
        assert!(matches!(err, Err(ViewerError::CanvasTooLarge { cell_size: u32::MAX, .. })));

        let err = Viewer::init(Universe::new(70_000, 1), ManualScheduler::default(), &config(70_000));
        assert!(matches!(err, Err(ViewerError::CanvasTooLarge { width: 70_000, height: 1, .. })));

        // Both sides fit in i32 but the raster would be ~480M pixels.
        let err = Viewer::init(Universe::new(2_000, 2_000), ManualScheduler::default(), &config(10));
        assert!(matches!(err, Err(ViewerError::CanvasTooLarge { .. })));
    }

    #[test]
    fn paused_drag_paints_cells_without_stepping() {
        let mut v = viewer(8, 8);
        run_pending(&mut v);

        // Cell (r, 0) centre at y = r * 11 + 6.
        let mut redraws = 0;
        let events = [
            PointerEvent::Down { pos: Point::new(6.0, 6.0), button: Button::Primary },
            PointerEvent::Move { pos: Point::new(6.0, 17.0) },
            PointerEvent::Move { pos: Point::new(6.0, 28.0) },
        ];
        for ev in events {
            if v.handle_pointer(ev) == Response::Redraw {
                redraws += 1;
            }
        }
        assert_eq!(redraws, 3);
        assert_eq!(v.scheduler_mut().queue.len(), 1);
        assert_eq!(run_pending(&mut v), 1);

        let painted: Vec<bool> = (0..4).map(|r| v.engine().get(r, 0).is_alive()).collect();
        assert_eq!(painted, vec![true, true, true, false]);
        assert_eq!(v.generation(), 0);
        assert_eq!(v.status().alive, 3);

        let alive = crate::ui::grid::Palette::default().alive;
        assert_eq!(v.canvas().pixel(5, 27), Some(alive));
    }

    #[test]
    fn playing_an_empty_universe_keeps_one_frame_in_flight() {
        let mut v = viewer(10, 10);
        v.toggle_play();
        v.toggle_play();
        v.toggle_play();
        for _ in 0..30 {
            assert_eq!(v.scheduler_mut().queue.len(), 1);
            let h = v.scheduler_mut().fire().unwrap();
            assert!(v.on_frame(h).unwrap());
        }
        assert!(v.engine().cells().iter().all(|&b| b == 0));
        assert_eq!(v.generation(), 30);

        v.toggle_play();
        assert_eq!(run_pending(&mut v), 1);
        assert_eq!(v.generation(), 30);
    }

    #[test]
    fn pan_and_zoom_request_redraw_while_paused() {
        let mut v = viewer(6, 6);
        run_pending(&mut v);
        v.handle_pointer(PointerEvent::Wheel { pos: Point::ORIGIN, delta: -10.0 });
        assert_eq!(v.scheduler_mut().queue.len(), 1);
        run_pending(&mut v);
        v.pan_by(3.0, 0.0);
        assert_eq!(v.scheduler_mut().queue.len(), 1);
        assert_eq!(v.status().offset, (3.0, 0.0));
    }

    #[test]
    fn clear_resets_cells_and_generation_but_not_view() {
        let mut v = viewer(6, 6);
        v.pan_by(12.0, -4.0);
        v.handle_pointer(PointerEvent::Down { pos: Point::new(20.0, 2.0), button: Button::Primary });
        v.step_once();
        assert_eq!(v.generation(), 1);
        v.clear();
        run_pending(&mut v);
        assert_eq!(v.generation(), 0);
        assert_eq!(v.status().alive, 0);
        assert_eq!(v.view().offset(), (12.0, -4.0));
    }

    #[test]
    fn step_once_is_ignored_while_playing() {
        let mut v = viewer(6, 6);
        v.toggle_play();
        v.step_once();
        assert_eq!(v.generation(), 0);
    }

    #[test]
    fn stop_leaves_nothing_pending() {
        let mut v = viewer(6, 6);
        v.toggle_play();
        v.stop();
        assert!(!v.is_playing());
        assert!(v.scheduler_mut().queue.is_empty());
    }
}
