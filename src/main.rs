//! Entry point and host loop.
//!
//! The host owns the terminal. Each iteration it drains input, hands pointer
//! and key events to the viewer in arrival order, then runs the frame
//! callback if the clock says one is due and presents the result.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::ViewerConfig;
use domain::buffer::CellView;
use sim::universe::Universe;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::scheduler::FrameClock;
use ui::viewer::Viewer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

type TerminalViewer = Viewer<Universe, FrameClock>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ViewerConfig::load();

    let universe = Universe::random(
        config.universe.width,
        config.universe.height,
        config.universe.density,
        &mut rand::thread_rng(),
    );
    let clock = FrameClock::new(Duration::from_millis(config.timing.frame_interval_ms));

    // Preconditions are checked before the terminal is touched.
    let mut viewer = match Viewer::init(universe, clock, &config) {
        Ok(v) => v,
        Err(e) => {
            log::error!("cannot start viewer: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        log::error!("terminal init failed: {e}");
        let _ = renderer.cleanup();
        std::process::exit(1);
    }

    let result = viewer_loop(&mut viewer, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        log::error!("terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("viewer error: {e}");
        std::process::exit(1);
    }

    log::debug!("final state:\n{}", viewer.engine());

    let alive = CellView::new(viewer.engine()).map_or(0, |cells| cells.alive_count());
    println!("Stopped after {} generations with {} cells alive.", viewer.generation(), alive);
}

fn viewer_loop(
    viewer: &mut TerminalViewer,
    renderer: &mut Renderer,
    config: &ViewerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new(config.view.wheel_notch);

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() || input.any_pressed(KEYS_QUIT) {
            viewer.stop();
            break;
        }
        handle_keys(viewer, &input, config);

        for &event in &input.pointer {
            viewer.handle_pointer(event);
        }

        if input.resized {
            viewer.request_redraw();
        }

        if let Some(frame) = viewer.scheduler_mut().poll(Instant::now()) {
            if viewer.on_frame(frame)? {
                renderer.render(viewer.canvas(), viewer.view(), &viewer.status())?;
            }
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];
const KEYS_PLAY: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Enter];
const KEYS_CLEAR: &[KeyCode] = &[KeyCode::Char('c'), KeyCode::Char('C')];
const KEYS_STEP: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_ZOOM_IN: &[KeyCode] = &[KeyCode::Char('+'), KeyCode::Char('=')];
const KEYS_ZOOM_OUT: &[KeyCode] = &[KeyCode::Char('-'), KeyCode::Char('_')];
const KEYS_RESET_VIEW: &[KeyCode] = &[KeyCode::Char('0')];

fn handle_keys(viewer: &mut TerminalViewer, input: &InputState, config: &ViewerConfig) {
    let step = config.view.pan_step;
    let notch = config.view.wheel_notch;

    if input.any_pressed(KEYS_PLAY) {
        viewer.toggle_play();
    }
    if input.any_pressed(KEYS_CLEAR) {
        viewer.clear();
    }
    if input.any_pressed(KEYS_STEP) {
        viewer.step_once();
    }
    if input.any_pressed(KEYS_RESET_VIEW) {
        viewer.reset_view();
    }

    // Zoom keys mirror the wheel: scroll up (negative delta) zooms in.
    if input.any_pressed(KEYS_ZOOM_IN) {
        viewer.zoom_by(-notch);
    }
    if input.any_pressed(KEYS_ZOOM_OUT) {
        viewer.zoom_by(notch);
    }

    for key in &input.keys {
        match key.code {
            KeyCode::Left => viewer.pan_by(-step, 0.0),
            KeyCode::Right => viewer.pan_by(step, 0.0),
            KeyCode::Up => viewer.pan_by(0.0, -step),
            KeyCode::Down => viewer.pan_by(0.0, step),
            _ => {}
        }
    }
}
