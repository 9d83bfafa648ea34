//! Animation loop: draw, maybe step, maybe reschedule.
//!
//! Each frame draws the current state first, then (while playing) advances
//! the engine one generation and books the next frame. A paused loop draws
//! once and goes quiet; redraws after that come from `request_redraw`.
//!
//! At most one frame is ever pending, so toggling play repeatedly cannot
//! start a second loop. Pausing takes effect when the pending frame runs.

use crate::error::ViewerError;
use crate::sim::engine::Engine;
use crate::ui::scheduler::{FrameHandle, FrameScheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Drew and advanced one generation.
    Stepped,
    /// Drew only (paused).
    Drawn,
    /// Handle was not the pending frame; nothing done.
    Stale,
}

pub struct AnimationLoop {
    playing: bool,
    pending: Option<FrameHandle>,
}

impl AnimationLoop {
    pub fn new(playing: bool) -> Self {
        AnimationLoop { playing, pending: None }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[allow(dead_code)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Book a frame unless one is already booked.
    pub fn request_redraw<S: FrameScheduler + ?Sized>(&mut self, sched: &mut S) {
        if self.pending.is_none() {
            self.pending = Some(sched.request_frame());
        }
    }

    pub fn set_playing<S: FrameScheduler + ?Sized>(&mut self, playing: bool, sched: &mut S) {
        self.playing = playing;
        // Also when pausing: the frame that observes the pause repaints the HUD.
        self.request_redraw(sched);
    }

    /// Flip play/pause. Returns the new state.
    pub fn toggle<S: FrameScheduler + ?Sized>(&mut self, sched: &mut S) -> bool {
        self.set_playing(!self.playing, sched);
        self.playing
    }

    /// Pause and withdraw any pending frame.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, sched: &mut S) {
        self.playing = false;
        if let Some(h) = self.pending.take() {
            sched.cancel_frame(h);
        }
    }

    /// Frame callback. `draw` sees the engine read-only; the step happens
    /// after it returns.
    pub fn on_frame<E, S, F>(
        &mut self,
        handle: FrameHandle,
        engine: &mut E,
        sched: &mut S,
        draw: F,
    ) -> Result<FrameOutcome, ViewerError>
    where
        E: Engine + ?Sized,
        S: FrameScheduler + ?Sized,
        F: FnOnce(&E) -> Result<(), ViewerError>,
    {
        if self.pending != Some(handle) {
            return Ok(FrameOutcome::Stale);
        }
        self.pending = None;

        draw(&*engine)?;

        if !self.playing {
            return Ok(FrameOutcome::Drawn);
        }
        engine.step();
        self.request_redraw(sched);
        Ok(FrameOutcome::Stepped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::universe::Universe;
    use crate::ui::scheduler::ManualScheduler;

    fn run_frame(
        lp: &mut AnimationLoop,
        u: &mut Universe,
        s: &mut ManualScheduler,
        draws: &mut usize,
    ) -> Option<FrameOutcome> {
        let h = s.fire()?;
        Some(lp.on_frame(h, u, s, |_| { *draws += 1; Ok(()) }).unwrap())
    }

    #[test]
    fn paused_loop_draws_once_and_stops() {
        let mut lp = AnimationLoop::new(false);
        let mut s = ManualScheduler::default();
        let mut u = Universe::new(4, 4);
        let mut draws = 0;
        lp.request_redraw(&mut s);
        assert_eq!(run_frame(&mut lp, &mut u, &mut s, &mut draws), Some(FrameOutcome::Drawn));
        assert_eq!(run_frame(&mut lp, &mut u, &mut s, &mut draws), None);
        assert_eq!(draws, 1);
        assert!(!lp.is_pending());
    }

    #[test]
    fn playing_empty_universe_stays_dead_and_keeps_one_frame_booked() {
        let mut lp = AnimationLoop::new(false);
        let mut s = ManualScheduler::default();
        let mut u = Universe::new(6, 5);
        let mut draws = 0;
        lp.toggle(&mut s);
        for _ in 0..20 {
            assert_eq!(s.queue.len(), 1);
            assert_eq!(run_frame(&mut lp, &mut u, &mut s, &mut draws), Some(FrameOutcome::Stepped));
            assert!(u.cells().iter().all(|&b| b == 0));
        }
        assert_eq!(draws, 20);

        lp.toggle(&mut s);
        assert_eq!(run_frame(&mut lp, &mut u, &mut s, &mut draws), Some(FrameOutcome::Drawn));
        assert!(s.queue.is_empty());
    }

    #[test]
    fn repeated_play_toggles_never_double_book() {
        let mut lp = AnimationLoop::new(false);
        let mut s = ManualScheduler::default();
        for _ in 0..5 {
            lp.set_playing(true, &mut s);
        }
        lp.request_redraw(&mut s);
        assert_eq!(s.queue.len(), 1);
        assert_eq!(s.requested, 1);
    }

    #[test]
    fn pause_is_seen_by_the_pending_frame() {
        let mut lp = AnimationLoop::new(true);
        let mut s = ManualScheduler::default();
        let mut u = Universe::new(5, 5);
        u.set_alive(2, 1);
        u.set_alive(2, 2);
        u.set_alive(2, 3);
        let mut draws = 0;
        lp.request_redraw(&mut s);
        lp.set_playing(false, &mut s);
        assert_eq!(run_frame(&mut lp, &mut u, &mut s, &mut draws), Some(FrameOutcome::Drawn));
        // No step happened: blinker still horizontal.
        assert!(u.get(2, 1).is_alive());
        assert!(!u.get(1, 2).is_alive());
    }

    #[test]
    fn draw_happens_before_step() {
        let mut lp = AnimationLoop::new(true);
        let mut s = ManualScheduler::default();
        let mut u = Universe::new(5, 5);
        u.set_alive(2, 1);
        u.set_alive(2, 2);
        u.set_alive(2, 3);
        lp.request_redraw(&mut s);
        let h = s.fire().unwrap();
        let mut seen_horizontal = false;
        lp.on_frame(h, &mut u, &mut s, |e| {
            seen_horizontal = e.cells()[e.index(2, 1)] == 1;
            Ok(())
        }).unwrap();
        assert!(seen_horizontal);
        assert!(u.get(1, 2).is_alive());
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let mut lp = AnimationLoop::new(true);
        let mut s = ManualScheduler::default();
        lp.request_redraw(&mut s);
        lp.stop(&mut s);
        assert!(!lp.is_playing());
        assert!(!lp.is_pending());
        assert_eq!(s.cancelled, 1);
        assert!(s.queue.is_empty());
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut lp = AnimationLoop::new(true);
        let mut s = ManualScheduler::default();
        let mut u = Universe::new(3, 3);
        let stale = s.request_frame();
        lp.request_redraw(&mut s);
        let out = lp.on_frame(stale, &mut u, &mut s, |_| Ok(())).unwrap();
        assert_eq!(out, FrameOutcome::Stale);
        assert!(lp.is_pending());
    }
}
