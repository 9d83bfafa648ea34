//! Frame scheduling.
//!
//! The animation loop never sleeps or spins; it asks a `FrameScheduler` for
//! the next frame and is called back with the matching handle. The terminal
//! host uses `FrameClock`, which paces frames on a fixed interval and is
//! polled from the main loop. Tests drive frames by hand.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler {
    /// Ask for one future frame callback.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a frame that has not fired yet. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

// ── FrameClock ──

/// Fixed-interval scheduler for the terminal host.
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: Option<FrameHandle>,
    last_fired: Option<Instant>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        FrameClock { interval, next_id: 0, pending: None, last_fired: None }
    }

    /// Hand out the pending frame once its slot has come.
    /// Frames are at least `interval` apart; the first fires immediately.
    pub fn poll(&mut self, now: Instant) -> Option<FrameHandle> {
        let handle = self.pending?;
        let due = match self.last_fired {
            Some(t) => now.duration_since(t) >= self.interval,
            None => true,
        };
        if !due {
            return None;
        }
        self.pending = None;
        self.last_fired = Some(now);
        Some(handle)
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        if let Some(old) = self.pending {
            log::warn!("frame {:?} replaced before it fired", old);
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

// ── ManualScheduler ──

/// Deterministic scheduler: frames fire only when the test says so.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualScheduler {
    next_id: u64,
    pub queue: Vec<FrameHandle>,
    pub requested: usize,
    pub cancelled: usize,
}

#[cfg(test)]
impl ManualScheduler {
    /// Pop the oldest pending frame.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.queue.is_empty() { None } else { Some(self.queue.remove(0)) }
    }
}

#[cfg(test)]
impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let h = FrameHandle(self.next_id);
        self.queue.push(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queue.len();
        self.queue.retain(|h| *h != handle);
        self.cancelled += before - self.queue.len();
    }
}
