//! Interaction controller: pointer and wheel events → pan, zoom or paint.
//!
//! Exactly one gesture is active at a time:
//!
//!   Idle ──down (primary, over canvas)──▶ Painting ──up/leave──▶ Idle
//!   Idle ──down (elsewhere, or secondary/middle)──▶ Panning ──up/leave──▶ Idle
//!
//! A down while a gesture is already running is ignored, so one physical
//! drag can never both pan and paint. Wheel events zoom in every state and
//! leave the gesture alone. Events must be fed in arrival order; pan deltas
//! are taken between consecutive moves.

use crate::sim::engine::Engine;
use crate::ui::view::{Point, ViewTransform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

/// Pointer input in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pos: Point, button: Button },
    Move { pos: Point },
    Up,
    /// Pointer left the viewer (terminal focus lost).
    Leave,
    /// `delta` follows the wheel convention: negative scrolls up.
    Wheel { pos: Point, delta: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    None,
    Panning { last: Point },
    /// `last_cell` is the most recently painted cell, if any.
    Painting { last_cell: Option<(u32, u32)> },
}

/// What the host must do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Redraw,
}

pub struct InteractionController {
    gesture: Gesture,
}

impl InteractionController {
    pub fn new() -> Self {
        InteractionController { gesture: Gesture::None }
    }

    #[allow(dead_code)]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn handle<E: Engine + ?Sized>(
        &mut self,
        event: PointerEvent,
        view: &mut ViewTransform,
        engine: &mut E,
    ) -> Response {
        match (event, self.gesture) {
            (PointerEvent::Wheel { pos, delta }, _) => {
                view.zoom_at(delta, pos);
                log::trace!("zoom {delta} at ({}, {}) -> scale {:.3}", pos.x, pos.y, view.scale());
                Response::Redraw
            }

            (PointerEvent::Down { pos, button }, Gesture::None) => {
                if button == Button::Primary && view.hits_canvas(pos) {
                    self.gesture = Gesture::Painting { last_cell: None };
                    self.paint_at(pos, view, engine)
                } else {
                    self.gesture = Gesture::Panning { last: pos };
                    Response::Ignored
                }
            }
            (PointerEvent::Down { .. }, _) => Response::Ignored,

            (PointerEvent::Move { pos }, Gesture::Panning { last }) => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                self.gesture = Gesture::Panning { last: pos };
                if dx == 0.0 && dy == 0.0 {
                    return Response::Ignored;
                }
                view.pan_by(dx, dy);
                Response::Redraw
            }
            (PointerEvent::Move { pos }, Gesture::Painting { .. }) => self.paint_at(pos, view, engine),
            (PointerEvent::Move { .. }, Gesture::None) => Response::Ignored,

            (PointerEvent::Up, _) | (PointerEvent::Leave, _) => {
                self.gesture = Gesture::None;
                Response::Ignored
            }
        }
    }

    /// Set the cell under `pos` alive unless it was the last one painted.
    /// Cells between the previous sample and this one are painted too, so a
    /// fast or zoomed-out drag leaves no gaps.
    fn paint_at<E: Engine + ?Sized>(
        &mut self,
        pos: Point,
        view: &ViewTransform,
        engine: &mut E,
    ) -> Response {
        let Gesture::Painting { last_cell } = self.gesture else {
            return Response::Ignored;
        };
        match view.screen_to_grid(pos) {
            Some(cell) if last_cell == Some(cell) => Response::Ignored,
            Some(cell) => {
                match last_cell {
                    Some(from) => grid_line(from, cell).for_each(|(r, c)| engine.set_alive(r, c)),
                    None => engine.set_alive(cell.0, cell.1),
                }
                self.gesture = Gesture::Painting { last_cell: Some(cell) };
                log::debug!("painted up to cell {:?}", cell);
                Response::Redraw
            }
            None => {
                // Off the grid: the stroke restarts where the pointer comes back.
                self.gesture = Gesture::Painting { last_cell: None };
                Response::Ignored
            }
        }
    }
}

/// `(row, col)` cells on the line from `from` to `to`, excluding `from`.
fn grid_line(from: (u32, u32), to: (u32, u32)) -> impl Iterator<Item = (u32, u32)> {
    let (r1, c1) = (to.0 as i64, to.1 as i64);
    let (mut r, mut c) = (from.0 as i64, from.1 as i64);
    let dc = (c1 - c).abs();
    let dr = -(r1 - r).abs();
    let sc = if c < c1 { 1 } else { -1 };
    let sr = if r < r1 { 1 } else { -1 };
    let mut err = dc + dr;
    std::iter::from_fn(move || {
        if (r, c) == (r1, c1) {
            return None;
        }
        let e2 = 2 * err;
        if e2 >= dr {
            err += dr;
            c += sc;
        }
        if e2 <= dc {
            err += dc;
            r += sr;
        }
        Some((r as u32, c as u32))
    })
}
