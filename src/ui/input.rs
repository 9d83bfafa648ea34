//! Input tracker.
//!
//! Drains every pending terminal event once per host iteration and sorts it
//! into key presses and pointer events, preserving arrival order within each.
//! Mouse positions are converted from terminal cells to screen pixels here,
//! so nothing downstream knows about the terminal grid.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::ui::controller::{Button, PointerEvent};
use crate::ui::renderer::terminal_to_screen;

pub struct InputState {
    /// Key presses (and repeats) from the most recent drain.
    pub keys: Vec<KeyEvent>,

    /// Pointer events from the most recent drain, in arrival order.
    pub pointer: Vec<PointerEvent>,

    /// Terminal was resized during the most recent drain.
    pub resized: bool,

    /// Wheel delta reported per scroll notch.
    wheel_notch: f64,
}

impl InputState {
    pub fn new(wheel_notch: f64) -> Self {
        InputState {
            keys: Vec::with_capacity(8),
            pointer: Vec::with_capacity(32),
            resized: false,
            wheel_notch,
        }
    }

    /// Read all available events without blocking.
    pub fn drain_events(&mut self) {
        self.keys.clear();
        self.pointer.clear();
        self.resized = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.keys.push(key);
                }
                Ok(Event::Mouse(mouse)) => {
                    if let Some(ev) = pointer_from_mouse(mouse, self.wheel_notch) {
                        self.pointer.push(ev);
                    }
                }
                Ok(Event::FocusLost) => self.pointer.push(PointerEvent::Leave),
                Ok(Event::Resize(..)) => self.resized = true,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("event read failed: {e}");
                    break;
                }
            }
        }
    }

    /// Was this key pressed this iteration?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.keys.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this iteration has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.keys.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

fn button_of(b: MouseButton) -> Button {
    match b {
        MouseButton::Left => Button::Primary,
        MouseButton::Right => Button::Secondary,
        MouseButton::Middle => Button::Middle,
    }
}

/// Translate one crossterm mouse event. Downs and moves outside the drawing
/// area are dropped; releases are always kept so a drag cannot get stuck.
pub fn pointer_from_mouse(mouse: MouseEvent, wheel_notch: f64) -> Option<PointerEvent> {
    let pos = terminal_to_screen(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(b) => Some(PointerEvent::Down { pos: pos?, button: button_of(b) }),
        MouseEventKind::Up(_) => Some(PointerEvent::Up),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(PointerEvent::Move { pos: pos? }),
        MouseEventKind::ScrollUp => Some(PointerEvent::Wheel { pos: pos?, delta: -wheel_notch }),
        MouseEventKind::ScrollDown => Some(PointerEvent::Wheel { pos: pos?, delta: wheel_notch }),
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => None,
    }
}
