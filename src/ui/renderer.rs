//! Terminal presenter.
//!
//! A frame is composed into an in-memory glyph grid, then compared with the
//! grid that is already on screen; only differing glyphs are written, all
//! through `queue!` and one flush.
//!
//! The drawing area shows the pixel canvas through the view transform. Each
//! terminal cell is two screen pixels stacked vertically, drawn as an upper
//! half block with fg = top pixel and bg = bottom pixel.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::ui::surface::PixelCanvas;
use crate::ui::view::{Point, ViewTransform};
use crate::ui::viewer::Status;

/// First terminal row of the drawing area (row 0 is the status line).
pub const MAP_ROW: u16 = 1;

const UPPER_HALF: char = '▀';

/// Around and behind the canvas. Screen clears use it as well.
const BACKDROP: Color = Color::Rgb { r: 22, g: 22, b: 35 };

const HELP: &str =
    " space play/pause  n step  c clear  drag paint  right-drag pan  wheel/+/- zoom  arrows pan  0 reset  q quit";

/// Screen pixel under the centre of a terminal cell, None above the drawing area.
pub fn terminal_to_screen(column: u16, row: u16) -> Option<Point> {
    let r = row.checked_sub(MAP_ROW)?;
    Some(Point::new(column as f64 + 0.5, r as f64 * 2.0 + 1.0))
}

// ── Glyphs ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const EMPTY: Glyph = Glyph { ch: ' ', fg: Color::White, bg: BACKDROP };

    /// Never composed; a grid filled with it differs everywhere.
    const STALE: Glyph = Glyph { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };
}

struct GlyphGrid {
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
}

impl GlyphGrid {
    fn new() -> Self {
        GlyphGrid { width: 0, height: 0, glyphs: Vec::new() }
    }

    fn reshape(&mut self, width: usize, height: usize, fill: Glyph) {
        self.width = width;
        self.height = height;
        self.glyphs.clear();
        self.glyphs.resize(width * height, fill);
    }

    fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x]
        } else {
            Glyph::EMPTY
        }
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x] = glyph;
        }
    }

    /// One column per char; whatever runs past the right edge is dropped.
    fn text(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().take(self.width.saturating_sub(x)).enumerate() {
            self.set(x + i, y, Glyph { ch, fg, bg });
        }
    }

    fn band(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph { ch: ' ', fg: Color::White, bg });
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    out: BufWriter<io::Stdout>,
    /// Frame being composed.
    next: GlyphGrid,
    /// What the terminal currently shows.
    shown: GlyphGrid,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::with_capacity(16384, io::stdout()),
            next: GlyphGrid::new(),
            shown: GlyphGrid::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide,
        )?;
        self.fit_terminal()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            ResetColor,
            DisableFocusChange,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Match both grids to the terminal size. On a change the screen is
    /// cleared and the next present repaints every glyph.
    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (w, h) = (tw as usize, th as usize);
        if (w, h) == (self.next.width, self.next.height) && !self.next.glyphs.is_empty() {
            return Ok(());
        }
        log::debug!("terminal is {w}x{h}");
        self.next.reshape(w, h, Glyph::EMPTY);
        self.shown.reshape(w, h, Glyph::STALE);
        queue!(self.out, SetBackgroundColor(BACKDROP), Clear(ClearType::All))
    }

    pub fn render(&mut self, canvas: &PixelCanvas, view: &ViewTransform, status: &Status) -> io::Result<()> {
        self.fit_terminal()?;

        self.next.fill(Glyph::EMPTY);
        self.compose_canvas(canvas, view);
        self.compose_status(status);
        self.compose_help();

        self.present()?;
        std::mem::swap(&mut self.next, &mut self.shown);
        Ok(())
    }

    /// Write every glyph of `next` that differs from `shown`.
    fn present(&mut self) -> io::Result<()> {
        let (mut fg, mut bg) = (Color::White, BACKDROP);
        queue!(self.out, SetForegroundColor(fg), SetBackgroundColor(bg))?;

        // Where the terminal cursor sits after the last Print.
        let mut cursor = None;
        for y in 0..self.next.height {
            for x in 0..self.next.width {
                let glyph = self.next.get(x, y);
                if glyph == self.shown.get(x, y) {
                    continue;
                }
                if cursor != Some((x, y)) {
                    queue!(self.out, MoveTo(x as u16, y as u16))?;
                }
                if glyph.fg != fg {
                    fg = glyph.fg;
                    queue!(self.out, SetForegroundColor(fg))?;
                }
                if glyph.bg != bg {
                    bg = glyph.bg;
                    queue!(self.out, SetBackgroundColor(bg))?;
                }
                queue!(self.out, Print(glyph.ch))?;
                cursor = Some((x + 1, y));
            }
        }

        self.out.flush()
    }

    // ── Compose ──

    /// Sample the canvas at the centre of each screen pixel.
    fn compose_canvas(&mut self, canvas: &PixelCanvas, view: &ViewTransform) {
        let map_row = MAP_ROW as usize;
        for row in map_row..self.next.height {
            for col in 0..self.next.width {
                let Some(top) = terminal_to_screen(col as u16, row as u16) else { continue };
                let top = Point::new(top.x, top.y - 0.5);
                let bottom = Point::new(top.x, top.y + 1.0);
                let fg = sample(canvas, view, top);
                let bg = sample(canvas, view, bottom);
                if fg == BACKDROP && bg == BACKDROP {
                    continue;
                }
                self.next.set(col, row, Glyph { ch: UPPER_HALF, fg, bg });
            }
        }
    }

    fn compose_status(&mut self, s: &Status) {
        let bar = Color::Rgb { r: 40, g: 40, b: 60 };
        let (state, state_fg) = if s.playing {
            ("▶ PLAYING", Color::Rgb { r: 120, g: 230, b: 120 })
        } else {
            ("❚❚ PAUSED", Color::Rgb { r: 255, g: 220, b: 50 })
        };
        self.next.band(0, bar);
        self.next.text(1, 0, state, state_fg, bar);
        let info = format!(
            "gen {}   alive {}   zoom {:.2}x   offset {:+.0},{:+.0}",
            s.generation, s.alive, s.scale, s.offset.0, s.offset.1,
        );
        self.next.text(13, 0, &info, Color::Rgb { r: 200, g: 200, b: 200 }, bar);
    }

    fn compose_help(&mut self) {
        if self.next.height <= MAP_ROW as usize + 1 {
            return;
        }
        let y = self.next.height - 1;
        let dim = Color::Rgb { r: 30, g: 30, b: 45 };
        self.next.band(y, dim);
        self.next.text(0, y, HELP, Color::Rgb { r: 140, g: 140, b: 160 }, dim);
    }
}

fn sample(canvas: &PixelCanvas, view: &ViewTransform, screen: Point) -> Color {
    let c = view.screen_to_canvas(screen);
    canvas.pixel(c.x.floor() as i64, c.y.floor() as i64).unwrap_or(BACKDROP)
}
