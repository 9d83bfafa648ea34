//! Per-cell state as stored in the engine's packed buffer.
//! One byte per cell; the discriminants are the wire values.

use bytemuck::NoUninit;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, NoUninit)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    /// Decode one buffer byte.
    /// Only 0 and 1 are legal; anything else non-zero reads as Alive.
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        debug_assert!(byte <= 1, "cell byte out of range: {byte}");
        if byte == 0 { Cell::Dead } else { Cell::Alive }
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Text glyph used by the engine's `Display` rendering.
    pub fn symbol(self) -> char {
        match self {
            Cell::Dead => '◻',
            Cell::Alive => '◼',
        }
    }
}
