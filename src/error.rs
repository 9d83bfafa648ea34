//! Viewer error taxonomy.
//!
//! Precondition failures abort `Viewer::init` before anything is drawn.
//! Terminal failures are resource errors and end the session.
//! Bad pointer input never reaches this type; it is dropped where it arrives.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(u32),

    #[error("minimum zoom scale must be a positive number, got {0}")]
    InvalidScale(f64),

    #[error("a {width}x{height} grid at cell size {cell_size} does not fit on one canvas")]
    CanvasTooLarge { cell_size: u32, width: u32, height: u32 },

    #[error("cell buffer holds {actual} entries, expected {expected} (width x height)")]
    BufferLength { expected: usize, actual: usize },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
