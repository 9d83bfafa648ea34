pub mod buffer;
pub mod cell;
