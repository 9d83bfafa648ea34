pub mod engine;
pub mod universe;
