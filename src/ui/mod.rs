pub mod animation;
pub mod controller;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod surface;
pub mod view;
pub mod viewer;
