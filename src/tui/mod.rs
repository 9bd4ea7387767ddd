pub mod canvas;
pub mod gesture;
pub mod input;
pub mod render;
