//! Conway's Game of Life on a wrapping grid sized to the terminal.

pub mod control;
pub mod grid;
pub mod render;
pub mod session;

pub use control::run;
