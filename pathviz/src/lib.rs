//! Interactive A* visualizer for the terminal.
//!
//! Paint walls with the mouse, press Enter, and the search advances one
//! expansion per frame, then traces the path back one cell per frame.

pub mod config;
pub mod palette;

mod model;

pub use model::{Pathviz, Phase};
