//! **pathviz-core**: foundational types for the pathviz grid visualizer.
//!
//! Geometry primitives, styled screen cells, a screen grid with frame
//! diffing, input messages, and the frame-driven application loop that the
//! terminal driver and the pathfinding model plug into.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::Grid;
pub use messages::*;
pub use style::{AttrMask, Color, Style};
