//! Label and endpoint colours.

use pathviz_core::{Color, Point};
use pathviz_search::Label;

pub const FREE: Color = Color::from_rgb(0, 0, 0);
pub const BLOCKED: Color = Color::from_rgb(255, 255, 255);
pub const PATH: Color = Color::from_rgb(112, 31, 126);
pub const VISITED: Color = Color::from_rgb(0, 82, 172);
pub const FRONTIER: Color = Color::from_rgb(102, 191, 255);
pub const START: Color = Color::from_rgb(0, 228, 48);
pub const FINISH: Color = Color::from_rgb(230, 41, 55);

pub const STATUS_FG: Color = Color::from_rgb(200, 200, 200);
pub const STATUS_BG: Color = Color::from_rgb(30, 30, 50);
pub const NOTICE_FG: Color = Color::from_rgb(255, 200, 80);

pub fn label_color(label: Label) -> Color {
    match label {
        Label::Free => FREE,
        Label::Blocked => BLOCKED,
        Label::Visited => VISITED,
        Label::Frontier => FRONTIER,
        Label::Path => PATH,
    }
}

/// Colour of the cell at `p`; the endpoints override whatever label they carry.
pub fn cell_color(p: Point, label: Label, start: Point, finish: Point) -> Color {
    if p == start {
        START
    } else if p == finish {
        FINISH
    } else {
        label_color(label)
    }
}
