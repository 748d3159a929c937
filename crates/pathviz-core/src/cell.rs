//! The [`Cell`] type: one terminal column of the screen grid.

use crate::style::{Color, Style};

/// A character and its style at one screen position.
///
/// The default cell is a space in the terminal's default colours, which is
/// what a cleared screen grid holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// A blank cell painted with background `bg`; grid cells are drawn as
    /// runs of these.
    pub fn block(bg: Color) -> Self {
        Self::new(' ', Style::default().with_bg(bg))
    }

    #[inline]
    pub const fn with_char(self, ch: char) -> Self {
        Self::new(ch, self.style)
    }

    #[inline]
    pub const fn with_style(self, style: Style) -> Self {
        Self::new(self.ch, style)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Style::default())
    }
}
