/// What a grid cell currently shows.
///
/// `Free` and `Blocked` belong to the user; the search engine only ever
/// writes `Visited`, `Frontier` and `Path`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Label {
    #[default]
    Free,
    Blocked,
    /// Expanded by the search.
    Visited,
    /// Discovered, waiting in the open set.
    Frontier,
    /// Part of the reconstructed path.
    Path,
}

impl Label {
    /// Whether this label is written by a search run (and cleared by a reset).
    #[inline]
    pub const fn is_search_label(self) -> bool {
        matches!(self, Self::Visited | Self::Frontier | Self::Path)
    }
}
