use pathviz_core::{Point, Range};
use rand::{Rng, RngExt};

use crate::label::Label;

/// The shared substrate of the visualizer: one [`Label`] per cell plus the
/// current start and finish cells.
///
/// The grid is owned by the caller. A search run borrows it mutably for the
/// duration of each call ([`IncrementalSearch::step`](crate::IncrementalSearch::step),
/// [`backtrack_step`](crate::IncrementalSearch::backtrack_step)) and never
/// keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridState {
    cells: Vec<Label>,
    bounds: Range,
    start: Point,
    finish: Point,
}

impl GridState {
    /// Create an all-`Free` grid with the start in the top-left corner and the
    /// finish in the bottom-right one. Dimensions are clamped to at least 1.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(1), height.max(1));
        Self {
            cells: vec![Label::Free; bounds.len()],
            bounds,
            start: Point::ZERO,
            finish: bounds.max.shift(-1, -1),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn finish(&self) -> Point {
        self.finish
    }

    /// The label at `p`, or `None` outside the grid.
    #[inline]
    pub fn label(&self, p: Point) -> Option<Label> {
        self.bounds
            .index_of(p)
            .and_then(|i| self.cells.get(i).copied())
    }

    /// True iff `p` is inside the grid and labeled [`Label::Blocked`].
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.label(p) == Some(Label::Blocked)
    }

    /// Caller-side edit. Returns `false` (and does nothing) outside the grid.
    pub fn set_label(&mut self, p: Point, label: Label) -> bool {
        match self.bounds.index_of(p).and_then(|i| self.cells.get_mut(i)) {
            Some(cell) => {
                *cell = label;
                true
            }
            None => false,
        }
    }

    /// Engine-side annotation: writes a search label unless the cell is
    /// blocked.
    pub(crate) fn mark(&mut self, p: Point, label: Label) {
        debug_assert!(label.is_search_label());
        if let Some(cell) = self.bounds.index_of(p).and_then(|i| self.cells.get_mut(i)) {
            if *cell != Label::Blocked {
                *cell = label;
            }
        }
    }

    /// Turn every `Visited`, `Frontier` and `Path` cell back into `Free`,
    /// leaving `Blocked` cells alone.
    pub fn reset_search_labels(&mut self) {
        for cell in &mut self.cells {
            if cell.is_search_label() {
                *cell = Label::Free;
            }
        }
    }

    /// Make every cell `Free`.
    pub fn clear(&mut self) {
        self.cells.fill(Label::Free);
    }

    /// Move the start to `p`, clearing a wall there. Refused when `p` is
    /// outside the grid or is the finish.
    pub fn set_start(&mut self, p: Point) -> bool {
        if !self.contains(p) || p == self.finish {
            return false;
        }
        self.start = p;
        self.unblock(p);
        true
    }

    /// Move the finish to `p`, clearing a wall there. Refused when `p` is
    /// outside the grid or is the start.
    pub fn set_finish(&mut self, p: Point) -> bool {
        if !self.contains(p) || p == self.start {
            return false;
        }
        self.finish = p;
        self.unblock(p);
        true
    }

    /// Place both endpoints at once, which also allows swapping them.
    /// Refused when either is outside the grid or they coincide.
    pub fn set_endpoints(&mut self, start: Point, finish: Point) -> bool {
        if !self.contains(start) || !self.contains(finish) || start == finish {
            return false;
        }
        self.start = start;
        self.finish = finish;
        self.unblock(start);
        self.unblock(finish);
        true
    }

    fn unblock(&mut self, p: Point) {
        if self.is_blocked(p) {
            self.set_label(p, Label::Free);
        }
    }

    /// Block roughly `density` percent of the cells at random, never the
    /// start or finish. Returns how many cells were newly blocked.
    pub fn scatter_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R, density: u32) -> usize {
        let mut blocked = 0;
        for p in self.bounds.iter() {
            if p == self.start || p == self.finish {
                continue;
            }
            if rng.random_range(0..100) < density && !self.is_blocked(p) {
                self.set_label(p, Label::Blocked);
                blocked += 1;
            }
        }
        blocked
    }

    /// Row-major iterator over `(Point, Label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Label)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// Number of cells carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.cells.iter().filter(|&&l| l == label).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn new_grid_defaults() {
        let g = GridState::new(5, 4);
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 4);
        assert_eq!(g.start(), Point::new(0, 0));
        assert_eq!(g.finish(), Point::new(4, 3));
        assert_eq!(g.count(Label::Free), 20);
    }

    #[test]
    fn is_blocked_respects_bounds() {
        let mut g = GridState::new(3, 3);
        assert!(g.set_label(Point::new(1, 1), Label::Blocked));
        assert!(g.is_blocked(Point::new(1, 1)));
        assert!(!g.is_blocked(Point::new(-1, 1)));
        assert!(!g.set_label(Point::new(3, 0), Label::Blocked));
        assert_eq!(g.label(Point::new(3, 0)), None);
    }

    #[test]
    fn reset_keeps_walls() {
        let mut g = GridState::new(3, 1);
        g.set_label(Point::new(0, 0), Label::Visited);
        g.set_label(Point::new(1, 0), Label::Blocked);
        g.set_label(Point::new(2, 0), Label::Path);
        g.reset_search_labels();
        assert_eq!(g.label(Point::new(0, 0)), Some(Label::Free));
        assert_eq!(g.label(Point::new(1, 0)), Some(Label::Blocked));
        assert_eq!(g.label(Point::new(2, 0)), Some(Label::Free));
        g.clear();
        assert_eq!(g.count(Label::Free), 3);
    }

    #[test]
    fn mark_never_overwrites_walls() {
        let mut g = GridState::new(2, 1);
        g.set_label(Point::new(1, 0), Label::Blocked);
        g.mark(Point::new(1, 0), Label::Visited);
        g.mark(Point::new(0, 0), Label::Frontier);
        assert_eq!(g.label(Point::new(1, 0)), Some(Label::Blocked));
        assert_eq!(g.label(Point::new(0, 0)), Some(Label::Frontier));
    }

    #[test]
    fn endpoints_stay_distinct_and_open() {
        let mut g = GridState::new(4, 4);
        let f = g.finish();
        assert!(!g.set_start(f));
        assert!(!g.set_finish(g.start()));
        assert!(!g.set_start(Point::new(9, 9)));

        let p = Point::new(2, 1);
        g.set_label(p, Label::Blocked);
        assert!(g.set_start(p));
        assert_eq!(g.start(), p);
        assert!(!g.is_blocked(p));
    }

    #[test]
    fn endpoints_can_swap_together() {
        let mut g = GridState::new(4, 4);
        let (s, f) = (g.start(), g.finish());
        assert!(g.set_endpoints(f, s));
        assert_eq!((g.start(), g.finish()), (f, s));
        assert!(!g.set_endpoints(s, s));
        assert!(!g.set_endpoints(s, Point::new(4, 0)));
        assert_eq!((g.start(), g.finish()), (f, s));
    }

    #[test]
    fn scatter_spares_endpoints() {
        let mut g = GridState::new(10, 10);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let n = g.scatter_obstacles(&mut rng, 100);
        assert_eq!(n, 98);
        assert!(!g.is_blocked(g.start()));
        assert!(!g.is_blocked(g.finish()));
        // Already-blocked cells are not counted again.
        assert_eq!(g.scatter_obstacles(&mut rng, 100), 0);
        g.clear();
        assert_eq!(g.scatter_obstacles(&mut rng, 0), 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_state_round_trip() {
        let mut g = GridState::new(3, 2);
        g.set_label(Point::new(1, 1), Label::Blocked);
        g.set_label(Point::new(0, 1), Label::Path);
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"blocked\""));
        let back: GridState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
