use std::f64::consts::SQRT_2;

use pathviz_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Octile distance: the exact cost of an unobstructed 8-directional walk with
/// unit orthogonal steps and √2 diagonal steps.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx.max(dy) as f64 + (SQRT_2 - 1.0) * dx.min(dy) as f64
}

/// Remaining-cost estimate used to order the open set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Heuristic {
    /// `|dx| + |dy|`. Overestimates along diagonals, so the search behaves
    /// as a greedy-leaning best-first search rather than optimal A*.
    #[default]
    Manhattan,
    /// Consistent for 8-directional movement; yields shortest paths.
    Octile,
}

impl Heuristic {
    /// Estimated cost from `from` to `to`.
    #[inline]
    pub fn estimate(self, from: Point, to: Point) -> f64 {
        match self {
            Self::Manhattan => manhattan(from, to) as f64,
            Self::Octile => octile(from, to),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Octile => "octile",
        }
    }

    /// The other heuristic.
    pub fn toggle(self) -> Self {
        match self {
            Self::Manhattan => Self::Octile,
            Self::Octile => Self::Manhattan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_and_octile() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(manhattan(a, b), 7);
        assert!((octile(a, b) - (4.0 + 3.0 * (SQRT_2 - 1.0))).abs() < 1e-12);
        assert_eq!(octile(a, a), 0.0);
    }

    #[test]
    fn manhattan_overestimates_diagonals() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 4);
        let true_cost = 4.0 * SQRT_2;
        assert!(Heuristic::Manhattan.estimate(a, b) > true_cost);
        assert!((Heuristic::Octile.estimate(a, b) - true_cost).abs() < 1e-12);
    }
}
