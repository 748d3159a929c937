//! Incremental best-first grid search.
//!
//! The engine searches a bounded rectangular [`GridState`] with
//! 8-directional movement (orthogonal steps cost 1, diagonal steps √2). It
//! does exactly one unit of work per call so a caller can interleave the
//! search with rendering:
//!
//! 1. [`IncrementalSearch::new`] binds a run to a start and finish.
//! 2. [`IncrementalSearch::step`] expands one node until it reports
//!    [`SearchState::ReachedFinish`] or [`SearchState::ExhaustedNoPath`].
//! 3. [`IncrementalSearch::backtrack_step`] labels one path cell per call,
//!    from the finish back to the start, until [`BacktrackState::Done`].
//!
//! The grid is passed explicitly to every call; the run keeps its own
//! row-major cost and parent arrays and an indexed open set with
//! decrease-key.
//!
//! ```
//! use pathviz_core::Point;
//! use pathviz_search::{GridState, Heuristic, IncrementalSearch, Label, SearchState};
//!
//! let mut grid = GridState::new(5, 5);
//! grid.set_label(Point::new(2, 2), Label::Blocked);
//! let mut search = IncrementalSearch::from_grid(&mut grid, Heuristic::Octile).unwrap();
//! while search.step(&mut grid) == SearchState::Running {}
//! assert_eq!(search.state(), SearchState::ReachedFinish);
//! ```

mod distance;
mod error;
mod label;
mod open_set;
mod search;
mod state;

pub use distance::{Heuristic, manhattan, octile};
pub use error::{Endpoint, EndpointProblem, SearchError};
pub use label::Label;
pub use search::{BacktrackState, DIAGONAL_COST, IncrementalSearch, ORTHOGONAL_COST, SearchState};
pub use state::GridState;
