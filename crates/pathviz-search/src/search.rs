use std::f64::consts::SQRT_2;

use pathviz_core::{Point, Range};

use crate::distance::Heuristic;
use crate::error::{Endpoint, EndpointProblem, SearchError};
use crate::label::Label;
use crate::open_set::OpenSet;
use crate::state::GridState;

/// Cost of a horizontal or vertical step.
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of a diagonal step.
pub const DIAGONAL_COST: f64 = SQRT_2;

/// Parent sentinel for undiscovered nodes.
const NO_PARENT: usize = usize::MAX;

/// Progress of the expansion phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// The open set is non-empty and the finish has not been dequeued.
    Running,
    /// The finish was dequeued. Absorbing.
    ReachedFinish,
    /// The open set emptied first: no path exists. Absorbing.
    ExhaustedNoPath,
}

impl SearchState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Self::Running
    }
}

/// Progress of the path reconstruction phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BacktrackState {
    NotStarted,
    Backtracking,
    /// Absorbing.
    Done,
}

/// Per-cell search record, indexed by the cell's row-major offset.
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Best known cost from the start; meaningful only once discovered.
    g: f64,
    parent: usize,
    discovered: bool,
    /// Dequeued and expanded; its `g` and `parent` are final.
    closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            parent: NO_PARENT,
            discovered: false,
            closed: false,
        }
    }
}

/// A best-first (A*) search that advances one expansion per
/// [`step`](Self::step) call and then walks the found path back one cell per
/// [`backtrack_step`](Self::backtrack_step) call, annotating a [`GridState`]
/// as it goes.
///
/// One value is one search run. Start a new run by constructing a new value;
/// grid edits made while a run is in progress leave the run undefined.
#[derive(Clone, Debug)]
pub struct IncrementalSearch {
    bounds: Range,
    start: Point,
    finish: Point,
    heuristic: Heuristic,
    nodes: Vec<Node>,
    open: OpenSet,
    state: SearchState,
    backtrack: BacktrackState,
    current: Point,
    expansions: usize,
    discovered: usize,
}

impl IncrementalSearch {
    /// Begin a run from `start` to `finish` over `grid`.
    ///
    /// Both endpoints must be inside the grid, distinct, and not blocked. On
    /// success the start is queued at priority 0 and labeled
    /// [`Label::Visited`].
    pub fn new(
        grid: &mut GridState,
        start: Point,
        finish: Point,
        heuristic: Heuristic,
    ) -> Result<Self, SearchError> {
        check_endpoint(grid, Endpoint::Start, start)?;
        check_endpoint(grid, Endpoint::Finish, finish)?;
        if start == finish {
            return Err(SearchError::InvalidEndpoint {
                endpoint: Endpoint::Finish,
                point: finish,
                problem: EndpointProblem::Coincident,
            });
        }

        let bounds = grid.bounds();
        let len = bounds.len();
        let mut nodes = vec![Node::default(); len];
        let mut open = OpenSet::new(len);

        let si = bounds
            .index_of(start)
            .ok_or(SearchError::InvalidEndpoint {
                endpoint: Endpoint::Start,
                point: start,
                problem: EndpointProblem::OutOfBounds,
            })?;
        nodes[si] = Node {
            g: 0.0,
            parent: si,
            discovered: true,
            closed: false,
        };
        open.push(si, 0.0);
        grid.mark(start, Label::Visited);

        log::debug!("search {start} -> {finish} on {bounds} ({})", heuristic.name());

        Ok(Self {
            bounds,
            start,
            finish,
            heuristic,
            nodes,
            open,
            state: SearchState::Running,
            backtrack: BacktrackState::NotStarted,
            current: start,
            expansions: 0,
            discovered: 1,
        })
    }

    /// Begin a run between the grid's own start and finish.
    pub fn from_grid(grid: &mut GridState, heuristic: Heuristic) -> Result<Self, SearchError> {
        let (start, finish) = (grid.start(), grid.finish());
        Self::new(grid, start, finish, heuristic)
    }

    /// Expand exactly one node from the open set.
    ///
    /// The dequeued cell is labeled `Visited`; newly discovered neighbours are
    /// labeled `Frontier`. Once a terminal state is reached further calls
    /// return it without touching the grid.
    pub fn step(&mut self, grid: &mut GridState) -> SearchState {
        if self.state.is_terminal() {
            return self.state;
        }

        let Some((ci, _)) = self.open.pop() else {
            log::debug!(
                "search exhausted after {} expansions: no path to {}",
                self.expansions,
                self.finish
            );
            self.state = SearchState::ExhaustedNoPath;
            return self.state;
        };

        let cur = self.bounds.point_at(ci);
        self.nodes[ci].closed = true;
        self.current = cur;
        self.expansions += 1;
        grid.mark(cur, Label::Visited);

        if cur == self.finish {
            log::debug!(
                "reached {} after {} expansions, cost {:.3}",
                cur,
                self.expansions,
                self.nodes[ci].g
            );
            self.state = SearchState::ReachedFinish;
            return self.state;
        }

        let g_cur = self.nodes[ci].g;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let np = cur.shift(dx, dy);
                let Some(ni) = self.bounds.index_of(np) else {
                    continue;
                };
                if self.nodes[ni].closed || !self.is_passable(grid, np) {
                    continue;
                }

                if !self.nodes[ni].discovered {
                    self.nodes[ni].discovered = true;
                    self.nodes[ni].g = f64::INFINITY;
                    self.discovered += 1;
                    grid.mark(np, Label::Frontier);
                    self.open.push(ni, f64::INFINITY);
                }

                let cost = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    ORTHOGONAL_COST
                };
                let tentative = g_cur + cost;
                if tentative < self.nodes[ni].g {
                    self.nodes[ni].g = tentative;
                    self.nodes[ni].parent = ci;
                    let priority = tentative + self.heuristic.estimate(np, self.finish);
                    self.open.decrease(ni, priority);
                }
            }
        }

        log::trace!("expanded {cur}, open set {}", self.open.len());
        SearchState::Running
    }

    /// Step until a terminal state is reached.
    pub fn run_to_end(&mut self, grid: &mut GridState) -> SearchState {
        while !self.step(grid).is_terminal() {}
        self.state
    }

    /// Walk one cell of the found path from the finish back toward the start,
    /// labeling it [`Label::Path`].
    ///
    /// Returns [`BacktrackState::Done`] without labeling anything when the
    /// finish was never reached, or once the walk arrives at the start.
    pub fn backtrack_step(&mut self, grid: &mut GridState) -> BacktrackState {
        match self.backtrack {
            BacktrackState::Done => return BacktrackState::Done,
            BacktrackState::NotStarted => {
                if self.state != SearchState::ReachedFinish {
                    self.backtrack = BacktrackState::Done;
                    return self.backtrack;
                }
                self.current = self.finish;
                self.backtrack = BacktrackState::Backtracking;
            }
            BacktrackState::Backtracking => {}
        }

        if self.current == self.start {
            self.backtrack = BacktrackState::Done;
            return self.backtrack;
        }

        let parent = self
            .bounds
            .index_of(self.current)
            .map(|i| self.nodes[i].parent)
            .filter(|&p| p != NO_PARENT);
        let Some(parent) = parent else {
            log::warn!("no parent recorded for {}, stopping backtrack", self.current);
            self.backtrack = BacktrackState::Done;
            return self.backtrack;
        };

        grid.mark(self.current, Label::Path);
        self.current = self.bounds.point_at(parent);
        self.backtrack
    }

    /// The start and finish are traversable whatever their label.
    #[inline]
    fn is_passable(&self, grid: &GridState, p: Point) -> bool {
        p == self.start || p == self.finish || !grid.is_blocked(p)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn backtrack_state(&self) -> BacktrackState {
        self.backtrack
    }

    /// The cell most recently expanded or, while backtracking, the cell the
    /// walk will label next.
    #[inline]
    pub fn current(&self) -> Point {
        self.current
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn finish(&self) -> Point {
        self.finish
    }

    #[inline]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Number of nodes dequeued so far.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Number of cells discovered so far, including the start.
    #[inline]
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Number of cells waiting in the open set.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Whether `p` is waiting in the open set.
    pub fn is_open(&self, p: Point) -> bool {
        self.bounds.index_of(p).is_some_and(|i| self.open.contains(i))
    }

    /// Best known cost from the start to `p`; `None` until `p` is discovered.
    pub fn g_score(&self, p: Point) -> Option<f64> {
        let node = self.bounds.index_of(p).map(|i| self.nodes[i])?;
        node.discovered.then_some(node.g)
    }

    /// Predecessor of `p` on its best known path. The start is its own
    /// parent.
    pub fn parent(&self, p: Point) -> Option<Point> {
        let i = self.bounds.index_of(p)?;
        let parent = self.nodes[i].parent;
        (parent != NO_PARENT).then(|| self.bounds.point_at(parent))
    }

    /// Cost of the found path, once the finish has been reached.
    pub fn path_cost(&self) -> Option<f64> {
        match self.state {
            SearchState::ReachedFinish => self.g_score(self.finish),
            _ => None,
        }
    }

    /// Number of cells on the found path, endpoints included. Walks the
    /// parent links without allocating.
    pub fn path_len(&self) -> Option<usize> {
        if self.state != SearchState::ReachedFinish {
            return None;
        }
        let mut len = 1;
        let mut p = self.finish;
        while p != self.start {
            p = self.parent(p)?;
            len += 1;
            if len > self.nodes.len() {
                return None;
            }
        }
        Some(len)
    }

    /// The found path from start to finish inclusive, without labeling the
    /// grid. `None` until the finish has been reached.
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.state != SearchState::ReachedFinish {
            return None;
        }
        let mut path = vec![self.finish];
        let mut p = self.finish;
        while p != self.start {
            p = self.parent(p)?;
            path.push(p);
            if path.len() > self.nodes.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

fn check_endpoint(grid: &GridState, endpoint: Endpoint, p: Point) -> Result<(), SearchError> {
    let problem = if !grid.contains(p) {
        EndpointProblem::OutOfBounds
    } else if grid.is_blocked(p) {
        EndpointProblem::Blocked
    } else {
        return Ok(());
    };
    Err(SearchError::InvalidEndpoint {
        endpoint,
        point: p,
        problem,
    })
}
