//! The visualizer model: grid editing, the search/backtrack phases driven
//! one step per frame, and drawing.

use std::fmt;

use pathviz_core::{
    Cell, Point, Style,
    app::{Effect, Model},
    grid::Grid,
    messages::{Key, ModMask, MouseAction, Msg},
    style::AttrMask,
};
use pathviz_search::{
    BacktrackState, Endpoint, GridState, Heuristic, IncrementalSearch, Label, SearchState,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{Config, SCREEN_FOOTER_ROWS};
use crate::palette;

const HELP: &str = "click: wall  right: erase  shift/s/f: move start/finish  \
enter: search  bksp: stop/reset  del: clear  r: scatter  h: heuristic  q: quit";

/// What the visualizer is doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The user may edit walls and endpoints.
    Editing,
    /// One `step()` per frame.
    Searching,
    /// One `backtrack_step()` per frame.
    Backtracking,
    /// Run over; labels stay on screen until reset.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Editing => "editing",
            Self::Searching => "searching",
            Self::Backtracking => "backtracking",
            Self::Finished => "finished",
        })
    }
}

pub struct Pathviz {
    grid: GridState,
    search: Option<IncrementalSearch>,
    phase: Phase,
    heuristic: Heuristic,
    cell_width: i32,
    /// Grid cell last under the mouse pointer.
    cursor: Option<Point>,
    rng: StdRng,
    density: u32,
    notice: Option<String>,
}

impl Pathviz {
    /// Build the model from a validated config.
    pub fn new(config: &Config) -> Self {
        let mut grid = GridState::new(config.grid.width, config.grid.height);
        if !grid.set_endpoints(config.grid.start(), config.grid.finish()) {
            log::warn!(
                "ignoring endpoints {} / {}",
                config.grid.start(),
                config.grid.finish()
            );
        }
        Self {
            grid,
            search: None,
            phase: Phase::Editing,
            heuristic: config.search.heuristic,
            cell_width: config.display.cell_width.max(1),
            cursor: None,
            rng: StdRng::seed_from_u64(config.obstacles.seed),
            density: config.obstacles.density,
            notice: None,
        }
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn search(&self) -> Option<&IncrementalSearch> {
        self.search.as_ref()
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Screen size in terminal cells.
    pub fn screen_size(&self) -> Point {
        Point::new(
            self.grid.width().saturating_mul(self.cell_width),
            self.grid.height().saturating_add(SCREEN_FOOTER_ROWS),
        )
    }

    /// Grid cell under a screen position.
    fn cell_at(&self, pos: Point) -> Option<Point> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let p = Point::new(pos.x / self.cell_width, pos.y);
        self.grid.contains(p).then_some(p)
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    fn begin_search(&mut self) {
        match IncrementalSearch::from_grid(&mut self.grid, self.heuristic) {
            Ok(search) => {
                self.search = Some(search);
                self.phase = Phase::Searching;
                self.notice = None;
            }
            Err(e) => {
                log::warn!("cannot start search: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Stop the run where it is, leaving its labels on screen.
    fn abort(&mut self) {
        log::debug!("run aborted in phase {}", self.phase);
        self.phase = Phase::Finished;
        self.notice = Some("stopped".into());
    }

    /// Drop the run and its labels.
    fn reset(&mut self) {
        self.grid.reset_search_labels();
        self.search = None;
        self.phase = Phase::Editing;
        self.notice = None;
    }

    fn tick(&mut self) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        match self.phase {
            Phase::Searching => {
                if search.step(&mut self.grid).is_terminal() {
                    self.phase = Phase::Backtracking;
                }
            }
            Phase::Backtracking => {
                if search.backtrack_step(&mut self.grid) == BacktrackState::Done {
                    self.phase = Phase::Finished;
                    if search.state() == SearchState::ExhaustedNoPath {
                        self.notice = Some("no path".into());
                    }
                    log::info!(
                        "run finished: {:?}, {} expansions",
                        search.state(),
                        search.expansions()
                    );
                }
            }
            Phase::Editing | Phase::Finished => {}
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, key: &Key) -> Option<Effect> {
        if matches!(key, Key::Escape | Key::Char('q')) {
            return Some(Effect::End);
        }
        match self.phase {
            Phase::Editing => match key {
                Key::Enter => self.begin_search(),
                Key::Delete => self.grid.clear(),
                Key::Char('r') => {
                    let n = self.grid.scatter_obstacles(&mut self.rng, self.density);
                    log::debug!("scattered {n} walls");
                }
                Key::Char('h') => self.heuristic = self.heuristic.toggle(),
                Key::Char('s') => {
                    if let Some(p) = self.cursor {
                        self.move_endpoint(Endpoint::Start, p);
                    }
                }
                Key::Char('f') => {
                    if let Some(p) = self.cursor {
                        self.move_endpoint(Endpoint::Finish, p);
                    }
                }
                _ => {}
            },
            Phase::Searching | Phase::Backtracking => {
                if *key == Key::Backspace {
                    self.abort();
                }
            }
            Phase::Finished => {
                if *key == Key::Backspace {
                    self.reset();
                }
            }
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point, modifiers: ModMask) {
        let Some(p) = self.cell_at(pos) else {
            return;
        };
        self.cursor = Some(p);
        if self.phase != Phase::Editing {
            return;
        }
        let shift = modifiers.contains(ModMask::SHIFT);
        match action {
            MouseAction::Main if shift => self.move_endpoint(Endpoint::Start, p),
            MouseAction::Main => {
                if p != self.grid.start() && p != self.grid.finish() {
                    self.grid.set_label(p, Label::Blocked);
                }
            }
            MouseAction::Secondary => {
                if shift {
                    self.move_endpoint(Endpoint::Finish, p);
                } else {
                    self.grid.set_label(p, Label::Free);
                }
            }
            _ => {}
        }
    }

    fn move_endpoint(&mut self, endpoint: Endpoint, p: Point) {
        let moved = match endpoint {
            Endpoint::Start => self.grid.set_start(p),
            Endpoint::Finish => self.grid.set_finish(p),
        };
        if moved {
            self.notice = None;
        } else {
            log::warn!("cannot move {endpoint} to {p}: the other endpoint is there");
            self.notice = Some(format!("{endpoint} cannot share a cell with the other endpoint"));
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn status_line(&self) -> String {
        let mut s = format!(" {} | {}", self.phase, self.heuristic.name());
        if let Some(search) = &self.search {
            s.push_str(&format!(
                " | expanded {} | open {}",
                search.expansions(),
                search.open_len()
            ));
            if let (Some(cost), Some(len)) = (search.path_cost(), search.path_len()) {
                s.push_str(&format!(" | cost {cost:.3} | path {len} cells"));
            }
        }
        s
    }
}

impl Model for Pathviz {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::debug!(
                    "{}x{} grid, {} to {}",
                    self.grid.width(),
                    self.grid.height(),
                    self.grid.start(),
                    self.grid.finish()
                );
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::Tick => {
                self.tick();
                None
            }
            Msg::KeyDown { ref key, .. } => self.handle_key(key),
            Msg::Mouse {
                action,
                pos,
                modifiers,
                ..
            } => {
                self.handle_mouse(action, pos, modifiers);
                None
            }
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::default());

        let (start, finish) = (self.grid.start(), self.grid.finish());
        for (p, label) in self.grid.iter() {
            let cell = Cell::block(palette::cell_color(p, label, start, finish));
            for i in 0..self.cell_width {
                grid.set(Point::new(p.x * self.cell_width + i, p.y), cell);
            }
        }

        let status_y = self.grid.height();
        let status_style = Style::default()
            .with_fg(palette::STATUS_FG)
            .with_bg(palette::STATUS_BG)
            .with_attrs(AttrMask::BOLD);
        for x in 0..grid.width() {
            grid.set(Point::new(x, status_y), Cell::default().with_style(status_style));
        }
        grid.set_text(Point::new(0, status_y), &self.status_line(), status_style);

        let (text, style) = match &self.notice {
            Some(n) => (n.as_str(), Style::default().with_fg(palette::NOTICE_FG)),
            None => (HELP, Style::default().with_fg(palette::STATUS_FG)),
        };
        grid.set_text(Point::new(0, status_y + 1), text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(width: i32, height: i32) -> Pathviz {
        let mut config = Config::default();
        config.grid.width = width;
        config.grid.height = height;
        Pathviz::new(&config)
    }

    fn send_key(m: &mut Pathviz, key: Key) -> Option<Effect> {
        m.update(Msg::key(key))
    }

    /// Screen position of a grid cell under the default cell width.
    fn screen(p: Point) -> Point {
        Point::new(p.x * 2, p.y)
    }

    fn click(m: &mut Pathviz, action: MouseAction, p: Point, modifiers: ModMask) {
        m.update(Msg::mouse(action, screen(p), modifiers));
    }

    fn tick_until(m: &mut Pathviz, phase: Phase, limit: usize) -> usize {
        for n in 0..limit {
            if m.phase() == phase {
                return n;
            }
            m.update(Msg::Tick);
        }
        panic!("phase {phase} not reached within {limit} ticks");
    }

    #[test]
    fn full_run_then_reset() {
        let mut m = small(5, 5);
        send_key(&mut m, Key::Enter);
        assert_eq!(m.phase(), Phase::Searching);

        // Five expansions along the diagonal; the fifth reaches the finish.
        assert_eq!(tick_until(&mut m, Phase::Backtracking, 100), 5);
        // Four labeling steps plus the one that notices the start.
        assert_eq!(tick_until(&mut m, Phase::Finished, 100), 5);
        assert_eq!(m.grid().count(Label::Path), 4);

        // Ticks after the run change nothing.
        let before = m.grid().clone();
        m.update(Msg::Tick);
        assert_eq!(m.grid(), &before);

        // Editing is locked until reset.
        click(&mut m, MouseAction::Main, Point::new(3, 1), ModMask::NONE);
        assert!(!m.grid().is_blocked(Point::new(3, 1)));

        send_key(&mut m, Key::Backspace);
        assert_eq!(m.phase(), Phase::Editing);
        assert!(m.search().is_none());
        assert_eq!(m.grid().count(Label::Free), 25);
    }

    #[test]
    fn enclosed_finish_reports_no_path() {
        let mut m = small(6, 6);
        for p in [Point::new(4, 4), Point::new(4, 5), Point::new(5, 4)] {
            click(&mut m, MouseAction::Main, p, ModMask::NONE);
        }
        assert_eq!(m.grid().count(Label::Blocked), 3);
        send_key(&mut m, Key::Enter);
        tick_until(&mut m, Phase::Backtracking, 100);
        assert_eq!(tick_until(&mut m, Phase::Finished, 10), 1);
        assert_eq!(m.grid().count(Label::Path), 0);
        assert_eq!(m.notice.as_deref(), Some("no path"));
    }

    #[test]
    fn painting_and_endpoint_moves() {
        let mut m = small(6, 4);
        let start = m.grid().start();

        click(&mut m, MouseAction::Main, start, ModMask::NONE);
        assert!(!m.grid().is_blocked(start));

        let p = Point::new(2, 1);
        click(&mut m, MouseAction::Main, p, ModMask::NONE);
        assert!(m.grid().is_blocked(p));
        click(&mut m, MouseAction::Secondary, p, ModMask::NONE);
        assert!(!m.grid().is_blocked(p));

        click(&mut m, MouseAction::Main, Point::new(1, 3), ModMask::SHIFT);
        assert_eq!(m.grid().start(), Point::new(1, 3));
        click(&mut m, MouseAction::Secondary, Point::new(4, 0), ModMask::SHIFT);
        assert_eq!(m.grid().finish(), Point::new(4, 0));

        // Moving the start onto the finish is refused.
        click(&mut m, MouseAction::Main, Point::new(4, 0), ModMask::SHIFT);
        assert_eq!(m.grid().start(), Point::new(1, 3));

        // Off-grid positions (the footer) are ignored.
        click(&mut m, MouseAction::Main, Point::new(2, 4), ModMask::NONE);
        assert_eq!(m.grid().count(Label::Blocked), 0);
    }

    #[test]
    fn refused_endpoint_move_sets_notice() {
        let mut m = small(6, 4);
        let finish = m.grid().finish();
        click(&mut m, MouseAction::Main, finish, ModMask::SHIFT);
        assert_eq!(m.grid().start(), Point::ZERO);
        assert!(m.notice.as_deref().unwrap_or_default().contains("start"));

        click(&mut m, MouseAction::Move, Point::ZERO, ModMask::NONE);
        send_key(&mut m, Key::Char('f'));
        assert_eq!(m.grid().finish(), finish);
        assert!(m.notice.as_deref().unwrap_or_default().contains("finish"));

        // A successful move clears the notice.
        click(&mut m, MouseAction::Main, Point::new(2, 2), ModMask::SHIFT);
        assert_eq!(m.grid().start(), Point::new(2, 2));
        assert!(m.notice.is_none());
    }

    #[test]
    fn status_line_reports_path_length() {
        let mut m = small(5, 5);
        send_key(&mut m, Key::Enter);
        tick_until(&mut m, Phase::Finished, 100);
        let status = m.status_line();
        assert!(status.contains("path 5 cells"), "{status}");
        assert!(status.contains("cost 5.657"), "{status}");
    }

    #[test]
    fn keyboard_endpoint_moves_follow_cursor() {
        let mut m = small(6, 4);
        send_key(&mut m, Key::Char('s'));
        assert_eq!(m.grid().start(), Point::ZERO);

        click(&mut m, MouseAction::Move, Point::new(3, 2), ModMask::NONE);
        send_key(&mut m, Key::Char('f'));
        assert_eq!(m.grid().finish(), Point::new(3, 2));

        click(&mut m, MouseAction::Move, Point::new(5, 3), ModMask::NONE);
        send_key(&mut m, Key::Char('s'));
        assert_eq!(m.grid().start(), Point::new(5, 3));
    }

    #[test]
    fn backspace_stops_then_resets() {
        let mut m = small(10, 10);
        click(&mut m, MouseAction::Main, Point::new(5, 5), ModMask::NONE);
        send_key(&mut m, Key::Enter);
        m.update(Msg::Tick);
        m.update(Msg::Tick);

        // Edits are ignored while searching.
        send_key(&mut m, Key::Delete);
        assert!(m.grid().is_blocked(Point::new(5, 5)));

        send_key(&mut m, Key::Backspace);
        assert_eq!(m.phase(), Phase::Finished);
        let visited = m.grid().count(Label::Visited);
        assert!(visited >= 2);
        m.update(Msg::Tick);
        assert_eq!(m.grid().count(Label::Visited), visited);

        send_key(&mut m, Key::Backspace);
        assert_eq!(m.phase(), Phase::Editing);
        assert_eq!(m.grid().count(Label::Visited), 0);
        assert!(m.grid().is_blocked(Point::new(5, 5)));
    }

    #[test]
    fn editing_keys() {
        let mut m = small(8, 8);
        assert_eq!(m.heuristic(), Heuristic::Manhattan);
        send_key(&mut m, Key::Char('h'));
        assert_eq!(m.heuristic(), Heuristic::Octile);

        send_key(&mut m, Key::Char('r'));
        let walls = m.grid().count(Label::Blocked);
        assert!(walls > 0);
        assert!(!m.grid().is_blocked(m.grid().start()));

        send_key(&mut m, Key::Delete);
        assert_eq!(m.grid().count(Label::Blocked), 0);

        assert_eq!(send_key(&mut m, Key::Char('q')), Some(Effect::End));
        assert_eq!(send_key(&mut m, Key::Escape), Some(Effect::End));
    }

    #[test]
    fn invalid_search_stays_in_editing() {
        let mut m = small(4, 4);
        let start = m.grid.start();
        m.grid.set_label(start, Label::Blocked);
        send_key(&mut m, Key::Enter);
        assert_eq!(m.phase(), Phase::Editing);
        assert!(m.search().is_none());
        assert!(m.notice.as_deref().unwrap_or_default().contains("start"));
    }

    #[test]
    fn draw_paints_cells_and_status() {
        let mut m = small(4, 3);
        click(&mut m, MouseAction::Main, Point::new(1, 1), ModMask::NONE);
        let size = m.screen_size();
        assert_eq!(size, Point::new(8, 5));

        let mut screen_grid = Grid::new(size.x, size.y);
        m.draw(&mut screen_grid);
        assert_eq!(screen_grid.at(Point::new(0, 0)).style.bg, palette::START);
        assert_eq!(screen_grid.at(Point::new(1, 0)).style.bg, palette::START);
        assert_eq!(screen_grid.at(Point::new(7, 2)).style.bg, palette::FINISH);
        assert_eq!(screen_grid.at(Point::new(2, 1)).style.bg, palette::BLOCKED);
        assert_eq!(screen_grid.at(Point::new(4, 1)).style.bg, palette::FREE);

        let status: String = (0..size.x)
            .map(|x| screen_grid.at(Point::new(x, 3)).ch)
            .collect();
        assert!(status.starts_with(" editing"));
    }

    #[test]
    fn config_endpoints_are_applied() {
        let config = Config::from_toml_str(
            "[grid]\nwidth = 6\nheight = 6\nstart = { x = 5, y = 5 }\nfinish = { x = 0, y = 0 }",
        )
        .unwrap();
        let m = Pathviz::new(&config);
        assert_eq!(m.grid().start(), Point::new(5, 5));
        assert_eq!(m.grid().finish(), Point::new(0, 0));
    }
}
