//! The frame-driven application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! Every iteration of [`App::run`] is one frame: the driver polls input for
//! at most one frame interval, the queued messages are delivered to the
//! model, a single [`Msg::Tick`] follows, and the model is drawn once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::grid::{Frame, Grid, compute_frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait for input for at most one frame interval, sending any messages
    /// through `tx`. Must return promptly once `ctx.is_done()`.
    fn poll_msgs(&mut self, ctx: &Context, tx: &Sender<Msg>)
    -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the screen.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Screen width in cells.
    pub width: i32,
    /// Screen height in cells.
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// The model, e.g. for inspection after [`run`](App::run) returns.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the frame loop until the model returns [`Effect::End`] or the
    /// driver fails. The driver is closed in both cases.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.run_frames();
        self.driver.close();
        result
    }

    fn run_frames(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();

        let mut prev_grid = Grid::new(self.width, self.height);
        let mut curr_grid = Grid::new(self.width, self.height);

        tx.send(Msg::Init).ok();
        let mut frames: u64 = 0;

        while !ctx.is_done() {
            if frames > 0 {
                self.driver.poll_msgs(&ctx, &tx)?;
            }
            tx.send(Msg::Tick).ok();
            self.process_frame(&rx, &ctx, &mut prev_grid, &mut curr_grid)?;
            frames += 1;
        }

        log::debug!("app loop stopped after {frames} frames");
        Ok(())
    }

    /// Drain queued messages into the model, then draw, diff and flush once.
    fn process_frame(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while let Ok(msg) = rx.try_recv() {
            if let Some(Effect::End) = self.model.update(msg) {
                ctx.cancel();
                return Ok(());
            }
        }

        self.model.draw(curr_grid);
        let frame = compute_frame(prev_grid, curr_grid);
        if !frame.cells.is_empty() {
            self.driver.flush(frame)?;
        }
        prev_grid.clone_from(curr_grid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::geom::Point;
    use crate::messages::Key;

    /// Counts ticks; quits on `q`.
    #[derive(Default)]
    struct Counter {
        ticks: u32,
        keys: u32,
        inited: bool,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Init => self.inited = true,
                Msg::Tick => self.ticks += 1,
                Msg::KeyDown {
                    key: Key::Char('q'),
                    ..
                } => return Some(Effect::End),
                Msg::KeyDown { .. } => self.keys += 1,
                _ => {}
            }
            None
        }

        fn draw(&self, grid: &mut Grid) {
            let ch = char::from_digit(self.ticks % 10, 10).unwrap_or('?');
            grid.set(Point::ZERO, Cell::default().with_char(ch));
        }
    }

    /// Replays one batch of messages per poll.
    struct Scripted {
        polls: Vec<Vec<Msg>>,
        flushed: Vec<Frame>,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: &Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.polls.is_empty() {
                return Err("script exhausted".into());
            }
            for msg in self.polls.remove(0) {
                tx.send(msg).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.flushed.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn one_tick_and_one_draw_per_frame() {
        let driver = Scripted {
            polls: vec![
                vec![],
                vec![Msg::key(Key::Enter)],
                vec![Msg::key(Key::Char('q'))],
            ],
            flushed: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 4,
            height: 2,
        });
        app.run().unwrap();

        // Frames 0..=2 ticked; frame 3 ended before its tick.
        assert!(app.model().inited);
        assert_eq!(app.model().ticks, 3);
        assert_eq!(app.model().keys, 1);
        assert!(app.driver.closed);
        // Each drawn frame changed the tick digit at the origin.
        assert_eq!(app.driver.flushed.len(), 3);
    }

    #[test]
    fn driver_error_closes_and_propagates() {
        let driver = Scripted {
            polls: vec![],
            flushed: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 1,
            height: 1,
        });
        assert!(app.run().is_err());
        assert!(app.driver.closed);
        assert_eq!(app.model().ticks, 1);
    }
}
