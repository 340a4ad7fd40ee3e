//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::grid::{Grid, compute_frame};
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
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command whose optional message is fed back to the model.
    Cmd(Box<dyn FnOnce() -> Option<Msg>>),
    /// Multiple effects, run in order.
    Batch(Vec<Effect>),
    /// Stop the application loop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &Grid);
}

/// Back-end driver (terminal, window, ...).
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`. Returns after a
    /// short wait when nothing is pending.
    fn poll_msgs(&mut self, ctx: &Context, tx: Sender<Msg>)
    -> Result<(), Box<dyn std::error::Error>>;

    /// Flush the changed cells of a frame to the screen.
    fn flush(&mut self, frame: crate::grid::Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the host (terminal modes, cursor, ...).
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
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

    /// Run the Model-View-Update loop until the model returns
    /// [`Effect::End`] or the driver fails.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Grid::new(self.width, self.height);
        let mut curr = Grid::new(self.width, self.height);

        let result = loop {
            if let Err(e) = self.process_pending(&rx, &ctx, &mut prev, &mut curr) {
                break Err(e);
            }
            if ctx.is_done() {
                break Ok(());
            }
            if let Err(e) = self.driver.poll_msgs(&ctx, tx.clone()) {
                ctx.cancel();
                break Err(e);
            }
        };

        self.driver.close();
        log::debug!("application loop stopped");
        result
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev: &mut Grid,
        curr: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut queue: VecDeque<Msg> = rx.try_iter().collect();
        if queue.is_empty() {
            return Ok(());
        }

        while let Some(msg) = queue.pop_front() {
            if let Msg::Screen { width, height, .. } = msg {
                if (width, height) != (self.width, self.height) {
                    self.width = width;
                    self.height = height;
                    *prev = Grid::new(width, height);
                    *curr = Grid::new(width, height);
                }
            }
            if let Some(effect) = self.model.update(msg) {
                if run_effect(effect, &mut queue) {
                    ctx.cancel();
                    return Ok(());
                }
            }
        }

        curr.fill(Default::default());
        self.model.draw(curr);
        let frame = compute_frame(prev, curr);
        if !frame.cells.is_empty() {
            self.driver.flush(frame)?;
        }
        prev.copy_from(curr);
        Ok(())
    }
}

/// Run `effect`, queueing any follow-up messages. Returns `true` when the
/// application should stop.
fn run_effect(effect: Effect, queue: &mut VecDeque<Msg>) -> bool {
    match effect {
        Effect::End => true,
        Effect::Cmd(f) => {
            if let Some(msg) = f() {
                queue.push_back(msg);
            }
            false
        }
        Effect::Batch(effects) => effects.into_iter().any(|e| run_effect(e, queue)),
    }
}
