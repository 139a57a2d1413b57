//! The Game of Life control loop.
//!
//! [`Controller`] is the state machine: it owns the session and decides what
//! each event does to it, without touching the terminal or the clock. [`run`]
//! drives it, waiting on the frame timer, the idle timer and the keyboard at
//! once and applying the controller's answer.

use std::fmt;

use crossbeam_channel::{after, never, select, tick};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{System, SystemExt};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{self, Key, Keys};
use crate::tty::{Command, RawMode, Screen, Tty};

use super::grid;
use super::render::{self, BANNER_LINES};
use super::session::{Progress, Session};

/// Why a new session is being seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reset {
    Start,
    Key,
    Converged,
    Stalled,
    Idle,
}

impl fmt::Display for Reset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reset::Start => "start",
            Reset::Key => "restart key",
            Reset::Converged => "no cell changed",
            Reset::Stalled => "population repeated",
            Reset::Idle => "idle timeout",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Seeding(Reset),
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    IdleTimeout,
    Key(Key),
}

/// What the driver has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Draw the new generation.
    Render,
    /// The frame rate changed; restart the frame timer.
    Retime,
    /// Seed a fresh session.
    Reset(Reset),
    Quit,
    /// The event means nothing in the current state.
    Ignore,
}

/// The Game of Life state machine.
///
/// Owns the only session; nothing else keeps a reference across events.
pub struct Controller<R> {
    config: Config,
    rng: R,
    state: State,
    session: Option<Session>,
    runs: u64,
}

impl<R: Rng> Controller<R> {
    /// Creates a controller waiting to seed its first session.
    ///
    /// # Arguments
    ///
    /// * `config` - Timings, bounds and colors
    /// * `rng` - Seeds every session; pass a seeded RNG for reproducible runs
    pub fn new(config: Config, rng: R) -> Self {
        Controller {
            config,
            rng,
            state: State::Seeding(Reset::Start),
            session: None,
            runs: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The running session, `None` until the first seeding.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the session with a freshly seeded one sized for a
    /// `columns` x `rows` terminal and starts running it.
    ///
    /// The frame rate carries over from the previous session.
    ///
    /// # Returns
    ///
    /// The new session, or [`Error::TerminalTooSmall`] when the grid would
    /// have no columns or no rows.
    pub fn seed(&mut self, columns: u16, rows: u16) -> Result<&Session> {
        let width = usize::from(columns) / 2;
        let height = usize::from(rows).saturating_sub(BANNER_LINES);
        if width == 0 || height == 0 {
            return Err(Error::TerminalTooSmall { columns, rows });
        }

        let fps = self
            .session
            .as_ref()
            .map_or(self.config.initial_fps, |session| session.fps);
        let grid = grid::seed(width, height, self.config.density, &mut self.rng);
        self.runs += 1;
        self.state = State::Running;
        Ok(self.session.insert(Session::new(grid, self.runs, fps)))
    }

    /// Applies one event to the running session.
    ///
    /// # Returns
    ///
    /// What the driver must do next. Outside [`State::Running`] every event
    /// is [`Transition::Ignore`]d.
    pub fn handle(&mut self, event: Event) -> Transition {
        if self.state != State::Running {
            return Transition::Ignore;
        }
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignore;
        };

        match event {
            Event::Tick => match session.advance() {
                Progress::Running => Transition::Render,
                Progress::Converged => self.reset(Reset::Converged),
                Progress::Stalled => self.reset(Reset::Stalled),
            },
            Event::Key(Key::Char('+')) => {
                session.speed_up(self.config.max_fps);
                debug!("speed set to {} fps", session.fps);
                Transition::Retime
            }
            Event::Key(Key::Char('-')) => {
                session.slow_down(self.config.min_fps);
                debug!("speed set to {} fps", session.fps);
                Transition::Retime
            }
            Event::Key(Key::Char('q') | Key::Interrupt) => {
                self.state = State::Terminated;
                Transition::Quit
            }
            Event::Key(_) => self.reset(Reset::Key),
            Event::IdleTimeout => self.reset(Reset::Idle),
        }
    }

    /// Records the latest memory reading for the banner.
    pub fn sample_memory(&mut self, mib: u64) {
        if let Some(session) = self.session.as_mut() {
            session.memory_mib = mib;
        }
    }

    fn reset(&mut self, reason: Reset) -> Transition {
        if let Some(session) = &self.session {
            info!(
                "run {} ended after {} generations: {reason}",
                session.run, session.generation
            );
        }
        self.state = State::Seeding(reason);
        Transition::Reset(reason)
    }
}

struct MemoryGauge {
    system: System,
}

impl MemoryGauge {
    fn new() -> Self {
        MemoryGauge {
            system: System::new(),
        }
    }

    fn used_mib(&mut self) -> u64 {
        self.system.refresh_memory();
        self.system.used_memory() / (1024 * 1024)
    }
}

/// Runs the Game of Life demo until `q`, Ctrl-C or a fatal error.
///
/// Raw mode is held for the whole run, across restarts, and released on
/// every way out.
pub fn run(config: &Config) -> Result<()> {
    RawMode::enter()?.hold(|| {
        let keys = input::spawn_listener()?;
        let mut controller = Controller::new(config.clone(), StdRng::from_entropy());
        drive(&mut controller, &mut Screen::stdout(), &keys)
    })
}

fn drive<R: Rng, T: Tty>(controller: &mut Controller<R>, tty: &mut T, keys: &Keys) -> Result<()> {
    let mut memory = MemoryGauge::new();
    let mut frames = never();
    let mut idle = never();

    loop {
        match controller.state() {
            State::Seeding(reason) => {
                let (columns, rows) = tty.size()?;
                let session = controller.seed(columns, rows)?;
                info!(
                    "run {} seeded ({reason}): {}x{} cells, population {}",
                    session.run,
                    session.grid.width(),
                    session.grid.height(),
                    session.population
                );
                frames = tick(session.frame_interval());
                idle = after(controller.config().idle_timeout);

                tty.write(&[Command::EraseScreen])?;
                draw(controller, tty, &mut memory)?;
            }
            State::Running => {
                let event = select! {
                    recv(frames) -> _ => Event::Tick,
                    recv(idle) -> _ => Event::IdleTimeout,
                    recv(keys) -> key => match key {
                        Ok(Ok(key)) => Event::Key(key),
                        Ok(Err(err)) => return Err(Error::InputStream(err)),
                        Err(_) => return Err(input::listener_gone()),
                    },
                };

                match controller.handle(event) {
                    Transition::Render => draw(controller, tty, &mut memory)?,
                    Transition::Retime => {
                        if let Some(session) = controller.session() {
                            frames = tick(session.frame_interval());
                        }
                    }
                    Transition::Reset(_) | Transition::Ignore => {}
                    Transition::Quit => info!("quit requested"),
                }
            }
            State::Terminated => return Ok(()),
        }
    }
}

fn draw<R: Rng, T: Tty>(
    controller: &mut Controller<R>,
    tty: &mut T,
    memory: &mut MemoryGauge,
) -> Result<()> {
    controller.sample_memory(memory.used_mib());
    match controller.session() {
        Some(session) => tty.write(&render::draw(session, controller.config().dead_color)),
        None => Ok(()),
    }
}
