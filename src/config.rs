//! Tunables for both demos.
//!
//! There are no flags or config files; everything lives here so tests can
//! build a `Config` with shorter timings.

use std::time::Duration;

use crate::tty::Rgb;

#[derive(Debug, Clone)]
pub struct Config {
    /// Frames per second of a fresh process.
    pub initial_fps: u32,
    /// Lower bound for `-`.
    pub min_fps: u32,
    /// Upper bound for `+`.
    pub max_fps: u32,
    /// Without a restart for this long, the session is re-seeded.
    pub idle_timeout: Duration,
    /// Probability of a cell starting alive.
    pub density: f64,
    /// Background of dead cells.
    pub dead_color: Rgb,
    /// Length of the context the Markov chain conditions on.
    pub markov_order: usize,
    pub markov_chars_per_sec: u32,
    pub markov_color: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_fps: 10,
            min_fps: 1,
            max_fps: 60,
            idle_timeout: Duration::from_secs(5 * 60),
            density: 0.5,
            dead_color: Rgb::new(12, 12, 20),
            markov_order: 3,
            markov_chars_per_sec: 100,
            markov_color: Rgb::new(120, 220, 140),
        }
    }
}
