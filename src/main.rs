//! # ttyart
//!
//! Terminal art demos rendered with raw ANSI output.
//!
//! ## Demos
//!
//! * `game-of-life` (default): Conway's Game of Life on a wrapping grid that
//!   fills the terminal, re-seeded whenever it settles down
//! * `markode`: text generated by a Markov chain trained on its own source
//!
//! ## Controls (Game of Life)
//!
//! * `+` / `-`: faster / slower
//! * `q` or Ctrl-C: quit
//! * any other key: restart with a new random grid

use std::{error::Error as _, process, str::FromStr};

mod config;
mod error;
mod input;
mod life;
mod markov;
mod tty;

use config::Config;
use error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    GameOfLife,
    Markode,
}

impl FromStr for Demo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "game-of-life" => Ok(Demo::GameOfLife),
            "markode" => Ok(Demo::Markode),
            other => Err(Error::UnknownDemo(other.to_owned())),
        }
    }
}

fn run(arg: Option<&str>) -> Result<()> {
    let demo = arg.map_or(Ok(Demo::GameOfLife), |name| name.parse())?;
    log::info!("starting {demo:?}");

    let config = Config::default();
    match demo {
        Demo::GameOfLife => life::run(&config),
        Demo::Markode => markov::run(&config),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    tty::install_panic_hook();

    let arg = std::env::args().nth(1);
    if let Err(err) = run(arg.as_deref()) {
        eprintln!("error: {err}");
        if let Some(source) = err.source() {
            eprintln!("  caused by: {source}");
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_names() {
        assert_eq!("game-of-life".parse::<Demo>().unwrap(), Demo::GameOfLife);
        assert_eq!("markode".parse::<Demo>().unwrap(), Demo::Markode);
    }

    #[test]
    fn test_unknown_demo_is_an_error() {
        let err = run(Some("algolight")).unwrap_err();
        assert!(matches!(err, Error::UnknownDemo(ref name) if name == "algolight"));
        assert_eq!(
            err.to_string(),
            "unknown demo `algolight` (expected `game-of-life` or `markode`)"
        );
    }
}
