use std::io;

use thiserror::Error;

/// Everything that can end a demo run early.
///
/// None of these are recoverable: the caller restores the terminal and exits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to query the terminal size (is stdout a terminal?)")]
    TerminalQuery(#[source] io::Error),
    #[error("failed to switch the terminal into raw mode")]
    RawModeEntry(#[source] io::Error),
    #[error("reading keyboard input failed")]
    InputStream(#[source] io::Error),
    #[error("writing to the terminal failed")]
    Output(#[source] io::Error),
    #[error("a {columns}x{rows} terminal is too small to hold a grid")]
    TerminalTooSmall { columns: u16, rows: u16 },
    #[error("unknown demo `{0}` (expected `game-of-life` or `markode`)")]
    UnknownDemo(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
