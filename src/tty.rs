//! The narrow slice of the terminal the demos talk to.
//!
//! Rendering code never touches stdout directly: it produces a list of
//! [`Command`]s which a [`Tty`] applies in order. Raw mode is a scoped
//! resource held by [`RawMode`].

use std::borrow::Cow;
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::error::{Error, Result};

static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// A single terminal-UI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Zero-based column and row.
    MoveTo { x: u16, y: u16 },
    HideCursor,
    ShowCursor,
    SetForeground(Rgb),
    SetBackground(Rgb),
    EraseScreen,
    ResetStyle,
    Print(Cow<'static, str>),
}

impl Command {
    fn queue(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Command::MoveTo { x, y } => queue!(out, cursor::MoveTo(*x, *y)),
            Command::HideCursor => queue!(out, cursor::Hide),
            Command::ShowCursor => queue!(out, cursor::Show),
            Command::SetForeground(c) => queue!(out, SetForegroundColor((*c).into())),
            Command::SetBackground(c) => queue!(out, SetBackgroundColor((*c).into())),
            Command::EraseScreen => queue!(out, Clear(ClearType::All)),
            Command::ResetStyle => queue!(out, ResetColor),
            Command::Print(text) => queue!(out, Print(text)),
        }
    }
}

pub trait Tty {
    /// `(columns, rows)` of the attached terminal.
    fn size(&self) -> Result<(u16, u16)>;

    /// Applies `commands` in order and flushes, so a frame is never left half written.
    fn write(&mut self, commands: &[Command]) -> Result<()>;
}

/// A [`Tty`] over any writer, sized by the terminal crossterm sees.
pub struct Screen<W: Write> {
    out: W,
}

impl Screen<io::BufWriter<io::Stdout>> {
    /// A buffered screen on stdout, flushed once per [`Tty::write`].
    pub fn stdout() -> Self {
        Screen::new(io::BufWriter::new(io::stdout()))
    }
}

impl<W: Write> Screen<W> {
    /// Wraps `out`; tests pass a `Vec<u8>` to capture the bytes.
    pub fn new(out: W) -> Self {
        Screen { out }
    }
}

impl<W: Write> Tty for Screen<W> {
    fn size(&self) -> Result<(u16, u16)> {
        terminal::size().map_err(Error::TerminalQuery)
    }

    fn write(&mut self, commands: &[Command]) -> Result<()> {
        for command in commands {
            command.queue(&mut self.out).map_err(Error::Output)?;
        }
        self.out.flush().map_err(Error::Output)
    }
}

/// Raw input mode with a hidden cursor, released when dropped.
///
/// Release happens once no matter how many paths try it (explicit
/// [`RawMode::restore`], `Drop`, the panic hook): `active` is swapped off by
/// whichever gets there first.
#[must_use = "raw mode is released as soon as the guard is dropped"]
pub struct RawMode<W: Write = io::Stdout> {
    out: W,
    active: &'static AtomicBool,
    disable: fn() -> io::Result<()>,
}

impl RawMode {
    /// Switches the process terminal into raw mode and hides the cursor.
    ///
    /// # Returns
    ///
    /// The guard holding raw mode, or [`Error::RawModeEntry`] when stdin is
    /// not a terminal.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().map_err(Error::RawModeEntry)?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        let mut guard = RawMode {
            out: io::stdout(),
            active: &RAW_MODE_ACTIVE,
            disable: terminal::disable_raw_mode,
        };

        Command::HideCursor
            .queue(&mut guard.out)
            .and_then(|()| guard.out.flush())
            .map_err(Error::Output)?;
        Ok(guard)
    }
}

impl<W: Write> RawMode<W> {
    #[cfg(test)]
    pub fn with_writer(out: W, active: &'static AtomicBool, disable: fn() -> io::Result<()>) -> Self {
        active.store(true, Ordering::SeqCst);
        RawMode {
            out,
            active,
            disable,
        }
    }

    /// Runs `body` while raw mode is held, then restores the terminal.
    ///
    /// The terminal is restored even when `body` fails; its error wins over
    /// a failure to restore.
    pub fn hold<T>(self, body: impl FnOnce() -> Result<T>) -> Result<T> {
        let outcome = body();
        let restored = self.restore();
        outcome.and_then(|value| restored.map(|()| value))
    }

    /// Like dropping the guard, but reports failures.
    pub fn restore(mut self) -> Result<()> {
        release(&mut self.out, self.active, self.disable).map_err(Error::Output)
    }
}

impl<W: Write> Drop for RawMode<W> {
    fn drop(&mut self) {
        if let Err(err) = release(&mut self.out, self.active, self.disable) {
            log::error!("failed to restore the terminal: {err}");
        }
    }
}

/// Restores the terminal before the default hook prints the panic message.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = release(&mut io::stdout(), &RAW_MODE_ACTIVE, terminal::disable_raw_mode);
        default_hook(info);
    }));
}

fn release(
    out: &mut impl Write,
    active: &AtomicBool,
    disable: fn() -> io::Result<()>,
) -> io::Result<()> {
    if !active.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    let written = [
        Command::ResetStyle,
        Command::EraseScreen,
        Command::MoveTo { x: 0, y: 0 },
        Command::ShowCursor,
    ]
    .iter()
    .try_for_each(|command| command.queue(out))
    .and_then(|()| out.flush());
    // raw mode goes even if the writer is gone
    let disabled = disable();
    written.and(disabled)
}
