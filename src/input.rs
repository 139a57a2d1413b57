//! Background keyboard listener.
//!
//! One thread blocks on terminal input and forwards every key press into a
//! single-slot queue. A read failure is forwarded as the last item instead of
//! tearing the thread down silently, so the consumer decides how to shut down.

use std::io;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Ctrl-C. Raw mode swallows the signal, so it arrives as a key.
    Interrupt,
    /// Anything without a printable character: arrows, enter, escape...
    Other,
}

pub type Keys = Receiver<io::Result<Key>>;

/// Starts the listener on stdin. Only valid while raw mode is active.
pub fn spawn_listener() -> Result<Keys> {
    let (tx, rx) = bounded(1);
    thread::Builder::new()
        .name("input".into())
        .spawn(move || listen(&tx, event::read))
        .map_err(Error::InputStream)?;
    Ok(rx)
}

/// The error for a queue whose listener has exited without reporting why.
pub fn listener_gone() -> Error {
    Error::InputStream(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input listener stopped",
    ))
}

fn listen(tx: &Sender<io::Result<Key>>, mut read: impl FnMut() -> io::Result<Event>) {
    loop {
        match read() {
            Ok(event) => {
                let Some(key) = translate(event) else {
                    continue;
                };
                if tx.send(Ok(key)).is_err() {
                    debug!("input consumer is gone, listener exiting");
                    return;
                }
            }
            Err(err) => {
                // main reports it once the terminal is restored
                debug!("terminal input failed: {err}");
                let _ = tx.send(Err(err));
                return;
            }
        }
    }
}

fn translate(event: Event) -> Option<Key> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    Some(match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    })
}
