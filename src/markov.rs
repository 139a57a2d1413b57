//! Markov-chain text demo.
//!
//! Streams characters sampled from a chain trained on this very file, so the
//! output reads like a garbled copy of its own source.

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crossbeam_channel::{select, tick};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{self, Key, Keys};
use crate::tty::{Command, RawMode, Rgb, Screen, Tty};

const CORPUS: &str = include_str!("markov.rs");

/// Maps every `order`-character context of a corpus to the characters that
/// followed it, duplicates included so sampling follows their frequency.
#[derive(Debug)]
pub struct Chain {
    order: usize,
    followers: HashMap<Vec<char>, Vec<char>>,
}

impl Chain {
    pub fn new(corpus: &str, order: usize) -> Chain {
        let chars: Vec<char> = corpus.chars().collect();
        let mut followers: HashMap<Vec<char>, Vec<char>> = HashMap::new();
        for window in chars.windows(order + 1) {
            let (context, next) = window.split_at(order);
            followers.entry(context.to_vec()).or_default().push(next[0]);
        }
        Chain { order, followers }
    }

    /// Samples the character following the last `order` characters of `recent`.
    ///
    /// A context never seen in the corpus yields a newline.
    pub fn next<R: Rng + ?Sized>(&self, recent: &[char], rng: &mut R) -> char {
        let context = &recent[recent.len().saturating_sub(self.order)..];
        self.followers
            .get(context)
            .and_then(|options| options.choose(rng))
            .copied()
            .unwrap_or('\n')
    }
}

/// Keeps the sliding context and feeds it back into the chain.
pub struct Writer {
    chain: Chain,
    recent: VecDeque<char>,
}

impl Writer {
    /// Starts from the first `order` characters of `corpus`.
    pub fn new(chain: Chain, corpus: &str) -> Writer {
        let recent = corpus.chars().take(chain.order).collect();
        Writer { chain, recent }
    }

    pub fn recent(&self) -> String {
        self.recent.iter().collect()
    }

    pub fn emit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> char {
        let c = self.chain.next(self.recent.make_contiguous(), rng);
        if self.recent.len() >= self.chain.order {
            self.recent.pop_front();
        }
        if self.chain.order > 0 {
            self.recent.push_back(c);
        }
        c
    }
}

/// Runs the Markov demo until `q` or Ctrl-C.
pub fn run(config: &Config) -> Result<()> {
    RawMode::enter()?.hold(|| {
        let keys = input::spawn_listener()?;
        let chain = Chain::new(CORPUS, config.markov_order);
        info!("markov chain built with {} contexts", chain.followers.len());
        let mut writer = Writer::new(chain, CORPUS);
        let interval = Duration::from_secs(1) / config.markov_chars_per_sec.max(1);
        stream(
            &mut writer,
            &mut StdRng::from_entropy(),
            &mut Screen::stdout(),
            &keys,
            interval,
            config.markov_color,
        )
    })
}

fn stream<R: Rng, T: Tty>(
    writer: &mut Writer,
    rng: &mut R,
    tty: &mut T,
    keys: &Keys,
    interval: Duration,
    color: Rgb,
) -> Result<()> {
    let mut start = vec![
        Command::ResetStyle,
        Command::MoveTo { x: 0, y: 0 },
        Command::EraseScreen,
        Command::SetForeground(color),
    ];
    start.extend(writer.recent().chars().map(|c| Command::Print(printable(c))));
    tty.write(&start)?;

    let ticks = tick(interval);
    loop {
        select! {
            recv(ticks) -> _ => {
                let c = writer.emit(rng);
                tty.write(&[Command::Print(printable(c))])?;
            }
            recv(keys) -> key => match key {
                Ok(Ok(Key::Char('q') | Key::Interrupt)) => return Ok(()),
                Ok(Ok(_)) => {}
                Ok(Err(err)) => return Err(Error::InputStream(err)),
                Err(_) => return Err(input::listener_gone()),
            },
        }
    }
}

// raw mode turns off output processing, so a bare LF would not return the carriage
fn printable(c: char) -> Cow<'static, str> {
    match c {
        '\n' => Cow::Borrowed("\r\n"),
        c => Cow::Owned(c.to_string()),
    }
}
