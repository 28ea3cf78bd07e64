//! A small number-guessing adventure played at the command prompt.

use log::debug;
use rand::RngExt;
use tileterm_core::Engine;

use crate::terminal::Terminal;
use crate::{DELAY_TIME, HEIGHT, NUM_TILES, TILE_SIZE, WIDTH};

/// Largest number the computer may pick.
pub const MAX_SECRET: u32 = 100;

/// Guesses allowed before the game is lost.
pub const MAX_TRIES: u32 = 7;

const CONTINUE: u8 = 0;
const WIN: u8 = 1;
const LOSE: u8 = 2;

const TITLE: &str = "\
##################################################
#                                                #
#                                                #
#                 THE VAULT DOOR                 #
#                                                #
#     A number-guessing adventure in tiles       #
#                                                #
#                                                #
#               +----------------+               #
#               | Click to start |               #
#               +----------------+               #
#                                                #
##################################################";

const INTRO: &str = "\
You stand before the vault of the old observatory.
Its dial hides a number between 1 and 100.

The lock allows only a few attempts before it
seals itself for good. Listen to the tumblers:
they tell you whether to turn higher or lower.

Enter HELP for a list of commands. Good luck!";

const HELP: &str = "\
Commands:

  GUESS n  (or G n, or just n)  turn the dial to n
  TRIES                         attempts remaining
  QUIT                          walk away

Use the arrow keys to edit the line and to recall
earlier commands.";

pub struct GuessGame {
    term: Terminal,
    secret: u32,
    tries: u32,
    last: Option<u32>,
}

impl GuessGame {
    /// A game with a random secret.
    pub fn new() -> Self {
        Self::with_secret(rand::rng().random_range(1..=MAX_SECRET))
    }

    pub fn with_secret(secret: u32) -> Self {
        let mut term = Terminal::new(WIDTH, HEIGHT);
        term.message(TITLE.as_bytes());
        Self {
            term,
            secret,
            tries: 0,
            last: None,
        }
    }

    fn remaining(&self) -> u32 {
        MAX_TRIES.saturating_sub(self.tries)
    }

    fn say(&mut self, text: &str) {
        self.term.message(text.as_bytes());
        self.term.update_console();
    }

    fn guess(&mut self, n: u32) -> u8 {
        self.tries += 1;
        self.last = Some(n);
        debug!("guess {n}, try {}", self.tries);
        if n == self.secret {
            return WIN;
        }
        if self.remaining() == 0 {
            return LOSE;
        }
        let hint = if n < self.secret { "higher" } else { "lower" };
        self.say(&format!(
            "You turn the dial to {n}.\n\nThe tumblers whisper: {hint}.\n\n{} attempts remain.",
            self.remaining()
        ));
        CONTINUE
    }

    fn run(&mut self, command: &[u8]) -> u8 {
        let line = String::from_utf8_lossy(command).to_ascii_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&verb) = words.first() else {
            return CONTINUE;
        };
        let number = words.iter().find_map(|w| w.parse::<u32>().ok());
        match (verb, number) {
            ("guess" | "g", Some(n)) => self.guess(n),
            ("guess" | "g", None) => {
                self.say("Turn the dial to which number?\n\nTry: GUESS 50");
                CONTINUE
            }
            (_, Some(n)) if words.len() == 1 => self.guess(n),
            ("help" | "h", _) => {
                self.say(HELP);
                CONTINUE
            }
            ("tries" | "t", _) => {
                let text = format!("{} attempts remain.", self.remaining());
                self.say(&text);
                CONTINUE
            }
            ("quit" | "q", _) => LOSE,
            _ => {
                let text = format!(
                    "Unrecognised command:\n\n    '{verb}'\n\nTry the HELP command for a list of possible\ncommands!"
                );
                self.say(&text);
                CONTINUE
            }
        }
    }
}

impl Default for GuessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for GuessGame {
    fn width(&self) -> usize {
        WIDTH
    }

    fn height(&self) -> usize {
        HEIGHT
    }

    fn tile_size(&self) -> usize {
        TILE_SIZE
    }

    fn num_tiles(&self) -> usize {
        NUM_TILES
    }

    fn delay_time(&self) -> u64 {
        DELAY_TIME
    }

    fn screen(&self) -> &[u8] {
        self.term.screen()
    }

    fn console(&self) -> &[u8] {
        self.term.console()
    }

    fn input(&mut self, unit: u16) {
        self.term.input(unit);
    }

    fn left(&mut self) {
        self.term.left();
    }

    fn right(&mut self) {
        self.term.right();
    }

    fn up(&mut self) {
        self.term.up();
    }

    fn down(&mut self) {
        self.term.down();
    }

    fn intro(&mut self) {
        self.say(INTRO);
    }

    fn enter(&mut self) -> u8 {
        let command = self.term.enter();
        self.run(&command)
    }

    fn win(&mut self) {
        let text = format!(
            "CLICK. The vault door swings open.\n\nThe number was {}, found in {} of {MAX_TRIES} attempts.\n\n\nTo play again, restart the game.",
            self.secret, self.tries
        );
        self.term.message(text.as_bytes());
    }

    fn lose(&mut self) {
        let last = self
            .last
            .map_or_else(|| "nothing".to_string(), |n| n.to_string());
        let text = format!(
            "The lock seals itself with a heavy thud.\n\nYour last try was {last}; the number was {}.\n\n\nTo play again, restart the game.",
            self.secret
        );
        self.term.message(text.as_bytes());
    }
}
