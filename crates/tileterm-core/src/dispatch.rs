//! Keyboard dispatch: the game lifecycle and the keydown rule table.

use log::{debug, warn};

use crate::engine::{Engine, SPACE};
use crate::error::Result;
use crate::input::{Key, utf16_unit};
use crate::state::RenderState;

/// Game lifecycle. `Ended` is terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    #[default]
    NotStarted,
    Started,
    Ended,
}

/// The subscription through which keydown events reach the dispatcher.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyboardPort {
    /// Not subscribed yet: before the game starts and during the intro.
    #[default]
    Detached,
    /// Keys are dispatched.
    Attached,
    /// Unsubscribed for good after the game ended.
    Closed,
}

/// What the session must redraw after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Redraw {
    None,
    Console,
    Full { paced: bool },
}

/// Result of evaluating a command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnterStatus {
    Continue,
    Win,
    Lose,
}

impl EnterStatus {
    /// Interpret a raw engine status. Codes other than `0`, `1` and `2` are
    /// treated as a loss.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Continue,
            1 => Self::Win,
            2 => Self::Lose,
            other => {
                warn!("engine returned unknown status {other}, treating as lose");
                Self::Lose
            }
        }
    }
}

/// Routes keydown events to engine operations.
#[derive(Clone, Debug, Default)]
pub struct InputDispatcher {
    lifecycle: Lifecycle,
    port: KeyboardPort,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn port(&self) -> KeyboardPort {
        self.port
    }

    /// Move from `NotStarted` to `Started`. Returns `false` if the game
    /// had already started.
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::NotStarted {
            return false;
        }
        self.lifecycle = Lifecycle::Started;
        true
    }

    /// Subscribe to keyboard events. A closed port stays closed.
    pub fn attach(&mut self) {
        if self.port == KeyboardPort::Detached && self.lifecycle == Lifecycle::Started {
            debug!("keyboard attached");
            self.port = KeyboardPort::Attached;
        }
    }

    /// Whether a keydown would reach the rule table at all.
    ///
    /// Once started, keys pressed while the intro is still being drawn are
    /// let through so they can skip its pacing.
    pub fn accepts(&self, state: &RenderState) -> bool {
        match self.port {
            KeyboardPort::Attached => true,
            KeyboardPort::Detached => {
                self.lifecycle == Lifecycle::Started && state.draw_in_progress
            }
            KeyboardPort::Closed => false,
        }
    }

    /// Dispatch one keydown.
    ///
    /// Callers check [`accepts`](Self::accepts) first; a key that is not
    /// accepted is dropped here without touching the engine.
    pub fn key_down<E: Engine + ?Sized>(
        &mut self,
        key: &Key,
        engine: &mut E,
        state: &RenderState,
    ) -> Result<Redraw> {
        if !self.accepts(state) {
            return Ok(Redraw::None);
        }
        if state.draw_in_progress {
            state.pacing.skip();
            return Ok(Redraw::None);
        }
        if self.port != KeyboardPort::Attached {
            return Ok(Redraw::None);
        }

        let redraw = match key {
            Key::Char(c) => {
                engine.input(utf16_unit(*c));
                Redraw::Console
            }
            Key::ArrowLeft => {
                engine.left();
                Redraw::Console
            }
            Key::ArrowRight => {
                engine.right();
                Redraw::Console
            }
            Key::ArrowUp => {
                engine.up();
                Redraw::Console
            }
            Key::ArrowDown => {
                engine.down();
                Redraw::Console
            }
            Key::Backspace => {
                engine.left();
                engine.input(u16::from(SPACE));
                engine.left();
                Redraw::Console
            }
            Key::Delete => {
                engine.input(u16::from(SPACE));
                Redraw::Console
            }
            Key::Enter => {
                match EnterStatus::from_code(engine.enter()) {
                    EnterStatus::Continue => {}
                    status => self.end(status, engine),
                }
                Redraw::Full { paced: true }
            }
            _ => Redraw::None,
        };
        Ok(redraw)
    }

    fn end<E: Engine + ?Sized>(&mut self, status: EnterStatus, engine: &mut E) {
        if status == EnterStatus::Win {
            engine.win();
        } else {
            engine.lose();
        }
        debug!("game over: {status:?}");
        self.lifecycle = Lifecycle::Ended;
        self.port = KeyboardPort::Closed;
    }
}
