//! Pointer clicks: start the game on the first click, skip pacing after.

use log::debug;

use crate::dispatch::InputDispatcher;
use crate::engine::Engine;
use crate::state::RenderState;

/// What a click did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The game started and the engine played its intro. The caller runs a
    /// paced full redraw and attaches the keyboard when it completes.
    Start,
    /// Pacing of the current redraw (if any) was skipped.
    Skip,
}

/// Gates game start and skip requests behind pointer input.
///
/// Kept apart from keyboard dispatch: a click is accepted whatever the
/// keyboard port state, including after the game has ended.
#[derive(Copy, Clone, Debug, Default)]
pub struct ClickHandler;

impl ClickHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn click<E: Engine + ?Sized>(
        &self,
        dispatcher: &mut InputDispatcher,
        engine: &mut E,
        state: &mut RenderState,
    ) -> ClickOutcome {
        if dispatcher.start() {
            state.started = true;
            debug!("game started");
            engine.intro();
            ClickOutcome::Start
        } else {
            state.pacing.skip();
            ClickOutcome::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{KeyboardPort, Lifecycle};
    use crate::engine::testing::{Call, ScriptedEngine};

    #[test]
    fn first_click_starts_then_skips() {
        let handler = ClickHandler::new();
        let mut d = InputDispatcher::new();
        let mut engine = ScriptedEngine::new(4, 2);
        let mut state = RenderState::new();

        assert_eq!(handler.click(&mut d, &mut engine, &mut state), ClickOutcome::Start);
        assert!(state.started);
        assert_eq!(d.lifecycle(), Lifecycle::Started);
        assert_eq!(engine.calls, [Call::Intro]);
        // The keyboard waits for the intro redraw to finish.
        assert_eq!(d.port(), KeyboardPort::Detached);
        assert!(state.pacing.is_enabled());

        assert_eq!(handler.click(&mut d, &mut engine, &mut state), ClickOutcome::Skip);
        assert!(!state.pacing.is_enabled());
        assert_eq!(engine.calls, [Call::Intro]);
    }
}
