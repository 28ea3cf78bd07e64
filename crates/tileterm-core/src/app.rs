//! The session runner: [`Session`] and [`EventLoopDriver`].
//!
//! A [`Session`] owns the engine, the render pipeline, the echo element and
//! all per-session state. Drivers feed it input events and call
//! [`Session::advance`] whenever a pause it handed out has elapsed.

use log::{debug, warn};

use crate::click::{ClickHandler, ClickOutcome};
use crate::dispatch::{InputDispatcher, Lifecycle, Redraw};
use crate::engine::{Engine, Geometry};
use crate::error::Result;
use crate::input::{Echo, InputEvent, Key};
use crate::pipeline::{FullRedraw, Pause, RenderPipeline, Step};
use crate::state::RenderState;
use crate::surface::TileSurface;

// ---------------------------------------------------------------------------
// EventLoopDriver
// ---------------------------------------------------------------------------

/// A back-end that owns the platform event loop and runs a session for
/// `engine` until the user leaves.
pub trait EventLoopDriver {
    fn run<E: Engine + 'static>(self, engine: E) -> Result<(), Box<dyn std::error::Error>>;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What happens once the in-flight full redraw completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AfterRedraw {
    Nothing,
    AttachKeyboard,
}

#[derive(Debug)]
struct ActiveRedraw {
    job: FullRedraw,
    then: AfterRedraw,
}

/// One game session: engine, pipeline, state and input handling.
pub struct Session<E: Engine, S: TileSurface, O: Echo> {
    engine: E,
    pipeline: RenderPipeline<S>,
    echo: O,
    state: RenderState,
    dispatcher: InputDispatcher,
    clicks: ClickHandler,
    active: Option<ActiveRedraw>,
    ready: bool,
}

impl<E: Engine, S: TileSurface, O: Echo> Session<E, S, O> {
    /// Create a session; the engine's geometry must describe a non-empty
    /// grid.
    pub fn new(engine: E, surface: S, echo: O) -> Result<Self> {
        let geometry = engine.geometry().validate()?;
        debug!(
            "session {}x{} tiles of {}px, delay {}ms",
            geometry.width, geometry.height, geometry.tile_size, geometry.delay_ms
        );
        Ok(Self {
            engine,
            pipeline: RenderPipeline::new(surface, geometry),
            echo,
            state: RenderState::new(),
            dispatcher: InputDispatcher::new(),
            clicks: ClickHandler::new(),
            active: None,
            ready: false,
        })
    }

    /// Draw the engine's initial screen without pacing and begin accepting
    /// clicks.
    pub fn start(&mut self) -> Result<()> {
        self.begin_full(false, AfterRedraw::Nothing);
        // Unpaced redraws never pause, so one advance completes them.
        self.advance()?;
        self.ready = true;
        Ok(())
    }

    /// Route one input event.
    pub fn handle(&mut self, event: &InputEvent) -> Result<()> {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::Click => self.click(),
        }
    }

    /// Handle a keydown. Keys the dispatcher is not subscribed to are
    /// dropped before reaching the engine or the echo element.
    pub fn key_down(&mut self, key: &Key) -> Result<()> {
        if !self.dispatcher.accepts(&self.state) {
            return Ok(());
        }
        let redraw = self
            .dispatcher
            .key_down(key, &mut self.engine, &self.state);
        self.echo.clear();
        match redraw? {
            Redraw::None => {}
            Redraw::Console => self.pipeline.render_console(&self.engine)?,
            Redraw::Full { paced } => self.begin_full(paced, AfterRedraw::Nothing),
        }
        Ok(())
    }

    /// Handle a primary click: start the game, or skip pacing.
    pub fn click(&mut self) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        self.echo.focus();
        let outcome = self
            .clicks
            .click(&mut self.dispatcher, &mut self.engine, &mut self.state);
        if outcome == ClickOutcome::Start {
            self.begin_full(true, AfterRedraw::AttachKeyboard);
        }
        Ok(())
    }

    /// Drive the in-flight full redraw to its next pause or to completion.
    /// Returns [`Step::Done`] when nothing is being drawn.
    ///
    /// After a [`Step::Pause`] the caller must wait the full delay before
    /// calling again.
    pub fn advance(&mut self) -> Result<Step> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Step::Done);
        };
        let result = self
            .pipeline
            .advance(&mut active.job, &self.engine, &mut self.state);
        match result {
            Ok(Step::Pause(delay)) => Ok(Step::Pause(delay)),
            Ok(Step::Done) => {
                self.complete();
                Ok(Step::Done)
            }
            Err(e) => {
                self.complete();
                Err(e)
            }
        }
    }

    /// Run the in-flight redraw to completion on this thread.
    pub fn finish_blocking<P: Pause>(&mut self, pause: &mut P) -> Result<()> {
        while let Step::Pause(delay) = self.advance()? {
            pause.pause(delay);
        }
        Ok(())
    }

    fn begin_full(&mut self, paced: bool, then: AfterRedraw) {
        if self.active.is_some() {
            // Only reachable if a driver bypasses the dispatcher.
            warn!("full redraw requested while another is in flight");
        }
        let job = self.pipeline.begin_full(&mut self.state, paced);
        self.active = Some(ActiveRedraw { job, then });
    }

    fn complete(&mut self) {
        if let Some(active) = self.active.take() {
            if active.then == AfterRedraw::AttachKeyboard {
                self.dispatcher.attach();
            }
        }
    }

    /// Whether a full redraw is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Whether clicks are accepted yet.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.pipeline.geometry()
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.dispatcher.lifecycle()
    }

    #[inline]
    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn surface(&self) -> &S {
        self.pipeline.surface()
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        self.pipeline.surface_mut()
    }

    #[inline]
    pub fn echo(&self) -> &O {
        &self.echo
    }
}
