//! WASM browser driver for **tileterm** using Canvas 2D.
//!
//! [`WebDriver`] is an [`EventLoopDriver`] that draws a session onto an
//! HTML `<canvas>` by blitting tiles out of an atlas `<img>`, and reads
//! keystrokes from a companion `<input>` element (which also brings up the
//! on-screen keyboard on touch devices).
//!
//! # Limitations
//!
//! * The browser owns the event loop: [`EventLoopDriver::run`] installs
//!   listeners and returns immediately. The session lives as long as the
//!   page.
//! * Dramatic pauses are `setTimeout` sleeps on a single spawned task, so
//!   there is never more than one redraw in flight.
//!
//! # Quick start
//!
//! ```html
//! <canvas id="game-canvas"></canvas>
//! <input id="game-input" autocomplete="off">
//! <script type="module">
//!   import init, { start } from './pkg/my_game.js';
//!   await init();
//!   start();
//! </script>
//! ```
//!
//! ```rust,ignore
//! use tileterm_core::EventLoopDriver;
//! use tileterm_web::{WebConfig, WebDriver, init_console_log};
//! use wasm_bindgen::prelude::*;
//!
//! #[wasm_bindgen]
//! pub fn start() {
//!     init_console_log(log::LevelFilter::Info);
//!     let driver = WebDriver::new(WebConfig::default());
//!     if let Err(e) = driver.run(MyGame::new()) {
//!         log::error!("{e}");
//!     }
//! }
//! ```

mod canvas;
mod logger;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, error, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlImageElement,
    HtmlInputElement, KeyboardEvent, Window,
};

use tileterm_core::{Engine, EventLoopDriver, InputEvent, Key, Session, Size, Step};

pub use canvas::{CanvasSurface, DomEcho};
pub use logger::init_console_log;

use canvas::resize_canvas;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`WebDriver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebConfig {
    /// The `id` of the `<canvas>` element (default: `"game-canvas"`).
    pub canvas_id: String,
    /// The `id` of the `<input>` element (default: `"game-input"`).
    pub input_id: String,
    /// URL of the tile atlas image (default: `"assets/tiles_16x16.png"`).
    pub atlas_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            canvas_id: "game-canvas".into(),
            input_id: "game-input".into(),
            atlas_url: "assets/tiles_16x16.png".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global `window` or `document`")]
    NoWindow,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("element #{id} is not a <{expected}>")]
    WrongElement { id: String, expected: &'static str },
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error(transparent)]
    Core(#[from] tileterm_core::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn element<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T, Error> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(id.into()))?
        .dyn_into::<T>()
        .map_err(|_| Error::WrongElement {
            id: id.into(),
            expected,
        })
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), Error> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn viewport(window: &Window) -> Size {
    let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(px(window.inner_width()), px(window.inner_height()))
}

fn resizer(canvas: HtmlCanvasElement, window: Window) -> impl FnMut(Event) + 'static {
    move |_| {
        if let Err(e) = resize_canvas(&canvas, viewport(&window)) {
            warn!("canvas resize failed: {e:?}");
        }
    }
}

/// Resolve after `delay` via `setTimeout`.
async fn sleep(delay: Duration) {
    let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

// ---------------------------------------------------------------------------
// Shared state used inside closures
// ---------------------------------------------------------------------------

struct Runtime<E: Engine> {
    session: Session<E, CanvasSurface, DomEcho>,
    /// Whether the redraw task is running.
    pumping: bool,
}

type Shared<E> = Rc<RefCell<Runtime<E>>>;

/// Feed one event to the session and make sure a redraw it started gets
/// driven.
fn dispatch<E: Engine + 'static>(shared: &Shared<E>, event: InputEvent) {
    let spawn = {
        let Ok(mut rt) = shared.try_borrow_mut() else {
            warn!("dropping re-entrant {event:?}");
            return;
        };
        if let Err(e) = rt.session.handle(&event) {
            error!("{e}");
        }
        let spawn = !rt.pumping && rt.session.is_animating();
        if spawn {
            rt.pumping = true;
        }
        spawn
    };
    if spawn {
        spawn_local(pump(Rc::clone(shared)));
    }
}

/// Drive the in-flight redraw, sleeping through each pause. The borrow is
/// released before every await so listeners can run during pauses.
async fn pump<E: Engine + 'static>(shared: Shared<E>) {
    loop {
        let step = {
            let mut rt = shared.borrow_mut();
            let step = rt.session.advance().unwrap_or_else(|e| {
                error!("redraw aborted: {e}");
                Step::Done
            });
            if step == Step::Done {
                rt.pumping = false;
            }
            step
        };
        match step {
            Step::Pause(delay) => sleep(delay).await,
            Step::Done => break,
        }
    }
    debug!("full redraw complete");
}

// ---------------------------------------------------------------------------
// WebDriver
// ---------------------------------------------------------------------------

/// A WASM browser driver that renders a tileterm session on an HTML canvas.
///
/// Implements [`EventLoopDriver`]. See the [crate-level docs](crate) for
/// usage instructions.
pub struct WebDriver {
    config: WebConfig,
}

impl WebDriver {
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    fn install<E: Engine + 'static>(self, engine: E) -> Result<(), Error> {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoWindow)?;
        let geometry = engine.geometry().validate()?;

        // --- canvas & context -----------------------------------------------
        let canvas: HtmlCanvasElement = element(&document, &self.config.canvas_id, "canvas")?;
        canvas.set_width(geometry.pixel_width() as u32);
        canvas.set_height(geometry.pixel_height() as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or(Error::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::NoContext)?;
        let input: HtmlInputElement = element(&document, &self.config.input_id, "input")?;

        // --- CSS sizing -----------------------------------------------------
        resize_canvas(&canvas, viewport(&window))?;
        listen(&window, "resize", resizer(canvas.clone(), window.clone()))?;
        let screen = window.screen()?;
        if js_sys::Reflect::has(&screen, &JsValue::from_str("orientation")).unwrap_or(false) {
            listen(
                &screen.orientation(),
                "change",
                resizer(canvas.clone(), window.clone()),
            )?;
        } else {
            listen(
                &window,
                "orientationchange",
                resizer(canvas.clone(), window.clone()),
            )?;
        }

        // --- session --------------------------------------------------------
        let tiles = HtmlImageElement::new()?;
        let surface = CanvasSurface::new(ctx, tiles.clone(), geometry.atlas());
        let session = Session::new(engine, surface, DomEcho::new(input.clone()))?;
        let shared: Shared<E> = Rc::new(RefCell::new(Runtime {
            session,
            pumping: false,
        }));

        // The session itself ignores keys until the game has started.
        {
            let shared = Rc::clone(&shared);
            listen(&input, "keydown", move |event| {
                if let Some(e) = event.dyn_ref::<KeyboardEvent>() {
                    dispatch(&shared, InputEvent::KeyDown(Key::from_dom(&e.key())));
                }
            })?;
        }

        // --- atlas ----------------------------------------------------------
        {
            let shared = Rc::clone(&shared);
            listen(&tiles, "load", move |_| {
                if let Err(e) = shared.borrow_mut().session.start() {
                    error!("title screen failed: {e}");
                    return;
                }
                info!("atlas loaded, waiting for a click");
                let clicks = Rc::clone(&shared);
                let installed = listen(&canvas, "click", move |_| {
                    dispatch(&clicks, InputEvent::Click);
                });
                if let Err(e) = installed {
                    error!("{e}");
                }
            })?;
        }
        {
            let url = self.config.atlas_url.clone();
            listen(&tiles, "error", move |_| error!("failed to load atlas {url}"))?;
        }
        tiles.set_src(&self.config.atlas_url);
        Ok(())
    }
}

impl EventLoopDriver for WebDriver {
    fn run<E: Engine + 'static>(self, engine: E) -> Result<(), Box<dyn std::error::Error>> {
        self.install(engine)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_element_ids() {
        let config = WebConfig::default();
        assert_eq!(config.canvas_id, "game-canvas");
        assert_eq!(config.input_id, "game-input");
        assert_eq!(config.atlas_url, "assets/tiles_16x16.png");
    }
}
