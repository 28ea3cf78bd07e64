//! Winit graphical backend for tileterm.
//!
//! Renders the tile grid in a native window using:
//! - [`winit`] for window creation, input events and timed wake-ups
//! - [`softbuffer`] for CPU-based pixel presentation
//! - [`image`] for decoding the tile atlas
//!
//! The session's pixel surface always has the grid's native resolution;
//! the window shows it scaled according to
//! [`Presentation`](tileterm_core::Presentation).
//!
//! # Usage
//!
//! ```rust,no_run
//! use tileterm_core::{Engine, EventLoopDriver};
//! use tileterm_winit::{WinitConfig, WinitDriver};
//!
//! fn play(engine: impl Engine + 'static) -> Result<(), Box<dyn std::error::Error>> {
//!     WinitDriver::new(WinitConfig::default()).run(engine)
//! }
//! ```

mod atlas;
mod input;
mod renderer;

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use tileterm_core::{
    Engine, EventLoopDriver, InputEvent, NoEcho, PixelSurface, Session, Size, Step,
};

pub use atlas::load_atlas;
use renderer::Presenter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where the tile atlas comes from.
#[derive(Clone, Debug, Default)]
pub enum AtlasSource {
    /// A PNG file on disk.
    File(PathBuf),
    /// Encoded image bytes, e.g. from `include_bytes!`.
    Bytes(Vec<u8>),
    /// A generated sheet; see [`tileterm_core::TileAtlas::procedural`].
    #[default]
    Procedural,
}

/// Configuration for the winit driver.
#[derive(Clone, Debug)]
pub struct WinitConfig {
    /// Window title.
    pub title: String,
    /// Tile atlas image.
    pub atlas: AtlasSource,
}

impl Default for WinitConfig {
    fn default() -> Self {
        Self {
            title: "tileterm".into(),
            atlas: AtlasSource::Procedural,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("softbuffer: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
    #[error("atlas image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Core(#[from] tileterm_core::Error),
}

// ---------------------------------------------------------------------------
// WinitDriver
// ---------------------------------------------------------------------------

/// Winit-based graphical driver.
///
/// Implements [`EventLoopDriver`]: it owns the main-thread event loop and
/// drives a [`Session`] until the window is closed.
pub struct WinitDriver {
    config: WinitConfig,
}

impl WinitDriver {
    pub fn new(config: WinitConfig) -> Self {
        Self { config }
    }
}

impl EventLoopDriver for WinitDriver {
    fn run<E: Engine + 'static>(self, engine: E) -> Result<(), Box<dyn std::error::Error>> {
        let geometry = engine.geometry().validate()?;
        let atlas = load_atlas(&self.config.atlas, geometry.atlas())?;
        let surface = PixelSurface::new(atlas, geometry);
        let session = Session::new(engine, surface, NoEcho)?;

        let event_loop = EventLoop::new()?;
        let mut app = WinitApp::new(self.config.title, session);
        event_loop.run_app(&mut app)?;
        match app.error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// WinitApp: ApplicationHandler
// ---------------------------------------------------------------------------

struct WinitApp<E: Engine> {
    title: String,
    session: Session<E, PixelSurface, NoEcho>,
    state: Option<WinitState>,
    /// End of the pause handed out by the last `advance`.
    deadline: Option<Instant>,
    error: Option<Error>,
}

struct WinitState {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    presenter: Presenter,
    size: PhysicalSize<u32>,
}

impl<E: Engine> WinitApp<E> {
    fn new(title: String, session: Session<E, PixelSurface, NoEcho>) -> Self {
        Self {
            title,
            session,
            state: None,
            deadline: None,
            error: None,
        }
    }

    fn native_size(&self) -> Size {
        let g = self.session.geometry();
        Size::new(g.pixel_width() as f64, g.pixel_height() as f64)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: Error) {
        error!("{e}");
        if self.error.is_none() {
            self.error = Some(e);
        }
        event_loop.exit();
    }

    fn create_state(&self, event_loop: &ActiveEventLoop) -> Result<WinitState, Error> {
        let native = self.native_size();
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(native.width, native.height))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let context = softbuffer::Context::new(window.clone())?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())?;
        let size = window.inner_size();
        resize_surface(&mut surface, size)?;

        let mut presenter = Presenter::new();
        presenter.resize(size, window.scale_factor(), native);
        Ok(WinitState {
            window,
            surface,
            presenter,
            size,
        })
    }

    /// Advance the in-flight redraw if its pause has elapsed. A pause that
    /// has begun always runs to its deadline, even when pacing was skipped
    /// meanwhile.
    fn pump(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(deadline) = self.deadline {
            if Instant::now() < deadline {
                return;
            }
            self.deadline = None;
        }
        if !self.session.is_animating() {
            return;
        }
        match self.session.advance() {
            Ok(Step::Pause(delay)) => self.deadline = Some(Instant::now() + delay),
            Ok(Step::Done) => debug!("full redraw complete"),
            Err(e) => self.fail(event_loop, e.into()),
        }
        self.request_redraw();
    }

    fn handle(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        if let Err(e) = self.session.handle(&event) {
            self.fail(event_loop, e.into());
            return;
        }
        self.pump(event_loop);
        self.request_redraw();
    }

    fn request_redraw(&self) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }

    fn present(&mut self) -> Result<(), Error> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let (width, height) = (state.size.width as usize, state.size.height as usize);
        if width == 0 || height == 0 {
            return Ok(());
        }
        let src = self.session.surface();
        let mut buf = state.surface.buffer_mut()?;
        state.presenter.blit(
            src.pixels(),
            src.pixel_width(),
            src.pixel_height(),
            &mut buf,
            width,
            height,
        );
        buf.present()?;
        Ok(())
    }

    fn relayout(&mut self) {
        let native = self.native_size();
        if let Some(state) = self.state.as_mut() {
            state
                .presenter
                .resize(state.size, state.window.scale_factor(), native);
            state.window.request_redraw();
        }
    }
}

fn resize_surface(
    surface: &mut softbuffer::Surface<Arc<Window>, Arc<Window>>,
    size: PhysicalSize<u32>,
) -> Result<(), Error> {
    let one = NonZeroU32::MIN;
    surface.resize(
        NonZeroU32::new(size.width).unwrap_or(one),
        NonZeroU32::new(size.height).unwrap_or(one),
    )?;
    Ok(())
}

impl<E: Engine> ApplicationHandler for WinitApp<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return; // already initialized
        }
        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => return self.fail(event_loop, e),
        }
        if !self.session.is_ready() {
            info!("drawing title screen");
            if let Err(e) = self.session.start() {
                return self.fail(event_loop, e.into());
            }
        }
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.size = size;
                    if let Err(e) = resize_surface(&mut state.surface, size) {
                        return self.fail(event_loop, e);
                    }
                }
                self.relayout();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                debug!("scale factor changed to {scale_factor}");
                self.relayout();
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.present() {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(ev) = input::translate_keyboard(&event) {
                    self.handle(event_loop, ev);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(ev) = input::translate_mouse_button(state, button) {
                    self.handle(event_loop, ev);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pump(event_loop);
        match self.deadline {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
