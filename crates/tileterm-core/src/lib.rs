//! **tileterm-core**: presentation and input layer for tile-based text games.
//!
//! This crate turns the byte-addressable screen produced by an [`Engine`]
//! into paced, interruptible tile draws, and routes keyboard and pointer
//! input back into engine operations. It is platform-agnostic: the
//! `tileterm-winit` and `tileterm-web` crates supply concrete surfaces and
//! event loops.

pub mod app;
pub mod atlas;
pub mod click;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod geom;
pub mod input;
pub mod pipeline;
pub mod state;
pub mod surface;
pub mod viewport;

pub use app::{EventLoopDriver, Session};
pub use atlas::{AtlasGeometry, TileAtlas};
pub use click::{ClickHandler, ClickOutcome};
pub use dispatch::{EnterStatus, InputDispatcher, KeyboardPort, Lifecycle, Redraw};
pub use engine::{ConsoleView, Engine, Geometry, ScreenView, is_blank};
pub use error::{Error, Result};
pub use geom::{Rect, Size};
pub use input::{Echo, InputEvent, Key, NoEcho};
pub use pipeline::{FullRedraw, Pause, RenderPipeline, Step, ThreadPause};
pub use state::{PacingToken, RenderState};
pub use surface::{Blit, PixelSurface, RecordingSurface, TileSurface};
pub use viewport::Presentation;
