//! Per-session render state and the pacing cancellation token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ---------------------------------------------------------------------------
// PacingToken
// ---------------------------------------------------------------------------

/// Cooperative pacing switch shared between input handlers and the render
/// pipeline.
///
/// Skipping is advisory: the pipeline polls [`is_enabled`](Self::is_enabled)
/// once per cell, so a pause that has already begun always runs to
/// completion and only the cells not yet reached lose their pacing. Clones
/// share the same flag.
#[derive(Clone, Debug)]
pub struct PacingToken {
    enabled: Arc<AtomicBool>,
}

impl PacingToken {
    /// A new token with pacing enabled.
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether paced cells should still pause.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Drop pacing for the rest of the current redraw.
    #[inline]
    pub fn skip(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Re-enable pacing for the next redraw.
    #[inline]
    pub fn reset(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }
}

impl Default for PacingToken {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// RenderState
// ---------------------------------------------------------------------------

/// Flags shared by the render pipeline and the input handlers of one
/// session. Never visible to the engine.
#[derive(Clone, Debug, Default)]
pub struct RenderState {
    /// Set once the first click has started the game.
    pub started: bool,
    /// Pacing switch for animated redraws.
    pub pacing: PacingToken,
    /// True for the whole duration of a full redraw, pauses included.
    pub draw_in_progress: bool,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }
}
