//! The render pipeline: paced full-screen redraws and console redraws.
//!
//! A full redraw is a resumable job. [`RenderPipeline::begin_full`] marks
//! the draw as in progress and clears the grid; [`RenderPipeline::advance`]
//! then scans the screen buffer row-major and returns either
//! [`Step::Pause`], when a highlighted tile needs its dramatic pause, or
//! [`Step::Done`]. The caller waits out the pause (yielding to its event
//! loop, where input may skip pacing) and calls `advance` again.
//!
//! A pause that has been handed out always completes: `advance` must not be
//! called before the delay has elapsed. Skipping only affects cells the scan
//! has not reached yet, and every cell is still drawn.

use std::time::Duration;

use log::debug;

use crate::engine::{ConsoleView, Engine, Geometry, ScreenView, BLANK, is_blank};
use crate::error::Result;
use crate::state::RenderState;
use crate::surface::TileSurface;

/// Outcome of one [`RenderPipeline::advance`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A tile is highlighted; resume after this delay.
    Pause(Duration),
    /// The scan finished and the draw is no longer in progress.
    Done,
}

/// An in-flight full redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullRedraw {
    paced: bool,
    /// Next cell to scan, row-major.
    next: usize,
    /// Cell whose highlight must be cleared on resume.
    highlighted: Option<(usize, u8)>,
}

impl FullRedraw {
    /// Whether this redraw was requested with pacing.
    #[inline]
    pub fn is_paced(&self) -> bool {
        self.paced
    }

    /// Whether the job is parked on a highlighted tile.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.highlighted.is_some()
    }
}

/// Something that can wait out a pause on the current thread.
pub trait Pause {
    fn pause(&mut self, delay: Duration);
}

/// Blocks the thread with [`std::thread::sleep`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl<F: FnMut(Duration)> Pause for F {
    fn pause(&mut self, delay: Duration) {
        self(delay);
    }
}

/// Draws engine buffers onto a [`TileSurface`].
pub struct RenderPipeline<S: TileSurface> {
    surface: S,
    geometry: Geometry,
}

impl<S: TileSurface> RenderPipeline<S> {
    pub fn new(surface: S, geometry: Geometry) -> Self {
        Self { surface, geometry }
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Start a full redraw: mark the draw in progress and paint the blank
    /// tile over every cell so stale pixels never show through.
    pub fn begin_full(&mut self, state: &mut RenderState, paced: bool) -> FullRedraw {
        state.draw_in_progress = true;
        debug!("full redraw started (paced: {paced})");
        for row in 0..self.geometry.height {
            for col in 0..self.geometry.width {
                self.surface.draw_tile(BLANK, row, col);
            }
        }
        FullRedraw {
            paced,
            next: 0,
            highlighted: None,
        }
    }

    /// Continue `job` until the next pause or the end of the scan.
    ///
    /// The screen view is acquired afresh on every call. If the engine
    /// breaks the length contract the job is abandoned, the render state is
    /// reset as if the draw had finished, and the error is returned.
    pub fn advance<E: Engine + ?Sized>(
        &mut self,
        job: &mut FullRedraw,
        engine: &E,
        state: &mut RenderState,
    ) -> Result<Step> {
        let screen = match ScreenView::acquire(engine, self.geometry) {
            Ok(view) => view,
            Err(e) => {
                Self::finish(state);
                return Err(e);
            }
        };
        let width = self.geometry.width;

        if let Some((i, tile)) = job.highlighted.take() {
            self.surface.draw_tile(tile, i / width, i % width);
            job.next = i + 1;
        }

        while job.next < screen.len() {
            let i = job.next;
            let tile = screen.at(i);
            let (row, col) = (i / width, i % width);
            self.surface.draw_tile(tile, row, col);
            if job.paced && state.pacing.is_enabled() && !is_blank(tile) {
                self.surface.highlight(row, col);
                job.highlighted = Some((i, tile));
                return Ok(Step::Pause(self.geometry.delay()));
            }
            job.next = i + 1;
        }

        Self::finish(state);
        debug!("full redraw finished");
        Ok(Step::Done)
    }

    fn finish(state: &mut RenderState) {
        // The next animated redraw defaults to paced even if this one was
        // skipped.
        state.pacing.reset();
        state.draw_in_progress = false;
    }

    /// Run a whole full redraw on the current thread, waiting out pauses
    /// with `pause`.
    pub fn render_full_blocking<E: Engine + ?Sized, P: Pause>(
        &mut self,
        engine: &E,
        state: &mut RenderState,
        paced: bool,
        pause: &mut P,
    ) -> Result<()> {
        let mut job = self.begin_full(state, paced);
        loop {
            match self.advance(&mut job, engine, state)? {
                Step::Pause(delay) => pause.pause(delay),
                Step::Done => return Ok(()),
            }
        }
    }

    /// Draw the console row into the bottom line of the grid. Never paced
    /// and independent of any full redraw in flight.
    pub fn render_console<E: Engine + ?Sized>(&mut self, engine: &E) -> Result<()> {
        let console = ConsoleView::acquire(engine, self.geometry)?;
        let row = self.geometry.console_row();
        for (col, &tile) in console.as_bytes().iter().enumerate() {
            self.surface.draw_tile(tile, row, col);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;
    use crate::surface::{Blit, RecordingSurface};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn pipeline(engine: &ScriptedEngine) -> RenderPipeline<RecordingSurface> {
        RenderPipeline::new(RecordingSurface::new(), engine.geometry())
    }

    fn draws(blits: &[Blit]) -> Vec<(u8, usize, usize)> {
        blits
            .iter()
            .filter_map(|b| match *b {
                Blit::Draw { tile, row, col } => Some((tile, row, col)),
                Blit::Highlight { .. } => None,
            })
            .collect()
    }

    #[test]
    fn clears_every_cell_before_scanning() {
        let mut engine = ScriptedEngine::new(3, 2);
        engine.screen = vec![1, 2, 3, 4, 5, 6];
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        p.render_full_blocking(&engine, &mut state, false, &mut |_: Duration| {})
            .unwrap();

        let blits = draws(&p.surface().blits);
        assert_eq!(blits.len(), 12);
        assert!(blits[..6].iter().all(|&(tile, _, _)| tile == 0));
        assert_eq!(
            blits[6..],
            [(1, 0, 0), (2, 0, 1), (3, 0, 2), (4, 1, 0), (5, 1, 1), (6, 1, 2)]
        );
    }

    #[test]
    fn paced_cell_sequence() {
        let mut engine = ScriptedEngine::new(2, 1);
        engine.screen = vec![32, 9];
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        let mut job = p.begin_full(&mut state, true);
        assert!(state.draw_in_progress);

        let step = p.advance(&mut job, &engine, &mut state).unwrap();
        assert_eq!(step, Step::Pause(Duration::from_millis(20)));
        assert!(job.is_paused());
        assert!(state.draw_in_progress);

        assert_eq!(p.advance(&mut job, &engine, &mut state).unwrap(), Step::Done);
        assert!(!state.draw_in_progress);
        assert_eq!(
            p.surface().blits[2..],
            [
                Blit::Draw { tile: 32, row: 0, col: 0 },
                Blit::Draw { tile: 9, row: 0, col: 1 },
                Blit::Highlight { row: 0, col: 1 },
                Blit::Draw { tile: 9, row: 0, col: 1 },
            ]
        );
    }

    #[test]
    fn blank_tiles_are_never_highlighted() {
        let mut engine = ScriptedEngine::new(4, 1);
        engine.screen = vec![0, 32, 0, 32];
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        let mut pauses = 0;
        p.render_full_blocking(&engine, &mut state, true, &mut |_: Duration| pauses += 1)
            .unwrap();
        assert_eq!(pauses, 0);
        assert_eq!(p.surface().highlights(), 0);
    }

    #[test]
    fn skip_mid_scan_keeps_drawing_every_cell() {
        let mut engine = ScriptedEngine::new(5, 1);
        engine.screen = vec![1, 2, 3, 4, 5];
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        let token = state.pacing.clone();

        let mut pauses = 0;
        p.render_full_blocking(&engine, &mut state, true, &mut |_: Duration| {
            pauses += 1;
            if pauses == 2 {
                token.skip();
            }
        })
        .unwrap();

        assert_eq!(pauses, 2);
        assert_eq!(p.surface().highlights(), 2);
        let expected: Vec<_> = [1, 2, 3, 4, 5].map(Some).to_vec();
        assert_eq!(p.surface().final_tiles(5, 1), expected);
        // Pacing is back on for the next redraw.
        assert!(state.pacing.is_enabled());
        assert!(!state.draw_in_progress);
    }

    #[test]
    fn unpaced_redraw_ignores_pacing_flag() {
        let mut engine = ScriptedEngine::new(3, 1);
        engine.screen = vec![7, 8, 9];
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        let mut job = p.begin_full(&mut state, false);
        assert_eq!(p.advance(&mut job, &engine, &mut state).unwrap(), Step::Done);
        assert_eq!(p.surface().highlights(), 0);
    }

    #[test]
    fn console_touches_only_bottom_row() {
        let mut engine = ScriptedEngine::new(3, 4);
        engine.console = vec![b'>', b'a', 219];
        let mut p = pipeline(&engine);
        p.render_console(&engine).unwrap();
        assert_eq!(
            p.surface().blits,
            [
                Blit::Draw { tile: b'>', row: 3, col: 0 },
                Blit::Draw { tile: b'a', row: 3, col: 1 },
                Blit::Draw { tile: 219, row: 3, col: 2 },
            ]
        );
    }

    #[test]
    fn console_redraw_leaves_draw_flag_alone() {
        let engine = ScriptedEngine::new(2, 2);
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        let _job = p.begin_full(&mut state, true);
        p.render_console(&engine).unwrap();
        assert!(state.draw_in_progress);
    }

    #[test]
    fn bad_buffer_length_resets_state() {
        let mut engine = ScriptedEngine::new(2, 2);
        engine.screen.pop();
        let mut p = pipeline(&engine);
        let mut state = RenderState::new();
        state.pacing.skip();
        let mut job = p.begin_full(&mut state, true);
        assert!(p.advance(&mut job, &engine, &mut state).is_err());
        assert!(!state.draw_in_progress);
        assert!(state.pacing.is_enabled());
    }

    proptest! {
        #[test]
        fn scan_order_is_row_major_regardless_of_pacing(
            screen in proptest::collection::vec(any::<u8>(), 12),
            paced: bool,
            skip_after in 0usize..6,
        ) {
            let mut engine = ScriptedEngine::new(4, 3);
            engine.screen = screen.clone();
            let mut p = pipeline(&engine);
            let mut state = RenderState::new();
            let token = state.pacing.clone();
            let mut pauses = 0;
            p.render_full_blocking(&engine, &mut state, paced, &mut |_: Duration| {
                pauses += 1;
                if pauses > skip_after {
                    token.skip();
                }
            })
            .unwrap();

            let blits = draws(&p.surface().blits);
            let mut scan = Vec::new();
            let mut last = None;
            for &(tile, row, col) in &blits[12..] {
                // Post-pause redraws repeat the same cell.
                if last != Some((row, col)) {
                    scan.push((tile, row, col));
                }
                last = Some((row, col));
            }
            let expected: Vec<_> = screen
                .iter()
                .enumerate()
                .map(|(i, &t)| (t, i / 4, i % 4))
                .collect();
            prop_assert_eq!(scan, expected);
            prop_assert!(state.pacing.is_enabled());
        }
    }
}
