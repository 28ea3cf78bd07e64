//! The [`Engine`] contract and the borrowed buffer views it hands out.
//!
//! The engine owns all game state. The core only reads its screen and
//! console buffers through [`ScreenView`] and [`ConsoleView`], which borrow
//! the engine immutably: a view cannot outlive the next mutating call, so
//! every read goes through a freshly acquired, length-checked slice.

use std::time::Duration;

use crate::atlas::AtlasGeometry;
use crate::error::{BufferKind, Error, Result};

/// Tile index drawn for an empty cell.
pub const BLANK: u8 = 0;

/// Tile index of the space character, also treated as blank.
pub const SPACE: u8 = 32;

/// Whether `tile` is one of the reserved blank tiles, which never receive
/// the highlight effect.
#[inline]
pub const fn is_blank(tile: u8) -> bool {
    tile == BLANK || tile == SPACE
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Session constants reported by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// Screen width in tiles.
    pub width: usize,
    /// Screen height in tiles.
    pub height: usize,
    /// Pixels on a side of one tile.
    pub tile_size: usize,
    /// Tiles on a side of the atlas.
    pub num_tiles: usize,
    /// Dramatic pause per highlighted tile, in milliseconds.
    pub delay_ms: u64,
}

impl Geometry {
    /// Reject geometries that leave nothing to draw.
    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidGeometry("grid has no cells"));
        }
        if self.tile_size == 0 || self.num_tiles == 0 {
            return Err(Error::InvalidGeometry("atlas has no tiles"));
        }
        Ok(self)
    }

    /// Number of cells in the screen buffer.
    #[inline]
    pub const fn cells(self) -> usize {
        self.width * self.height
    }

    /// Native surface width in pixels.
    #[inline]
    pub const fn pixel_width(self) -> usize {
        self.width * self.tile_size
    }

    /// Native surface height in pixels.
    #[inline]
    pub const fn pixel_height(self) -> usize {
        self.height * self.tile_size
    }

    #[inline]
    pub const fn atlas(self) -> AtlasGeometry {
        AtlasGeometry::new(self.tile_size, self.num_tiles)
    }

    #[inline]
    pub const fn delay(self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Row index of the console line.
    #[inline]
    pub const fn console_row(self) -> usize {
        self.height - 1
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The opaque game-logic engine driven by a session.
///
/// `screen` and `console` must return buffers of exactly `width * height`
/// and `width` bytes. Both are read through views that are only valid
/// until the next `&mut self` call.
pub trait Engine {
    /// Screen width in tiles.
    fn width(&self) -> usize;

    /// Screen height in tiles.
    fn height(&self) -> usize;

    /// Pixels on a side of one tile.
    fn tile_size(&self) -> usize;

    /// Tiles on a side of the atlas.
    fn num_tiles(&self) -> usize;

    /// Per-tile pause of the animated redraw, in milliseconds.
    fn delay_time(&self) -> u64;

    /// All session constants at once.
    fn geometry(&self) -> Geometry {
        Geometry {
            width: self.width(),
            height: self.height(),
            tile_size: self.tile_size(),
            num_tiles: self.num_tiles(),
            delay_ms: self.delay_time(),
        }
    }

    /// Row-major tile indices of the whole screen.
    fn screen(&self) -> &[u8];

    /// Tile indices of the command line row.
    fn console(&self) -> &[u8];

    /// Feed one UTF-16 code unit to the command line.
    fn input(&mut self, unit: u16);

    fn left(&mut self);
    fn right(&mut self);
    fn up(&mut self);
    fn down(&mut self);

    /// Play the opening narrative into the screen buffer.
    fn intro(&mut self);

    /// Evaluate the current command line: `0` continue, `1` win, `2` lose.
    fn enter(&mut self) -> u8;

    fn win(&mut self);
    fn lose(&mut self);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A borrowed, length-checked view of the engine's screen buffer.
#[derive(Copy, Clone, Debug)]
pub struct ScreenView<'a> {
    cells: &'a [u8],
    width: usize,
}

impl<'a> ScreenView<'a> {
    /// Acquire a fresh view, checking it against `geometry`.
    pub fn acquire<E: Engine + ?Sized>(engine: &'a E, geometry: Geometry) -> Result<Self> {
        let cells = engine.screen();
        let expected = geometry.cells();
        if cells.len() != expected {
            return Err(Error::BufferLength {
                buffer: BufferKind::Screen,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width: geometry.width,
        })
    }

    /// Tile at linear (row-major) index `i`.
    #[inline]
    pub fn at(&self, i: usize) -> u8 {
        self.cells[i]
    }

    /// Tile at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.width + col]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.cells
    }
}

/// A borrowed, length-checked view of the engine's console row.
#[derive(Copy, Clone, Debug)]
pub struct ConsoleView<'a> {
    cells: &'a [u8],
}

impl<'a> ConsoleView<'a> {
    /// Acquire a fresh view, checking it against `geometry`.
    pub fn acquire<E: Engine + ?Sized>(engine: &'a E, geometry: Geometry) -> Result<Self> {
        let cells = engine.console();
        if cells.len() != geometry.width {
            return Err(Error::BufferLength {
                buffer: BufferKind::Console,
                expected: geometry.width,
                actual: cells.len(),
            });
        }
        Ok(Self { cells })
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.cells
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedEngine;
    use super::*;

    #[test]
    fn blank_tiles() {
        assert!(is_blank(0));
        assert!(is_blank(32));
        assert!(!is_blank(b'A'));
        assert!(!is_blank(219));
    }

    #[test]
    fn geometry_from_engine() {
        let engine = ScriptedEngine::new(20, 10);
        let g = engine.geometry();
        assert_eq!(g.cells(), 200);
        assert_eq!(g.console_row(), 9);
        assert_eq!(g.delay(), Duration::from_millis(20));
        assert_eq!(g.pixel_width(), 40);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let mut g = ScriptedEngine::new(20, 10).geometry();
        g.height = 0;
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn views_check_length() {
        let mut engine = ScriptedEngine::new(4, 3);
        let g = engine.geometry();
        let view = ScreenView::acquire(&engine, g).unwrap();
        assert_eq!(view.len(), 12);

        engine.screen.pop();
        let err = ScreenView::acquire(&engine, g).unwrap_err();
        assert_eq!(
            err,
            Error::BufferLength {
                buffer: BufferKind::Screen,
                expected: 12,
                actual: 11
            }
        );

        engine.console.push(0);
        assert!(ConsoleView::acquire(&engine, g).is_err());
    }

    #[test]
    fn screen_view_indexing() {
        let mut engine = ScriptedEngine::new(4, 3);
        engine.screen[4 + 2] = 65;
        let view = ScreenView::acquire(&engine, engine.geometry()).unwrap();
        assert_eq!(view.get(1, 2), 65);
        assert_eq!(view.at(6), 65);
    }
}
