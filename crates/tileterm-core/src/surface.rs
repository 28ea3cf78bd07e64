//! Blit primitives: the [`TileSurface`] trait and two implementations.
//!
//! * [`PixelSurface`] copies atlas tiles into a CPU-side `0xAARRGGBB`
//!   framebuffer that graphical drivers present.
//! * [`RecordingSurface`] records each call as a [`Blit`], which tests use
//!   to check draw order and drivers may use for tracing.

use crate::atlas::TileAtlas;
use crate::engine::Geometry;

/// A destination for tile blits, addressed by logical grid cell.
pub trait TileSurface {
    /// Copy the atlas tile `tile` into cell `(row, col)` at native size.
    fn draw_tile(&mut self, tile: u8, row: usize, col: usize);

    /// Brighten cell `(row, col)` with a translucent lighten overlay.
    fn highlight(&mut self, row: usize, col: usize);
}

impl<S: TileSurface + ?Sized> TileSurface for &mut S {
    fn draw_tile(&mut self, tile: u8, row: usize, col: usize) {
        (**self).draw_tile(tile, row, col);
    }

    fn highlight(&mut self, row: usize, col: usize) {
        (**self).highlight(row, col);
    }
}

// ---------------------------------------------------------------------------
// PixelSurface
// ---------------------------------------------------------------------------

/// Opaque black, used for the initial framebuffer.
const BLACK: u32 = 0xFF00_0000;

/// A framebuffer of `tile_size * width` × `tile_size * height` pixels.
pub struct PixelSurface {
    atlas: TileAtlas,
    tile_size: usize,
    cols: usize,
    rows: usize,
    pixels: Vec<u32>,
}

impl PixelSurface {
    pub fn new(atlas: TileAtlas, geometry: Geometry) -> Self {
        let pixel_count = geometry.pixel_width() * geometry.pixel_height();
        Self {
            atlas,
            tile_size: geometry.tile_size,
            cols: geometry.width,
            rows: geometry.height,
            pixels: vec![BLACK; pixel_count],
        }
    }

    /// Framebuffer width in pixels.
    #[inline]
    pub fn pixel_width(&self) -> usize {
        self.cols * self.tile_size
    }

    /// Framebuffer height in pixels.
    #[inline]
    pub fn pixel_height(&self) -> usize {
        self.rows * self.tile_size
    }

    /// The framebuffer, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)` in framebuffer coordinates.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.pixel_width() + x]
    }

    fn cell_origin(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        if row < self.rows && col < self.cols {
            Some((col * self.tile_size, row * self.tile_size))
        } else {
            None
        }
    }
}

impl TileSurface for PixelSurface {
    fn draw_tile(&mut self, tile: u8, row: usize, col: usize) {
        let Some((x0, y0)) = self.cell_origin(row, col) else {
            return;
        };
        let src = self.atlas.geometry().source_rect(tile);
        let buf_w = self.pixel_width();
        for dy in 0..self.tile_size {
            let line = self.atlas.row(src, dy);
            let start = (y0 + dy) * buf_w + x0;
            let dst = &mut self.pixels[start..start + self.tile_size];
            let n = line.len().min(dst.len());
            dst[..n].copy_from_slice(&line[..n]);
            dst[n..].fill(BLACK);
        }
    }

    fn highlight(&mut self, row: usize, col: usize) {
        let Some((x0, y0)) = self.cell_origin(row, col) else {
            return;
        };
        let buf_w = self.pixel_width();
        for dy in 0..self.tile_size {
            let start = (y0 + dy) * buf_w + x0;
            for px in &mut self.pixels[start..start + self.tile_size] {
                *px = lighten_half_white(*px);
            }
        }
    }
}

/// Lighten-blend opaque white at 50 % alpha: `max(255, c)` mixed half and
/// half with `c`, per channel.
#[inline]
fn lighten_half_white(px: u32) -> u32 {
    let ch = |shift: u32| {
        let c = (px >> shift) & 0xFF;
        ((255 + c) / 2) << shift
    };
    (px & 0xFF00_0000) | ch(16) | ch(8) | ch(0)
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded surface call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Blit {
    Draw { tile: u8, row: usize, col: usize },
    Highlight { row: usize, col: usize },
}

/// A surface that records calls instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub blits: Vec<Blit>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.blits.clear();
    }

    /// The tile each cell of a `width × height` grid would show after
    /// replaying the recording, `None` for cells never drawn.
    pub fn final_tiles(&self, width: usize, height: usize) -> Vec<Option<u8>> {
        let mut out = vec![None; width * height];
        for blit in &self.blits {
            if let Blit::Draw { tile, row, col } = *blit {
                if row < height && col < width {
                    out[row * width + col] = Some(tile);
                }
            }
        }
        out
    }

    /// Number of highlight overlays recorded.
    pub fn highlights(&self) -> usize {
        self.blits
            .iter()
            .filter(|b| matches!(b, Blit::Highlight { .. }))
            .count()
    }
}

impl TileSurface for RecordingSurface {
    fn draw_tile(&mut self, tile: u8, row: usize, col: usize) {
        self.blits.push(Blit::Draw { tile, row, col });
    }

    fn highlight(&mut self, row: usize, col: usize) {
        self.blits.push(Blit::Highlight { row, col });
    }
}
