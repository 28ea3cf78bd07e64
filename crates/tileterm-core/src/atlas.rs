//! Tile atlas support.
//!
//! A tile atlas is a square sprite sheet of `num_tiles × num_tiles` cells,
//! each `tile_size` pixels on a side. Tile index `t` lives in cell
//! `(t mod num_tiles, t div num_tiles)`.
//!
//! Indices beyond the sheet wrap: they are reduced modulo `num_tiles²`
//! before the lookup, so any byte maps to *some* cell and nothing faults.

use crate::error::{Error, Result};
use crate::geom::Rect;

/// The fixed grid layout of a sprite sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasGeometry {
    /// Pixels on a side of one tile.
    pub tile_size: usize,
    /// Tiles on a side of the sheet.
    pub num_tiles: usize,
}

impl AtlasGeometry {
    pub const fn new(tile_size: usize, num_tiles: usize) -> Self {
        Self {
            tile_size,
            num_tiles,
        }
    }

    /// Total number of tiles in the sheet.
    #[inline]
    pub const fn capacity(self) -> usize {
        self.num_tiles * self.num_tiles
    }

    /// Side length of the whole sheet in pixels.
    #[inline]
    pub const fn sheet_side(self) -> usize {
        self.num_tiles * self.tile_size
    }

    /// Source rectangle of `index` inside the sheet.
    #[inline]
    pub fn source_rect(self, index: u8) -> Rect {
        let n = self.num_tiles.max(1);
        let i = usize::from(index) % (n * n);
        Rect::square((i % n) * self.tile_size, (i / n) * self.tile_size, self.tile_size)
    }
}

/// Decoded atlas pixels, one `0xAARRGGBB` word per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileAtlas {
    geometry: AtlasGeometry,
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl TileAtlas {
    /// Build an atlas from tightly packed RGBA8 bytes.
    pub fn from_rgba(
        geometry: AtlasGeometry,
        width: usize,
        height: usize,
        rgba: &[u8],
    ) -> Result<Self> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(Error::AtlasData {
                expected,
                actual: rgba.len(),
            });
        }
        let required = geometry.sheet_side();
        if width < required || height < required {
            return Err(Error::AtlasTooSmall {
                width,
                height,
                required,
            });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| {
                (u32::from(p[3]) << 24)
                    | (u32::from(p[0]) << 16)
                    | (u32::from(p[1]) << 8)
                    | u32::from(p[2])
            })
            .collect();
        Ok(Self {
            geometry,
            width,
            height,
            pixels,
        })
    }

    /// A deterministic placeholder sheet used when no artwork is available.
    ///
    /// Blank tiles (`0` and `32`) are solid black. Every other tile draws
    /// its index as a 4×2 block pattern of bits on a dark background, with
    /// a one-pixel border so neighbouring tiles stay distinguishable.
    pub fn procedural(geometry: AtlasGeometry) -> Self {
        let side = geometry.sheet_side();
        let ts = geometry.tile_size.max(1);
        let mut pixels = vec![0xFF00_0000; side * side];
        for index in 0..geometry.capacity().min(256) {
            let tile = index as u8;
            if crate::engine::is_blank(tile) {
                continue;
            }
            let src = geometry.source_rect(tile);
            for dy in 0..ts {
                for dx in 0..ts {
                    let border = dx == 0 || dy == 0 || dx == ts - 1 || dy == ts - 1;
                    let bit = (dy * 2 / ts) * 4 + (dx * 4 / ts);
                    let color = if border {
                        0xFF30_3030
                    } else if (tile >> bit) & 1 == 1 {
                        0xFFE0_E0E0
                    } else {
                        0xFF10_1010
                    };
                    pixels[(src.y + dy) * side + src.x + dx] = color;
                }
            }
        }
        Self {
            geometry,
            width: side,
            height: side,
            pixels,
        }
    }

    #[inline]
    pub fn geometry(&self) -> AtlasGeometry {
        self.geometry
    }

    /// Sheet width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sheet height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`; transparent black outside the sheet.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    /// One row of pixels of the rectangle `src`, clipped to the sheet.
    pub(crate) fn row(&self, src: Rect, dy: usize) -> &[u32] {
        let y = src.y + dy;
        if y >= self.height || src.x >= self.width {
            return &[];
        }
        let start = y * self.width + src.x;
        let end = y * self.width + src.right().min(self.width);
        &self.pixels[start..end]
    }
}
