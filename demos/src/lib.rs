//! Reference engine for tileterm: a line-editing [`Terminal`] and the
//! [`GuessGame`] adventure played through it.

mod guess;
mod terminal;

pub use guess::{GuessGame, MAX_SECRET, MAX_TRIES};
pub use terminal::{CURSOR, HISTORY, PROMPT, Terminal};

/// Width of the display in tiles.
pub const WIDTH: usize = 50;

/// Height of the display in tiles, console row included.
pub const HEIGHT: usize = 25;

/// Pixels on a side of a tile.
pub const TILE_SIZE: usize = 16;

/// Tiles on a side of the tile sheet.
pub const NUM_TILES: usize = 16;

/// Pause after each highlighted tile, in milliseconds.
pub const DELAY_TIME: u64 = 20;
