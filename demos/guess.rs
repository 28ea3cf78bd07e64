//! The number-guessing adventure in a native window.
//!
//! Run: cargo run --bin guess [-- path/to/tiles_16x16.png]
//!
//! Without an atlas path the tiles are generated. Set `RUST_LOG=debug` to
//! trace redraws and input.

use tileterm_core::EventLoopDriver;
use tileterm_demos::GuessGame;
use tileterm_winit::{AtlasSource, WinitConfig, WinitDriver};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let atlas = std::env::args_os()
        .nth(1)
        .map(|path| AtlasSource::File(path.into()))
        .unwrap_or_default();
    let driver = WinitDriver::new(WinitConfig {
        title: "The Vault Door".into(),
        atlas,
    });

    if let Err(e) = driver.run(GuessGame::new()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
