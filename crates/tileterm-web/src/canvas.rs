//! DOM-backed implementations of the core traits: [`CanvasSurface`] and
//! [`DomEcho`], plus the canvas CSS sizing policy.

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{
    CanvasRenderingContext2d, FocusOptions, HtmlCanvasElement, HtmlImageElement, HtmlInputElement,
};

use tileterm_core::{AtlasGeometry, Echo, Presentation, Size, TileSurface};

/// A [`TileSurface`] that blits from the atlas `<img>` onto a 2D canvas.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    tiles: HtmlImageElement,
    atlas: AtlasGeometry,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, tiles: HtmlImageElement, atlas: AtlasGeometry) -> Self {
        Self { ctx, tiles, atlas }
    }

    fn cell(&self, row: usize, col: usize) -> (f64, f64, f64) {
        let ts = self.atlas.tile_size as f64;
        (col as f64 * ts, row as f64 * ts, ts)
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        warn!("{what} failed: {e:?}");
    }
}

impl TileSurface for CanvasSurface {
    fn draw_tile(&mut self, tile: u8, row: usize, col: usize) {
        let src = self.atlas.source_rect(tile);
        let (x, y, ts) = self.cell(row, col);
        report(
            "drawImage",
            self.ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &self.tiles,
                    src.x as f64,
                    src.y as f64,
                    src.width as f64,
                    src.height as f64,
                    x,
                    y,
                    ts,
                    ts,
                ),
        );
    }

    fn highlight(&mut self, row: usize, col: usize) {
        let (x, y, ts) = self.cell(row, col);
        self.ctx.save();
        report(
            "globalCompositeOperation",
            self.ctx.set_global_composite_operation("lighten"),
        );
        self.ctx.set_fill_style_str("white");
        self.ctx.set_global_alpha(0.5);
        self.ctx.fill_rect(x, y, ts, ts);
        self.ctx.restore();
    }
}

/// The `<input>` element that captures keystrokes on touch devices.
pub struct DomEcho {
    input: HtmlInputElement,
}

impl DomEcho {
    pub fn new(input: HtmlInputElement) -> Self {
        Self { input }
    }
}

impl Echo for DomEcho {
    fn clear(&mut self) {
        self.input.set_value("");
    }

    fn focus(&mut self) {
        let options = FocusOptions::new();
        options.set_prevent_scroll(true);
        report("focus", self.input.focus_with_options(&options));
    }
}

/// Apply the viewport policy to the canvas element's CSS size.
///
/// Only one of `width`/`height` is pinned at a time; the other is cleared
/// so the browser keeps the aspect ratio.
pub(crate) fn resize_canvas(canvas: &HtmlCanvasElement, viewport: Size) -> Result<(), JsValue> {
    let native = Size::from((canvas.width(), canvas.height()));
    let presentation = Presentation::choose(viewport, native);
    let (property, value) = presentation.css();
    let other = if property == "width" { "height" } else { "width" };
    let style = canvas.style();
    style.remove_property(other)?;
    style.set_property(property, &value)?;
    log::debug!("canvas {property}: {value} for viewport {viewport}");
    Ok(())
}
