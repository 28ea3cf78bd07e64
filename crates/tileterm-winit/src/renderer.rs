//! Presents the native-resolution pixel surface in a window of any size.
//!
//! The surface is scaled with nearest-neighbour sampling according to the
//! current [`Presentation`] and centred on a black background. Parts that
//! do not fit (a native-size surface in a short window) are cropped.

use log::debug;
use winit::dpi::PhysicalSize;

use tileterm_core::{Presentation, Size};

const BACKGROUND: u32 = 0xFF000000;

pub(crate) struct Presenter {
    pub(crate) presentation: Presentation,
    viewport: Size,
    /// Native surface size in physical pixels.
    native: Size,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            presentation: Presentation::Native { width: 0.0 },
            viewport: Size::default(),
            native: Size::default(),
        }
    }

    /// Re-run the viewport policy for a window of `size` physical pixels.
    ///
    /// `native` is in logical pixels; comparing in physical pixels keeps
    /// the policy independent of the display's scale factor.
    pub fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64, native: Size) {
        self.viewport = Size::from((size.width, size.height));
        self.native = Size::new(native.width * scale_factor, native.height * scale_factor);
        let presentation = Presentation::choose(self.viewport, self.native);
        if presentation != self.presentation {
            debug!("viewport {} -> {presentation:?}", self.viewport);
            self.presentation = presentation;
        }
    }

    /// On-screen size of the surface in physical pixels, at least 1x1.
    fn target_size(&self) -> (usize, usize) {
        let s = self.presentation.scaled_size(self.viewport, self.native);
        (
            (s.width.round() as usize).max(1),
            (s.height.round() as usize).max(1),
        )
    }

    /// Scale `src` (`src_w`×`src_h`) into `dst` (`dst_w`×`dst_h`).
    pub fn blit(
        &self,
        src: &[u32],
        src_w: usize,
        src_h: usize,
        dst: &mut [u32],
        dst_w: usize,
        dst_h: usize,
    ) {
        dst.fill(BACKGROUND);
        if src_w == 0 || src_h == 0 || src.len() < src_w * src_h {
            return;
        }
        let (tw, th) = self.target_size();
        // Offsets may be negative when the target overflows the window.
        let ox = (dst_w as isize - tw as isize) / 2;
        let oy = (dst_h as isize - th as isize) / 2;

        let columns: Vec<Option<usize>> = (0..dst_w)
            .map(|x| {
                let tx = x as isize - ox;
                (0..tw as isize)
                    .contains(&tx)
                    .then(|| tx as usize * src_w / tw)
            })
            .collect();

        for y in 0..dst_h {
            let ty = y as isize - oy;
            if !(0..th as isize).contains(&ty) {
                continue;
            }
            let sy = ty as usize * src_h / th;
            let src_row = &src[sy * src_w..(sy + 1) * src_w];
            let Some(dst_row) = dst.get_mut(y * dst_w..(y + 1) * dst_w) else {
                break;
            };
            for (d, sx) in dst_row.iter_mut().zip(&columns) {
                if let Some(sx) = sx {
                    *d = src_row[*sx];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NATIVE: Size = Size::new(4.0, 2.0);

    fn presenter(w: u32, h: u32, scale: f64) -> Presenter {
        let mut p = Presenter::new();
        p.resize(PhysicalSize::new(w, h), scale, NATIVE);
        p
    }

    fn source() -> Vec<u32> {
        (1..=8).collect()
    }

    #[test]
    fn native_size_is_centred() {
        let p = presenter(6, 4, 1.0);
        assert_eq!(p.presentation, Presentation::Native { width: 4.0 });
        let mut dst = vec![0; 24];
        p.blit(&source(), 4, 2, &mut dst, 6, 4);
        #[rustfmt::skip]
        let expected = [
            BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND,
            BACKGROUND, 1, 2, 3, 4, BACKGROUND,
            BACKGROUND, 5, 6, 7, 8, BACKGROUND,
            BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND, BACKGROUND,
        ];
        assert_eq!(dst, expected);
    }

    #[test]
    fn hidpi_compares_physical_sizes() {
        // 6 physical pixels cannot hold 4 logical pixels at 2x.
        let p = presenter(6, 8, 2.0);
        assert_eq!(p.presentation, Presentation::FitWidth { fraction: 0.9 });
        let p = presenter(8, 4, 2.0);
        assert_eq!(p.presentation, Presentation::Native { width: 8.0 });
    }

    #[test]
    fn nearest_neighbour_upscale() {
        let p = presenter(8, 4, 2.0);
        let mut dst = vec![0; 32];
        p.blit(&source(), 4, 2, &mut dst, 8, 4);
        assert_eq!(dst[..8], [1, 1, 2, 2, 3, 3, 4, 4]);
        assert_eq!(dst[8..16], [1, 1, 2, 2, 3, 3, 4, 4]);
        assert_eq!(dst[24..], [5, 5, 6, 6, 7, 7, 8, 8]);
    }

    #[test]
    fn fit_width_shrinks_and_pads() {
        // Narrow, tall window: 90% of 3 pixels rounds to a 3x1 target.
        let p = presenter(3, 10, 1.0);
        assert_eq!(p.presentation, Presentation::FitWidth { fraction: 0.9 });
        let mut dst = vec![0; 30];
        p.blit(&source(), 4, 2, &mut dst, 3, 10);
        let drawn = dst.iter().filter(|&&px| px != BACKGROUND).count();
        assert_eq!(drawn, 3);
    }

    #[test]
    fn short_buffer_draws_nothing() {
        let p = presenter(4, 2, 1.0);
        let mut dst = vec![0; 8];
        p.blit(&[1, 2], 4, 2, &mut dst, 4, 2);
        assert!(dst.iter().all(|&px| px == BACKGROUND));
    }
}
