//! Presentation scaling of the fixed-resolution surface.
//!
//! The logical grid never changes size; only the on-screen scale of the
//! pixel surface does. [`Presentation::choose`] is a pure function of the
//! viewport and native surface sizes, re-evaluated by drivers on resize and
//! orientation changes.

use crate::geom::Size;

/// Fraction of the constraining viewport dimension used when the surface
/// does not fit at native size.
pub const FIT_FRACTION: f64 = 0.9;

/// Viewport aspect ratio at or above which the surface is fitted by height.
pub const WIDE_ASPECT: f64 = 2.0;

/// How the surface is scaled to fit its viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Presentation {
    /// Native pixel size; the width is pinned explicitly.
    Native { width: f64 },
    /// Height constrained to a fraction of the viewport height.
    FitHeight { fraction: f64 },
    /// Width constrained to a fraction of the viewport width.
    FitWidth { fraction: f64 },
}

impl Presentation {
    /// Pick the presentation for `viewport`, in policy order:
    ///
    /// 1. viewport at least as wide as the surface → native size;
    /// 2. viewport aspect ≥ 2 → fit by height;
    /// 3. otherwise → fit by width.
    pub fn choose(viewport: Size, native: Size) -> Self {
        if viewport.width >= native.width {
            Self::Native {
                width: native.width,
            }
        } else if viewport.aspect() >= WIDE_ASPECT {
            Self::FitHeight {
                fraction: FIT_FRACTION,
            }
        } else {
            Self::FitWidth {
                fraction: FIT_FRACTION,
            }
        }
    }

    /// The CSS property and value that realise this presentation on a
    /// canvas element.
    pub fn css(self) -> (&'static str, String) {
        match self {
            Self::Native { width } => ("width", format!("{width}px")),
            Self::FitHeight { fraction } => ("height", percent(fraction)),
            Self::FitWidth { fraction } => ("width", percent(fraction)),
        }
    }

    /// On-screen size of the surface, preserving its aspect ratio.
    pub fn scaled_size(self, viewport: Size, native: Size) -> Size {
        let aspect = native.aspect();
        match self {
            Self::Native { width } => Size::new(width, width / aspect),
            Self::FitHeight { fraction } => {
                let h = viewport.height * fraction;
                Size::new(h * aspect, h)
            }
            Self::FitWidth { fraction } => {
                let w = viewport.width * fraction;
                Size::new(w, w / aspect)
            }
        }
    }

    /// Scale factor from native pixels to on-screen pixels.
    pub fn scale(self, viewport: Size, native: Size) -> f64 {
        if native.width <= 0.0 {
            return 1.0;
        }
        self.scaled_size(viewport, native).width / native.width
    }
}

fn percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NATIVE: Size = Size::new(800.0, 400.0);

    #[test]
    fn wide_enough_viewport_uses_native_size() {
        let p = Presentation::choose(Size::new(800.0, 300.0), NATIVE);
        assert_eq!(p, Presentation::Native { width: 800.0 });
        assert_eq!(p.css(), ("width", "800px".to_string()));
        assert_eq!(p.scaled_size(Size::new(800.0, 300.0), NATIVE), NATIVE);
    }

    #[test]
    fn very_wide_viewport_fits_height() {
        let vp = Size::new(700.0, 300.0);
        let p = Presentation::choose(vp, NATIVE);
        assert_eq!(p, Presentation::FitHeight { fraction: 0.9 });
        assert_eq!(p.css(), ("height", "90%".to_string()));
        assert_eq!(p.scaled_size(vp, NATIVE), Size::new(540.0, 270.0));
    }

    #[test]
    fn narrow_viewport_fits_width() {
        let vp = Size::new(400.0, 800.0);
        let p = Presentation::choose(vp, NATIVE);
        assert_eq!(p, Presentation::FitWidth { fraction: 0.9 });
        assert_eq!(p.css(), ("width", "90%".to_string()));
        assert_eq!(p.scaled_size(vp, NATIVE), Size::new(360.0, 180.0));
        assert_eq!(p.scale(vp, NATIVE), 0.45);
    }

    #[test]
    fn aspect_boundary_is_inclusive() {
        let p = Presentation::choose(Size::new(600.0, 300.0), NATIVE);
        assert!(matches!(p, Presentation::FitHeight { .. }));
    }

    proptest! {
        #[test]
        fn fitted_surface_stays_inside_viewport(w in 1.0f64..4000.0, h in 1.0f64..4000.0) {
            let vp = Size::new(w, h);
            let p = Presentation::choose(vp, NATIVE);
            let s = p.scaled_size(vp, NATIVE);
            match p {
                Presentation::Native { .. } => prop_assert_eq!(s, NATIVE),
                Presentation::FitWidth { .. } => prop_assert!(s.width <= w),
                Presentation::FitHeight { .. } => prop_assert!(s.height <= h),
            }
        }
    }
}
