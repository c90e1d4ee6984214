//! The surface/context contract that a frame is painted through, and the frame routine itself.
//!
//! A context only needs to know how to clear, how to switch compositing mode and antialiasing,
//! and how to fill a rectangle. The mode is the backend's own native vocabulary, so the same
//! frame routine drives both backends.

use glam::DVec2;

use crate::blend::{self, Premultiplied};
use crate::canvas::Canvas;
use crate::particles::Particle;

/// The colour every frame starts from.
pub const OPAQUE_BLACK: palette::Srgba<u8> = palette::Srgba::new(0, 0, 0, 255);

/// An axis-aligned box, from its top-left to its bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Rect {
    /// Instantiate from two corners.
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A square of side `2 * half_extent` centred on `centre`.
    #[must_use]
    pub fn centred(centre: DVec2, half_extent: f64) -> Self {
        Self::new(
            centre.x - half_extent,
            centre.y - half_extent,
            centre.x + half_extent,
            centre.y + half_extent,
        )
    }

    /// Does the box cover any area?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.x1 > self.x0 && self.y1 > self.y0)
    }
}

/// A backend's native compositing mode.
pub trait NativeMode: Copy + core::fmt::Debug {
    /// Composite one premultiplied source pixel onto one premultiplied destination pixel.
    fn composite(self, source: Premultiplied, destination: Premultiplied) -> Premultiplied;
}

/// Everything that a frame needs from a drawing surface.
pub trait PaintContext {
    /// The backend's own compositing vocabulary.
    type Mode: NativeMode;

    /// Width and height of the surface.
    fn size(&self) -> (f64, f64);

    /// Replace every pixel with the given colour, regardless of the compositing mode.
    fn clear(&mut self, colour: palette::Srgba<u8>);

    /// The mode used by every following fill.
    fn set_composition_mode(&mut self, mode: Self::Mode);

    /// Whether following fills antialias their edges.
    fn set_antialiasing(&mut self, is_enabled: bool);

    /// Fill a box with a straight, non-premultiplied, colour.
    fn fill_rect(&mut self, rect: Rect, colour: palette::Srgba<u8>);
}

/// Paint one frame: clear to opaque black, then composite a square for each particle.
pub fn paint_frame<C: PaintContext>(
    context: &mut C,
    particles: &[Particle],
    half_extent: f64,
    mode: C::Mode,
    is_antialiased: bool,
) {
    context.clear(OPAQUE_BLACK);
    context.set_composition_mode(mode);
    context.set_antialiasing(is_antialiased);

    for particle in particles {
        context.fill_rect(Rect::centred(particle.position, half_extent), particle.colour);
    }
}

/// The pixels a box spans along one axis, clipped to `[0, limit)`.
///
/// With antialiasing every pixel the box touches is included. Without, a pixel is included only
/// when its centre is inside the box.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Both ends are clamped to `[0, limit]` first"
)]
fn span(start: f64, end: f64, limit: u32, is_antialiased: bool) -> core::ops::Range<u32> {
    let maximum = f64::from(limit);
    let (first, last) = if is_antialiased {
        (start.floor(), end.ceil())
    } else {
        ((start - 0.5).ceil(), (end - 0.5).ceil())
    };
    let first = first.clamp(0.0, maximum) as u32;
    let last = last.clamp(0.0, maximum) as u32;
    first..last.max(first)
}

/// How much of the pixel starting at `pixel` is inside `[start, end]`.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    reason = "Coverage is in `[0, 1]`"
)]
fn coverage(pixel: u32, start: f64, end: f64) -> f32 {
    let left = f64::from(pixel);
    let right = left + 1.0;
    (end.min(right) - start.max(left)).clamp(0.0, 1.0) as f32
}

/// A [`PaintContext`] over a [`Canvas`], compositing with any native mode.
pub struct CanvasContext<'canvas, M: NativeMode> {
    /// The surface being painted.
    canvas: &'canvas mut Canvas,
    /// The current compositing mode.
    mode: M,
    /// Whether edges get fractional coverage.
    is_antialiased: bool,
}

impl<'canvas, M: NativeMode> CanvasContext<'canvas, M> {
    /// Instantiate. The given mode is used until another is set.
    pub const fn new(canvas: &'canvas mut Canvas, mode: M) -> Self {
        Self {
            canvas,
            mode,
            is_antialiased: false,
        }
    }

    /// Composite the source onto a single pixel with the given coverage.
    fn composite_pixel(mode: M, pixel: &mut blend::Pixel, source: Premultiplied, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let destination = blend::from_pixel(*pixel);
        let result = mode.composite(source, destination);
        *pixel = blend::to_pixel(blend::with_coverage(result, destination, coverage));
    }
}

impl<M: NativeMode> PaintContext for CanvasContext<'_, M> {
    type Mode = M;

    fn size(&self) -> (f64, f64) {
        (
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn clear(&mut self, colour: palette::Srgba<u8>) {
        self.canvas.fill(blend::to_pixel(blend::premultiply(colour)));
    }

    fn set_composition_mode(&mut self, mode: M) {
        self.mode = mode;
    }

    fn set_antialiasing(&mut self, is_enabled: bool) {
        self.is_antialiased = is_enabled;
    }

    fn fill_rect(&mut self, rect: Rect, colour: palette::Srgba<u8>) {
        if rect.is_empty() {
            return;
        }

        let columns = span(rect.x0, rect.x1, self.canvas.width(), self.is_antialiased);
        let rows = span(rect.y0, rect.y1, self.canvas.height(), self.is_antialiased);
        if columns.is_empty() {
            return;
        }

        let source = blend::premultiply(colour);
        let mode = self.mode;
        let first_column = usize::try_from(columns.start).unwrap_or(usize::MAX);
        for y in rows {
            let row_coverage = if self.is_antialiased {
                coverage(y, rect.y0, rect.y1)
            } else {
                1.0
            };
            let Some(row) = self.canvas.row_mut(y) else {
                continue;
            };
            let pixels = row.iter_mut().skip(first_column).zip(columns.clone());
            for (pixel, x) in pixels {
                let column_coverage = if self.is_antialiased {
                    coverage(x, rect.x0, rect.x1)
                } else {
                    1.0
                };
                Self::composite_pixel(mode, pixel, source, row_coverage * column_coverage);
            }
        }
    }
}
