//! The raster backend. It speaks Blend2D's compositing vocabulary and draws hard-edged boxes.

use crate::backends::context::{self, CanvasContext, NativeMode};
use crate::blend::{self, Premultiplied};
use crate::canvas::Canvas;
use crate::composition::{self, BackendKind, CompositingOperator};
use crate::particles::Particle;

/// Blend2D's compositing operators, with Blend2D's own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CompOp {
    /// Source-over
    SrcOver = 0,
    /// Source-copy
    SrcCopy = 1,
    /// Source-in
    SrcIn = 2,
    /// Source-out
    SrcOut = 3,
    /// Source-atop
    SrcAtop = 4,
    /// Destination-over
    DstOver = 5,
    /// Destination-copy, a no-op
    DstCopy = 6,
    /// Destination-in
    DstIn = 7,
    /// Destination-out
    DstOut = 8,
    /// Destination-atop
    DstAtop = 9,
    /// Xor
    Xor = 10,
    /// Clear
    Clear = 11,
    /// Plus
    Plus = 12,
    /// Multiply
    Multiply = 15,
    /// Screen
    Screen = 16,
    /// Overlay
    Overlay = 17,
    /// Darken
    Darken = 18,
    /// Lighten
    Lighten = 19,
    /// Colour dodge
    ColorDodge = 20,
    /// Colour burn
    ColorBurn = 21,
    /// Hard light
    HardLight = 25,
    /// Soft light
    SoftLight = 26,
    /// Difference
    Difference = 27,
    /// Exclusion
    Exclusion = 28,
}

impl CompOp {
    /// Blend2D's numeric value for the operator.
    #[must_use]
    #[expect(
        clippy::as_conversions,
        reason = "Fieldless enum to its own discriminant"
    )]
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl NativeMode for CompOp {
    fn composite(self, source: Premultiplied, destination: Premultiplied) -> Premultiplied {
        let operation = match self {
            Self::SrcOver => blend::source_over,
            Self::SrcCopy => blend::source_copy,
            Self::SrcIn => blend::source_in,
            Self::SrcOut => blend::source_out,
            Self::SrcAtop => blend::source_atop,
            Self::DstOver => blend::destination_over,
            Self::DstCopy => blend::destination_copy,
            Self::DstIn => blend::destination_in,
            Self::DstOut => blend::destination_out,
            Self::DstAtop => blend::destination_atop,
            Self::Xor => blend::xor,
            Self::Clear => blend::clear,
            Self::Plus => blend::plus,
            Self::Multiply => blend::multiply,
            Self::Screen => blend::screen,
            Self::Overlay => blend::overlay,
            Self::Darken => blend::darken,
            Self::Lighten => blend::lighten,
            Self::ColorDodge => blend::color_dodge,
            Self::ColorBurn => blend::color_burn,
            Self::HardLight => blend::hard_light,
            Self::SoftLight => blend::soft_light,
            Self::Difference => blend::difference,
            Self::Exclusion => blend::exclusion,
        };
        operation(source, destination)
    }
}

/// The hard-edged backend. Boxes are always drawn without antialiasing.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct RasterBackend;

impl RasterBackend {
    /// Instantiate.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl super::RenderBackend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    fn is_antialiased(&self) -> bool {
        false
    }

    fn paint(
        &self,
        canvas: &mut Canvas,
        particles: &[Particle],
        half_extent: f64,
        operator: CompositingOperator,
    ) {
        let mode = composition::raster_operator(operator);
        let mut context = CanvasContext::new(canvas, CompOp::SrcOver);
        context::paint_frame(&mut context, particles, half_extent, mode, false);
    }
}

#[cfg(test)]
mod test {
    use glam::DVec2;

    use super::*;
    use crate::backends::RenderBackend as _;

    const RED: palette::Srgba<u8> = palette::Srgba::new(255, 0, 0, 255);

    fn particle(x: f64, y: f64, colour: palette::Srgba<u8>) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::ZERO, colour)
    }

    #[test]
    fn blend2d_numbering() {
        assert_eq!(CompOp::SrcOver.value(), 0);
        assert_eq!(CompOp::Clear.value(), 11);
        assert_eq!(CompOp::Multiply.value(), 15);
        assert_eq!(CompOp::Exclusion.value(), 28);
    }

    #[test]
    fn empty_frames_are_opaque_black() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill([9, 9, 9, 9]);
        RasterBackend::new().paint(&mut canvas, &[], 32.0, CompositingOperator::SourceOver);
        assert!(canvas.pixels().iter().all(|pixel| *pixel == [0, 0, 0, 255]));
    }

    #[test]
    fn squares_have_hard_edges() {
        let mut canvas = Canvas::new(10, 10);
        let particles = [particle(5.0, 5.0, RED)];
        RasterBackend::new().paint(&mut canvas, &particles, 2.3, CompositingOperator::SourceOver);

        // Covers x from 2.7 to 7.3, so only the pixels with centres 3.5 to 6.5.
        assert_eq!(canvas.pixel(2, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(6, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(7, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn operators_apply_to_every_square() {
        let mut canvas = Canvas::new(4, 4);
        let particles = [particle(2.0, 2.0, RED), particle(2.0, 2.0, RED)];
        RasterBackend::new().paint(&mut canvas, &particles, 1.0, CompositingOperator::Xor);

        // The first square xors the opaque black away, so the second has nothing to xor with.
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn clear_operator_erases_under_squares() {
        let mut canvas = Canvas::new(4, 4);
        let particles = [particle(2.0, 2.0, RED)];
        RasterBackend::new().paint(&mut canvas, &particles, 1.0, CompositingOperator::Clear);
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn squares_straddling_the_edge_are_clipped() {
        let mut canvas = Canvas::new(4, 4);
        let particles = [particle(0.0, 0.0, RED)];
        RasterBackend::new().paint(&mut canvas, &particles, 32.0, CompositingOperator::SourceOver);
        assert!(canvas.pixels().iter().all(|pixel| *pixel == [255, 0, 0, 255]));
    }
}
