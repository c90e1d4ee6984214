//! The painter backend. It speaks `QPainter`'s compositing vocabulary and, like a `QPainter` with
//! `Antialiasing` set as a render hint, smooths the edges of everything it fills.

use crate::backends::context::{self, CanvasContext, NativeMode};
use crate::blend::{self, Premultiplied};
use crate::canvas::Canvas;
use crate::composition::{self, BackendKind, CompositingOperator};
use crate::particles::Particle;

/// `QPainter::CompositionMode`, with Qt's own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CompositionMode {
    /// The default mode.
    SourceOver = 0,
    /// Destination over source.
    DestinationOver = 1,
    /// Transparent everywhere that is painted.
    Clear = 2,
    /// Source replaces the destination.
    Source = 3,
    /// Leaves the destination untouched.
    Destination = 4,
    /// Source in destination.
    SourceIn = 5,
    /// Destination in source.
    DestinationIn = 6,
    /// Source out of destination.
    SourceOut = 7,
    /// Destination out of source.
    DestinationOut = 8,
    /// Source atop destination.
    SourceAtop = 9,
    /// Destination atop source.
    DestinationAtop = 10,
    /// Xor
    Xor = 11,
    /// Plus
    Plus = 12,
    /// Multiply
    Multiply = 13,
    /// Screen
    Screen = 14,
    /// Overlay
    Overlay = 15,
    /// Darken
    Darken = 16,
    /// Lighten
    Lighten = 17,
    /// Colour dodge
    ColorDodge = 18,
    /// Colour burn
    ColorBurn = 19,
    /// Hard light
    HardLight = 20,
    /// Soft light
    SoftLight = 21,
    /// Difference
    Difference = 22,
    /// Exclusion
    Exclusion = 23,
}

impl CompositionMode {
    /// Qt's numeric value for the mode.
    #[must_use]
    #[expect(
        clippy::as_conversions,
        reason = "Fieldless enum to its own discriminant"
    )]
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl NativeMode for CompositionMode {
    fn composite(self, source: Premultiplied, destination: Premultiplied) -> Premultiplied {
        let operation = match self {
            Self::SourceOver => blend::source_over,
            Self::DestinationOver => blend::destination_over,
            Self::Clear => blend::clear,
            Self::Source => blend::source_copy,
            Self::Destination => blend::destination_copy,
            Self::SourceIn => blend::source_in,
            Self::DestinationIn => blend::destination_in,
            Self::SourceOut => blend::source_out,
            Self::DestinationOut => blend::destination_out,
            Self::SourceAtop => blend::source_atop,
            Self::DestinationAtop => blend::destination_atop,
            Self::Xor => blend::xor,
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

/// The antialiasing backend.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct PainterBackend {
    /// Whether box edges get fractional coverage.
    pub antialiasing: bool,
}

impl Default for PainterBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PainterBackend {
    /// Instantiate. Antialiasing is normally on, turning it off makes the output match the raster
    /// backend.
    #[must_use]
    pub const fn new(antialiasing: bool) -> Self {
        Self { antialiasing }
    }
}

impl super::RenderBackend for PainterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Painter
    }

    fn is_antialiased(&self) -> bool {
        self.antialiasing
    }

    fn paint(
        &self,
        canvas: &mut Canvas,
        particles: &[Particle],
        half_extent: f64,
        operator: CompositingOperator,
    ) {
        let mode = composition::painter_operator(operator);
        let mut context = CanvasContext::new(canvas, CompositionMode::SourceOver);
        context::paint_frame(&mut context, particles, half_extent, mode, self.antialiasing);
    }
}

#[cfg(test)]
mod test {
    use glam::DVec2;

    use super::*;
    use crate::backends::raster::RasterBackend;
    use crate::backends::RenderBackend;

    const WHITE: palette::Srgba<u8> = palette::Srgba::new(255, 255, 255, 255);

    fn particle(x: f64, y: f64, colour: palette::Srgba<u8>) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::ZERO, colour)
    }

    fn paint(backend: &dyn RenderBackend, particles: &[Particle], half_extent: f64) -> Canvas {
        let mut canvas = Canvas::new(10, 10);
        backend.paint(
            &mut canvas,
            particles,
            half_extent,
            CompositingOperator::SourceOver,
        );
        canvas
    }

    #[test]
    fn qt_numbering() {
        assert_eq!(CompositionMode::SourceOver.value(), 0);
        assert_eq!(CompositionMode::Clear.value(), 2);
        assert_eq!(CompositionMode::Source.value(), 3);
        assert_eq!(CompositionMode::Exclusion.value(), 23);
    }

    #[test]
    fn antialiasing_is_on_by_default() {
        assert!(PainterBackend::default().is_antialiased());
        assert!(!PainterBackend::new(false).is_antialiased());
    }

    #[test]
    fn edges_are_antialiased() {
        let particles = [particle(5.0, 5.0, WHITE)];
        let canvas = paint(&PainterBackend::default(), &particles, 2.25);

        // Covers 2.75 to 7.25, so the edge pixels are a quarter covered.
        assert_eq!(canvas.pixel(2, 5), Some([64, 64, 64, 255]));
        assert_eq!(canvas.pixel(3, 5), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(7, 5), Some([64, 64, 64, 255]));
        assert_eq!(canvas.pixel(2, 2), Some([16, 16, 16, 255]));
        assert_eq!(canvas.pixel(8, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn only_the_painter_has_soft_edges() {
        let particles = [particle(5.0, 5.0, WHITE)];
        let raster = paint(&RasterBackend::new(), &particles, 2.25);
        let hard_painter = paint(&PainterBackend::new(false), &particles, 2.25);
        let soft_painter = paint(&PainterBackend::default(), &particles, 2.25);

        assert_eq!(raster.pixels(), hard_painter.pixels());
        assert_ne!(raster.pixels(), soft_painter.pixels());
    }

    #[test]
    fn pixel_aligned_squares_look_the_same_on_both_backends() {
        let particles = [particle(4.0, 4.0, WHITE), particle(6.0, 5.0, WHITE)];
        let raster = paint(&RasterBackend::new(), &particles, 2.0);
        let painter = paint(&PainterBackend::default(), &particles, 2.0);
        assert_eq!(raster.pixels(), painter.pixels());
    }

    #[test]
    fn every_operator_paints_the_same_interior_on_both_backends() {
        let particles = [
            particle(4.0, 4.0, palette::Srgba::new(200, 40, 90, 180)),
            particle(5.0, 5.0, palette::Srgba::new(10, 220, 130, 100)),
        ];
        for operator in CompositingOperator::ALL {
            let mut raster = Canvas::new(10, 10);
            let mut painter = Canvas::new(10, 10);
            RasterBackend::new().paint(&mut raster, &particles, 3.0, operator);
            PainterBackend::default().paint(&mut painter, &particles, 3.0, operator);
            assert_eq!(raster.pixels(), painter.pixels(), "{operator}");
        }
    }
}
