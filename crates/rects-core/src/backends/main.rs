//! The rendering capability that both backends share, and the selection between them.

use crate::canvas::Canvas;
use crate::composition::{BackendKind, CompositingOperator};
use crate::particles::Particle;

use super::painter::PainterBackend;
use super::raster::RasterBackend;

/// Paints one frame of particles.
pub trait RenderBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Whether the edges of boxes get fractional coverage.
    fn is_antialiased(&self) -> bool;

    /// Clear the canvas to opaque black, then composite a `2 * half_extent` square of each
    /// particle's colour, centred on the particle, using the backend's native version of the
    /// operator.
    fn paint(
        &self,
        canvas: &mut Canvas,
        particles: &[Particle],
        half_extent: f64,
        operator: CompositingOperator,
    );
}

/// One instance of each backend, chosen between with a [`BackendKind`].
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Backends {
    /// The hard-edged backend
    pub raster: RasterBackend,
    /// The antialiasing backend
    pub painter: PainterBackend,
}

impl Backends {
    /// The backend for the given kind.
    #[must_use]
    pub fn get(&self, kind: BackendKind) -> &dyn RenderBackend {
        match kind {
            BackendKind::Raster => &self.raster,
            BackendKind::Painter => &self.painter,
        }
    }
}
