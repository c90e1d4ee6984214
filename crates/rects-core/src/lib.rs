//! Bouncing rectangles: a small particle simulation rendered through two software backends that
//! each speak their own native compositing vocabulary.
//!
//! The pieces, leaves first:
//!   * [`composition`] translates the abstract [`CompositingOperator`] into each backend's native
//!     operator.
//!   * [`particles`] owns and advances the simulation state.
//!   * [`backends`] paints a frame of particles onto a [`Canvas`].
//!   * [`animation`] is the contract that a tick-driving host (a window, or our headless runner)
//!     calls into.

pub mod animation;
pub mod blend;
pub mod canvas;
pub mod composition;
pub mod particles;
pub mod random;

/// The two rendering backends and the painting contract they share.
pub mod backends {
    pub mod context;
    pub mod painter;
    pub mod raster;

    mod main;
    pub use main::*;
}

pub use animation::{Animation, AnimationSettings, FrameRateCounter, TickInterval};
pub use canvas::Canvas;
pub use composition::{BackendKind, CompositingOperator, NativeOperator};
pub use particles::{Bounds, Particle, ParticleSystem};
pub use random::RandomSource;
