//! What a tick-driving host needs: the particles, the global render state and the active backend,
//! advanced and painted together once per tick.
//!
//! The host owns the timer and the canvas. All the setters here are expected to be called between
//! ticks, from the same thread that ticks.

use std::collections::VecDeque;

use crate::backends::Backends;
use crate::canvas::Canvas;
use crate::composition::{BackendKind, CompositingOperator};
use crate::particles::{Bounds, ParticleSystem};
use crate::random::RandomSource;

/// The default number of particles.
pub const DEFAULT_COUNT: usize = 50;

/// The default side length of each rectangle.
pub const DEFAULT_RECT_SIZE: f64 = 64.0;

/// The number of recent frames that the frame rate is averaged over.
pub const FRAME_RATE_SAMPLES: usize = 30;

/// How often the host should tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum TickInterval {
    /// As fast as is sensible: every 2ms.
    #[default]
    Unlimited,
    /// Roughly 60 frames per second.
    Limited,
}

impl TickInterval {
    /// The interval for the given frame rate limiting.
    #[must_use]
    pub const fn new(limit_fps: bool) -> Self {
        if limit_fps {
            Self::Limited
        } else {
            Self::Unlimited
        }
    }

    /// The time between ticks.
    #[must_use]
    pub const fn duration(self) -> std::time::Duration {
        match self {
            Self::Unlimited => std::time::Duration::from_millis(2),
            Self::Limited => std::time::Duration::from_millis(1000 / 60),
        }
    }
}

/// The average frame rate over the most recent frames.
#[derive(Debug, Clone, Default)]
pub struct FrameRateCounter {
    /// When the last frame was recorded.
    last_frame: Option<std::time::Instant>,
    /// Seconds between recent frames, newest first.
    durations: VecDeque<f64>,
}

impl FrameRateCounter {
    /// Record that a frame happened at the given moment.
    pub fn frame_at(&mut self, now: std::time::Instant) {
        if let Some(last_frame) = self.last_frame {
            self.record(now.saturating_duration_since(last_frame));
        }
        self.last_frame = Some(now);
    }

    /// Record the time a frame took.
    pub fn record(&mut self, duration: std::time::Duration) {
        self.durations.push_front(duration.as_secs_f64());
        if self.durations.len() > FRAME_RATE_SAMPLES {
            self.durations.pop_back();
        }
    }

    /// Frames per second. Zero until enough frames have been recorded.
    #[must_use]
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "There are never more than a few dozen samples"
    )]
    pub fn fps(&self) -> f64 {
        let total = self.durations.iter().sum::<f64>();
        if total <= 0.0 {
            return 0.0;
        }
        let average = total / self.durations.len() as f64;
        1.0 / average
    }
}

/// Everything that can be set before creating an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "Hosts build their settings with struct update syntax"
)]
pub struct AnimationSettings {
    /// The number of particles.
    pub count: usize,
    /// The side length of each rectangle.
    pub rect_size: f64,
    /// The active compositing operator.
    pub operator: CompositingOperator,
    /// The active backend.
    pub backend: BackendKind,
    /// Whether ticks are limited to about 60 a second.
    pub limit_fps: bool,
    /// The canvas size that the first particles are placed within.
    pub bounds: Bounds,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            rect_size: DEFAULT_RECT_SIZE,
            operator: CompositingOperator::default(),
            backend: BackendKind::default(),
            limit_fps: false,
            bounds: Bounds::default(),
        }
    }
}

/// State read once at the start of painting every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct RenderState {
    /// The active compositing operator.
    pub operator: CompositingOperator,
    /// Half the side length of each rectangle.
    pub half_extent: f64,
}

/// The bouncing rectangles, ready to be ticked.
pub struct Animation<R: RandomSource = rand::rngs::StdRng> {
    /// The simulation
    particles: ParticleSystem<R>,
    /// The operator and rectangle size
    render_state: RenderState,
    /// Both backends
    backends: Backends,
    /// The backend that paints
    backend: BackendKind,
    /// How often to tick
    interval: TickInterval,
    /// Invisible animations don't tick
    is_visible: bool,
    /// Recent frame rate
    frame_rate: FrameRateCounter,
}

impl<R: RandomSource> Animation<R> {
    /// Instantiate, with all the particles already created.
    pub fn new(settings: AnimationSettings, random: R) -> Self {
        let mut particles = ParticleSystem::new(settings.bounds, random);
        particles.resize(settings.count);

        Self {
            particles,
            render_state: RenderState {
                operator: settings.operator,
                half_extent: Self::half_extent_of(settings.rect_size),
            },
            backends: Backends::default(),
            backend: settings.backend,
            interval: TickInterval::new(settings.limit_fps),
            is_visible: true,
            frame_rate: FrameRateCounter::default(),
        }
    }

    /// Half of a rectangle's side length. Unusable sizes draw nothing.
    fn half_extent_of(rect_size: f64) -> f64 {
        if rect_size.is_finite() {
            rect_size.max(0.0) * 0.5
        } else {
            0.0
        }
    }

    /// Advance the simulation by one step and paint the result. Returns whether a frame was
    /// actually produced, which it isn't while the animation is invisible.
    pub fn tick(&mut self, canvas: &mut Canvas) -> bool {
        if !self.is_visible {
            return false;
        }

        self.particles.step(canvas.bounds());

        let RenderState {
            operator,
            half_extent,
        } = self.render_state;
        self.backends.get(self.backend).paint(
            canvas,
            self.particles.particles(),
            half_extent,
            operator,
        );

        self.frame_rate.frame_at(std::time::Instant::now());
        true
    }

    /// Change the number of particles.
    pub fn resize(&mut self, count: usize) {
        self.particles.resize(count);
    }

    /// Change the compositing operator used from the next frame.
    pub fn set_operator(&mut self, operator: CompositingOperator) {
        tracing::debug!("Compositing operator set to {operator}");
        self.render_state.operator = operator;
    }

    /// Change the backend used from the next frame.
    pub fn set_backend(&mut self, backend: BackendKind) {
        tracing::debug!("Backend set to {backend}");
        self.backend = backend;
    }

    /// Change the side length of the rectangles.
    pub fn set_rect_size(&mut self, rect_size: f64) {
        self.render_state.half_extent = Self::half_extent_of(rect_size);
    }

    /// Toggle limiting the tick rate to about 60 a second.
    pub const fn set_limit_fps(&mut self, limit_fps: bool) {
        self.interval = TickInterval::new(limit_fps);
    }

    /// Start or stop ticking.
    pub fn set_visible(&mut self, is_visible: bool) {
        self.is_visible = is_visible;
        if !is_visible {
            self.frame_rate.last_frame = None;
        }
    }

    /// The particle simulation.
    pub const fn particles(&self) -> &ParticleSystem<R> {
        &self.particles
    }

    /// The state that the next frame is painted with.
    pub const fn render_state(&self) -> RenderState {
        self.render_state
    }

    /// The active backend.
    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    /// The backends, for changing their parameters.
    pub const fn backends_mut(&mut self) -> &mut Backends {
        &mut self.backends
    }

    /// How often the host should tick.
    pub const fn interval(&self) -> TickInterval {
        self.interval
    }

    /// Is the animation ticking?
    pub const fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// The recent frame rate.
    pub const fn frame_rate(&self) -> &FrameRateCounter {
        &self.frame_rate
    }

    /// A one line summary, suitable for a window title.
    pub fn status_line(&self, canvas: &Canvas) -> String {
        format!(
            "Rectangles Sample [{}x{}] [N={}] [{:.1} FPS]",
            canvas.width(),
            canvas.height(),
            self.particles.len(),
            self.frame_rate.fps()
        )
    }
}
