//! The bouncing particles. Each one is a rectangle centre that drifts at a constant speed and
//! reflects off the edges of the canvas.

use glam::DVec2;

use crate::random::RandomSource;

/// The smallest speed a particle can have along either axis.
pub const MIN_SPEED: f64 = 0.05;

/// The range of additional speed a particle can be given along either axis.
pub const SPEED_RANGE: f64 = 0.5;

/// The number of distinct values each colour channel is drawn from. So channels land in
/// `[0, 255)`.
const CHANNEL_VALUES: f64 = 255.0;

/// The extent of the area that particles bounce around in.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Bounds {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Bounds {
    /// Instantiate
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether an axis has a usable extent. Zero, negative and non-finite extents are degenerate.
    #[must_use]
    pub fn is_valid_axis(extent: f64) -> bool {
        extent.is_finite() && extent > 0.0
    }

    /// Whether both axes are usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Self::is_valid_axis(self.width) && Self::is_valid_axis(self.height)
    }
}

/// A single bouncing rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Particle {
    /// Centre of the rectangle in canvas coordinates.
    pub position: DVec2,
    /// Distance travelled every tick.
    pub velocity: DVec2,
    /// Straight, non-premultiplied, colour.
    pub colour: palette::Srgba<u8>,
}

impl Particle {
    /// Instantiate
    #[must_use]
    pub const fn new(position: DVec2, velocity: DVec2, colour: palette::Srgba<u8>) -> Self {
        Self {
            position,
            velocity,
            colour,
        }
    }

    /// A particle with random position, velocity and colour.
    ///
    /// Values are drawn in a fixed order: position x and y, then the x speed and sign, the y
    /// speed and sign, then the red, green, blue and alpha channels.
    pub fn random<R: RandomSource + ?Sized>(random: &mut R, bounds: Bounds) -> Self {
        let x = random.unit() * Self::usable_extent(bounds.width);
        let y = random.unit() * Self::usable_extent(bounds.height);
        let velocity_x = Self::random_speed(random);
        let velocity_y = Self::random_speed(random);
        let red = Self::random_channel(random);
        let green = Self::random_channel(random);
        let blue = Self::random_channel(random);
        let alpha = Self::random_channel(random);

        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::new(velocity_x, velocity_y),
            colour: palette::Srgba::new(red, green, blue, alpha),
        }
    }

    /// Degenerate axes place new particles at 0.
    fn usable_extent(extent: f64) -> f64 {
        if Bounds::is_valid_axis(extent) {
            extent
        } else {
            0.0
        }
    }

    /// A speed with a magnitude in `[MIN_SPEED, MIN_SPEED + SPEED_RANGE]` and a random sign.
    fn random_speed<R: RandomSource + ?Sized>(random: &mut R) -> f64 {
        let magnitude = random.unit().mul_add(SPEED_RANGE, MIN_SPEED);
        magnitude * random.sign()
    }

    /// A channel value in `[0, 255)`.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The value is clamped to the `u8` range first"
    )]
    fn random_channel<R: RandomSource + ?Sized>(random: &mut R) -> u8 {
        (random.unit() * CHANNEL_VALUES)
            .floor()
            .clamp(0.0, CHANNEL_VALUES - 1.0) as u8
    }

    /// Advance one axis by one tick, reflecting off the edges.
    ///
    /// If the moved coordinate touches or crosses either edge, the velocity is negated and
    /// applied again, then the coordinate is clamped to the far edge. There's no clamp at 0, the
    /// sign flip is what brings a particle back from below the near edge.
    fn advance_axis(position: &mut f64, velocity: &mut f64, extent: f64) {
        if !Bounds::is_valid_axis(extent) {
            return;
        }

        *position += *velocity;
        if *position <= 0.0 || *position >= extent {
            *velocity = -*velocity;
            *position = (*position + *velocity).min(extent);
        }
    }

    /// Advance by one tick inside the given bounds.
    pub fn step(&mut self, bounds: Bounds) {
        Self::advance_axis(&mut self.position.x, &mut self.velocity.x, bounds.width);
        Self::advance_axis(&mut self.position.y, &mut self.velocity.y, bounds.height);
    }
}

/// All the particles and the randomness used to create new ones.
pub struct ParticleSystem<R: RandomSource = rand::rngs::StdRng> {
    /// Particles in the order they were created.
    particles: Vec<Particle>,
    /// The most recently known canvas bounds. New particles are placed within these.
    bounds: Bounds,
    /// Randomness for new particles.
    random: R,
}

impl<R: RandomSource> ParticleSystem<R> {
    /// Instantiate an empty system.
    pub const fn new(bounds: Bounds, random: R) -> Self {
        Self {
            particles: Vec::new(),
            bounds,
            random,
        }
    }

    /// The bounds that new particles are placed within.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Let the system know about a new canvas size before the next step.
    pub const fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Are there no particles?
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All the particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// A single particle.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Change the number of particles. New particles are appended with random properties, and
    /// when shrinking, the newest particles are dropped.
    pub fn resize(&mut self, count: usize) {
        let current = self.particles.len();
        if count == current {
            return;
        }

        if count < current {
            self.particles.truncate(count);
        } else {
            self.particles.reserve(count - current);
            let bounds = self.bounds;
            let random = &mut self.random;
            self.particles
                .extend((current..count).map(|_| Particle::random(&mut *random, bounds)));
        }

        tracing::debug!("Resized particles from {current} to {count}");
    }

    /// Advance every particle by one tick.
    pub fn step(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    clippy::float_cmp,
    reason = "Tests aren't so strict"
)]
mod test {
    use std::collections::VecDeque;

    use rand::SeedableRng as _;

    use super::*;

    /// Hands out pre-arranged random values.
    struct Scripted {
        /// Values for `unit()`
        units: VecDeque<f64>,
        /// Values for `sign()`
        signs: VecDeque<f64>,
    }

    impl Scripted {
        fn new(units: &[f64], signs: &[f64]) -> Self {
            Self {
                units: units.iter().copied().collect(),
                signs: signs.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for Scripted {
        fn unit(&mut self) -> f64 {
            self.units.pop_front().unwrap()
        }

        fn sign(&mut self) -> f64 {
            self.signs.pop_front().unwrap()
        }
    }

    fn seeded(bounds: Bounds) -> ParticleSystem {
        ParticleSystem::new(bounds, rand::rngs::StdRng::seed_from_u64(1234))
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn resize_sets_the_count() {
        let mut system = seeded(Bounds::new(400.0, 300.0));
        for count in [0, 1, 50, 5000, 3, 0, 7] {
            system.resize(count);
            assert_eq!(system.len(), count);
        }
    }

    #[test]
    fn shrinking_keeps_the_oldest_particles() {
        let mut system = seeded(Bounds::new(400.0, 300.0));
        system.resize(20);
        for _ in 0..10 {
            system.step(Bounds::new(400.0, 300.0));
        }
        let before = system.particles()[..8].to_vec();
        system.resize(8);
        assert_eq!(system.particles(), before.as_slice());
    }

    #[test]
    fn resizing_to_the_same_count_changes_nothing() {
        let mut system = seeded(Bounds::new(400.0, 300.0));
        system.resize(5);
        let before = system.particles().to_vec();
        system.resize(5);
        assert_eq!(system.particles(), before.as_slice());
    }

    #[test]
    fn new_particles_are_in_range() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut system = seeded(bounds);
        system.resize(2000);
        for particle in system.particles() {
            assert!((0.0..640.0).contains(&particle.position.x));
            assert!((0.0..480.0).contains(&particle.position.y));
            for speed in [particle.velocity.x.abs(), particle.velocity.y.abs()] {
                assert!((MIN_SPEED..=MIN_SPEED + SPEED_RANGE).contains(&speed));
            }
            let colour = particle.colour;
            for channel in [colour.red, colour.green, colour.blue, colour.alpha] {
                assert!(channel < 255);
            }
        }
    }

    #[test]
    fn new_particles_consume_random_values_in_order() {
        let random = Scripted::new(
            &[0.25, 0.5, 0.0, 1.0 - f64::EPSILON, 0.0, 0.5, 0.999, 0.1],
            &[-1.0, 1.0],
        );
        let mut system = ParticleSystem::new(Bounds::new(400.0, 300.0), random);
        system.resize(1);
        let particle = system.particles()[0];

        assert_eq!(particle.position, DVec2::new(100.0, 150.0));
        assert!(approx(particle.velocity.x, -0.05));
        assert!(approx(particle.velocity.y, 0.55));
        assert_eq!(particle.colour, palette::Srgba::new(0, 127, 254, 25));
    }

    #[test]
    fn resizing_before_any_step_with_unknown_bounds() {
        let mut system = seeded(Bounds::default());
        system.resize(10);
        for particle in system.particles() {
            assert_eq!(particle.position, DVec2::ZERO);
        }
    }

    #[test]
    fn stays_in_bounds_over_many_ticks() {
        let bounds = Bounds::new(123.0, 45.5);
        let mut system = seeded(bounds);
        system.resize(500);
        for _ in 0..5000 {
            system.step(bounds);
            for particle in system.particles() {
                assert!((0.0..=bounds.width).contains(&particle.position.x));
                assert!((0.0..=bounds.height).contains(&particle.position.y));
            }
        }
    }

    #[test]
    fn shrinking_the_canvas_pulls_particles_back_inside() {
        let mut system = seeded(Bounds::new(800.0, 600.0));
        system.resize(300);
        let smaller = Bounds::new(100.0, 50.0);
        system.step(smaller);
        for particle in system.particles() {
            assert!((0.0..=smaller.width).contains(&particle.position.x));
            assert!((0.0..=smaller.height).contains(&particle.position.y));
        }
    }

    #[test]
    fn bouncing_scenario() {
        let bounds = Bounds::new(400.0, 300.0);
        let opaque = [0.0, 0.0, 0.0, 1.0 - f64::EPSILON];
        let units = [
            [0.025, 1.0 / 30.0, 0.5, 0.5],
            [0.999_75, 1.0 / 30.0, 0.5, 0.5],
            // A speed of -0.1 cancels out the minimum speed, so the x velocity is 0.
            [0.5, 0.5, -0.1, 0.5],
        ]
        .iter()
        .flat_map(|particle| particle.iter().chain(&opaque).copied())
        .collect::<Vec<f64>>();
        let signs = [1.0, 1.0, 1.0, 1.0, 1.0, -1.0];
        let mut system = ParticleSystem::new(bounds, Scripted::new(&units, &signs));

        system.resize(3);
        assert_eq!(system.len(), 3);
        let particles = system.particles();
        assert!(approx(particles[0].position.x, 10.0));
        assert!(approx(particles[0].position.y, 10.0));
        assert!(approx(particles[1].position.x, 399.9));
        assert!(approx(particles[2].position.x, 200.0));
        assert!(approx(particles[2].position.y, 150.0));
        assert!(approx(particles[2].velocity.x, 0.0));
        assert!(approx(particles[2].velocity.y, -0.3));
        assert_eq!(particles[0].colour, palette::Srgba::new(0, 0, 0, 254));

        system.step(bounds);
        let particles = system.particles();

        assert!(approx(particles[0].position.x, 10.3));
        assert!(approx(particles[0].position.y, 10.3));
        assert!(approx(particles[0].velocity.x, 0.3));
        assert!(approx(particles[0].velocity.y, 0.3));

        assert!(approx(particles[1].velocity.x, -0.3));
        assert!(particles[1].position.x <= 400.0);
        assert!(approx(particles[1].position.x, 399.9));
        assert!(approx(particles[1].position.y, 10.3));

        assert!(approx(particles[2].position.x, 200.0));
        assert!(approx(particles[2].position.y, 149.7));
    }

    #[test]
    fn overshooting_the_far_edge_is_clamped() {
        let mut particle = Particle::new(
            DVec2::new(450.0, 10.0),
            DVec2::new(0.3, 0.3),
            palette::Srgba::new(0, 0, 0, 255),
        );
        particle.step(Bounds::new(400.0, 300.0));
        assert_eq!(particle.position.x, 400.0);
        assert_eq!(particle.velocity.x, -0.3);
    }

    #[test]
    fn the_near_edge_is_only_corrected_by_the_reflection() {
        let mut particle = Particle::new(
            DVec2::new(0.1, 10.0),
            DVec2::new(-0.3, 0.0),
            palette::Srgba::new(0, 0, 0, 255),
        );
        particle.step(Bounds::new(400.0, 300.0));
        assert_eq!(particle.velocity.x, 0.3);
        assert!(approx(particle.position.x, 0.1));
    }

    #[test]
    fn degenerate_bounds_leave_positions_alone() {
        let mut system = seeded(Bounds::new(400.0, 300.0));
        system.resize(10);
        let before = system.particles().to_vec();

        system.step(Bounds::new(0.0, -5.0));
        assert_eq!(system.particles(), before.as_slice());

        system.step(Bounds::new(f64::NAN, 300.0));
        for (after, original) in system.particles().iter().zip(&before) {
            assert_eq!(after.position.x, original.position.x);
            assert_eq!(after.velocity.x, original.velocity.x);
            assert!((0.0..=300.0).contains(&after.position.y));
        }
    }

    #[test]
    fn empty_systems_step_without_trouble() {
        let mut system = seeded(Bounds::new(400.0, 300.0));
        system.step(Bounds::new(400.0, 300.0));
        assert!(system.is_empty());
    }
}
