//! End to end tests
#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "Tests aren't so strict")]
mod e2e {
    use clap::Parser as _;
    use rand::SeedableRng as _;
    use rects_core::backends::context::{self, PaintContext, Rect};
    use rects_core::backends::painter::CompositionMode;
    use rects_core::composition;
    use rects_core::{
        Animation, AnimationSettings, BackendKind, Bounds, Canvas, CompositingOperator, Particle,
        ParticleSystem,
    };

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn seeded() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(2024)
    }

    fn settings(backend: BackendKind, operator: CompositingOperator) -> AnimationSettings {
        AnimationSettings {
            count: 300,
            rect_size: 24.0,
            operator,
            backend,
            limit_fps: false,
            bounds: Bounds::new(160.0, 120.0),
        }
    }

    #[test]
    fn every_operator_on_every_backend() {
        for backend in BackendKind::ALL {
            for operator in CompositingOperator::ALL {
                let settings = AnimationSettings {
                    count: 30,
                    rect_size: 6.0,
                    bounds: Bounds::new(40.0, 30.0),
                    ..settings(backend, operator)
                };
                let mut animation = Animation::new(settings, seeded());
                let mut canvas = Canvas::new(40, 30);
                for _ in 0..3 {
                    assert!(animation.tick(&mut canvas));
                }
                assert_eq!(animation.particles().len(), 30);
                for particle in animation.particles().particles() {
                    assert!((0.0..=40.0).contains(&particle.position.x));
                    assert!((0.0..=30.0).contains(&particle.position.y));
                }
                for pixel in canvas.pixels() {
                    assert!(pixel[..3].iter().all(|channel| channel <= &pixel[3]));
                }
            }
        }
    }

    #[test]
    fn destination_copy_leaves_only_the_background() {
        for backend in BackendKind::ALL {
            let settings = settings(backend, CompositingOperator::DestinationCopy);
            let mut animation = Animation::new(settings, seeded());
            let mut canvas = Canvas::new(160, 120);
            animation.tick(&mut canvas);
            assert!(canvas.pixels().iter().all(|pixel| *pixel == BLACK));
        }
    }

    #[test]
    fn changing_settings_between_ticks() {
        let settings = settings(BackendKind::Raster, CompositingOperator::SourceOver);
        let mut animation = Animation::new(settings, seeded());
        let mut canvas = Canvas::new(160, 120);

        animation.tick(&mut canvas);
        animation.resize(10);
        animation.set_operator(CompositingOperator::Plus);
        animation.set_backend(BackendKind::Painter);
        animation.set_rect_size(4.0);
        canvas.resize(80, 60);
        animation.tick(&mut canvas);

        assert_eq!(animation.particles().len(), 10);
        assert_eq!(animation.particles().bounds(), Bounds::new(80.0, 60.0));
        for particle in animation.particles().particles() {
            assert!(particle.position.x <= 80.0);
            assert!(particle.position.y <= 60.0);
        }
        assert!(animation.status_line(&canvas).contains("[80x60] [N=10]"));

        animation.resize(0);
        animation.tick(&mut canvas);
        assert!(canvas.pixels().iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn the_four_hundred_by_three_hundred_scenario() {
        let bounds = Bounds::new(400.0, 300.0);
        let mut particle = Particle::new(
            glam::DVec2::new(399.9, 150.0),
            glam::DVec2::new(0.3, 0.1),
            palette::Srgba::new(1, 2, 3, 4),
        );
        particle.step(bounds);
        assert!((particle.velocity.x + 0.3).abs() < f64::EPSILON);
        assert!(particle.position.x <= 400.0);
        assert!((particle.position.y - 150.1).abs() < 1e-9);
    }

    /// Counts fills and checks that the frame starts by clearing.
    struct Counter {
        cleared: bool,
        fills: usize,
    }

    impl PaintContext for Counter {
        type Mode = CompositionMode;

        fn size(&self) -> (f64, f64) {
            (400.0, 300.0)
        }

        fn clear(&mut self, colour: palette::Srgba<u8>) {
            assert_eq!(colour, context::OPAQUE_BLACK);
            self.cleared = true;
        }

        fn set_composition_mode(&mut self, mode: CompositionMode) {
            assert_eq!(mode, CompositionMode::Source);
        }

        fn set_antialiasing(&mut self, is_enabled: bool) {
            assert!(is_enabled);
        }

        fn fill_rect(&mut self, rect: Rect, _colour: palette::Srgba<u8>) {
            assert!(self.cleared);
            assert!((rect.x1 - rect.x0 - 64.0).abs() < 1e-9);
            self.fills += 1;
        }
    }

    #[test]
    fn custom_contexts_see_every_particle() {
        let mut system = ParticleSystem::new(Bounds::new(400.0, 300.0), seeded());
        system.resize(5);
        system.resize(5);

        let mode = composition::painter_operator(CompositingOperator::SourceCopy);
        let mut counter = Counter {
            cleared: false,
            fills: 0,
        };
        context::paint_frame(&mut counter, system.particles(), 32.0, mode, true);
        assert_eq!(counter.fills, 5);

        system.resize(0);
        let mut counter = Counter {
            cleared: false,
            fills: 0,
        };
        context::paint_frame(&mut counter, system.particles(), 32.0, mode, true);
        assert!(counter.cleared);
        assert_eq!(counter.fills, 0);
    }

    #[tokio::test]
    async fn headless_run_saves_a_png() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join("rects.toml");
        let output = directory.path().join("frames").join("last.png");
        std::fs::write(
            &config_path,
            "width = 120\nheight = 90\nparticle_count = 40\nbackend = \"painter\"\n",
        )
        .unwrap();

        let cli_args = rects::cli_args::CliArgs::try_parse_from([
            "rects",
            "--config",
            config_path.to_str().unwrap(),
            "--operator",
            "screen",
            "--frames",
            "12",
            "--seed",
            "5",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let outcome = rects::run::run(cli_args).await.unwrap();
        assert_eq!(outcome.frames, 12);
        assert_eq!(outcome.exported.as_deref(), Some(output.as_path()));
        assert!(outcome.log_path.is_none());
        assert!(outcome.status.starts_with("Rectangles Sample [120x90] [N=40]"));

        let image = image::open(&output).unwrap().into_rgba8();
        assert_eq!(image.dimensions(), (120, 90));
        assert!(image.pixels().any(|pixel| pixel.0 != BLACK));
    }

    #[tokio::test]
    async fn bad_config_is_reported() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join("rects.toml");
        std::fs::write(&config_path, "particle_count = 9000\n").unwrap();

        let cli_args = rects::cli_args::CliArgs::try_parse_from([
            "rects",
            "--config",
            config_path.to_str().unwrap(),
            "--frames",
            "1",
        ])
        .unwrap();
        assert!(rects::run::run(cli_args).await.is_err());
    }
}
