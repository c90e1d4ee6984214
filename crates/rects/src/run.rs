//! Main entrypoint for running the animation headlessly.

use color_eyre::eyre::{ContextCompat as _, Result};
use rand::SeedableRng as _;
use rects_core::{Animation, Canvas};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::CliArgs;
use crate::config::{Config, LogLevel};

/// The environment variable for setting custom log filters.
pub const LOG_FILTERS_ENV: &str = "RECTS_LOG";

/// How many frames between each status update in the logs.
const STATUS_INTERVAL: u64 = 500;

/// What happened during a run.
#[derive(Debug)]
#[non_exhaustive]
pub struct Outcome {
    /// The number of frames painted.
    pub frames: u64,
    /// The final status line.
    pub status: String,
    /// The final frame.
    pub canvas: Canvas,
    /// Where the final frame was saved.
    pub exported: Option<std::path::PathBuf>,
    /// Where logs were written.
    pub log_path: Option<std::path::PathBuf>,
}

/// Main entrypoint
pub async fn run(cli_args: CliArgs) -> Result<Outcome> {
    let config = setup(&cli_args)?;
    let is_logging = setup_logging(&config)?;

    tracing::info!("Starting rects");
    tracing::debug!("Loaded config: {config:?}");

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl-C, stopping"),
            Err(error) => {
                tracing::error!("Couldn't listen for Ctrl-C: {error:?}");
                core::future::pending::<()>().await;
            }
        }
    };

    let mut outcome = animate(&config, shutdown).await?;
    if is_logging {
        outcome.log_path = Some(config.log_path.clone());
    }

    tracing::trace!("Leaving the main `run()` function");
    Ok(outcome)
}

/// Load the config and apply the CLI overrides.
pub fn setup(cli_args: &CliArgs) -> Result<Config> {
    let mut config = Config::load(cli_args.config.as_deref())?;
    config.apply_cli_args(cli_args);
    config.validate()?;
    Ok(config)
}

/// Tick the animation until the frame limit is reached or `shutdown` completes, then save the
/// final frame if asked to.
pub async fn animate(
    config: &Config,
    shutdown: impl core::future::Future<Output = ()>,
) -> Result<Outcome> {
    let random = match config.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    let mut animation = Animation::new(config.animation_settings(), random);
    animation.backends_mut().painter.antialiasing = config.antialiasing;
    let mut canvas = Canvas::new(config.width, config.height);

    let mut interval = tokio::time::interval(animation.interval().duration());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    tracing::info!(
        "Animating {} rectangles with the {} backend and the {} operator",
        config.particle_count,
        config.backend,
        config.operator
    );

    let mut frames: u64 = 0;
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "This is caused by the `tokio::select!`"
    )]
    loop {
        if config.frames.is_some_and(|limit| frames >= limit) {
            break;
        }

        tokio::select! {
            _ = interval.tick() => {
                if animation.tick(&mut canvas) {
                    frames += 1;
                }
                if frames.is_multiple_of(STATUS_INTERVAL) {
                    tracing::info!("{}", animation.status_line(&canvas));
                }
            },
            () = &mut shutdown => break,
        }
    }

    let status = animation.status_line(&canvas);
    tracing::info!("Finished after {frames} frames: {status}");

    let exported = match &config.output {
        Some(path) => {
            crate::export::save_png(&canvas, path)?;
            Some(path.clone())
        }
        None => None,
    };

    Ok(Outcome {
        frames,
        status,
        canvas,
        exported,
        log_path: None,
    })
}

/// Setup logging. Returns whether logs are being written.
pub fn setup_logging(config: &Config) -> Result<bool> {
    let are_log_filters_manually_set = std::env::var(LOG_FILTERS_ENV).is_ok();
    let level = config.log_level;
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable = !matches!(level, LogLevel::Off) || are_log_filters_manually_set;
    if !is_loggable {
        return Ok(false);
    }

    let path = &config.log_path;
    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(path)?;

    let filters = if are_log_filters_manually_set {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .with_env_var(LOG_FILTERS_ENV)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .with_env_var(LOG_FILTERS_ENV)
            .from_env_lossy()
            .add_directive(format!("rects={level_as_string}").parse()?)
            .add_directive(format!("rects_core={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).try_init()?;

    Ok(true)
}
