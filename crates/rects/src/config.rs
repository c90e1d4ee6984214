//! All of the user config.

use color_eyre::eyre::{ContextCompat as _, Result, WrapErr as _};
use rects_core::{AnimationSettings, BackendKind, Bounds, CompositingOperator};

use crate::cli_args::CliArgs;

/// A copy of the default config file, with every setting documented.
pub static DEFAULT_CONFIG: &str = include_str!("../default_config.toml");

/// The name of the config file in the standard config directory.
pub const CONFIG_FILE_NAME: &str = "rects.toml";

/// The most rectangles that can be animated.
pub const MAX_PARTICLES: usize = 5000;

/// The valid log levels. Based on our `tracing` crate.
#[derive(
    serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// The number of rectangles
    pub particle_count: usize,
    /// The side length of each rectangle
    pub rect_size: f64,
    /// The compositing operator
    pub operator: CompositingOperator,
    /// The rendering backend
    pub backend: BackendKind,
    /// Whether the painter backend antialiases
    pub antialiasing: bool,
    /// Tick at about 60 frames a second
    pub limit_fps: bool,
    /// Stop after this many frames
    pub frames: Option<u64>,
    /// Seed for the randomness
    pub seed: Option<u64>,
    /// Where to save the final frame
    pub output: Option<std::path::PathBuf>,
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory.join("rects").join("rects.log");

        Self {
            width: 580,
            height: 520,
            particle_count: rects_core::animation::DEFAULT_COUNT,
            rect_size: rects_core::animation::DEFAULT_RECT_SIZE,
            operator: CompositingOperator::default(),
            backend: BackendKind::default(),
            antialiasing: true,
            limit_fps: false,
            frames: None,
            seed: None,
            output: None,
            log_level: LogLevel::Off,
            log_path,
        }
    }
}

impl Config {
    /// Get the stable location of the config file on the user's system.
    pub fn default_path() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join("rects")
            .join(CONFIG_FILE_NAME))
    }

    /// Parse config from TOML. Settings that aren't mentioned keep their defaults.
    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str::<Self>(data)?)
    }

    /// Load the config from the given path, or the standard location. When no path is given
    /// and there's nothing at the standard location, the defaults are used.
    pub fn load(maybe_path: Option<&std::path::Path>) -> Result<Self> {
        let path = match maybe_path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::default_path()?;
                if !default_path.exists() {
                    tracing::debug!("No config at {default_path:?}, using defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        tracing::info!("Loading config from: {path:?}");
        let data = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Couldn't load config at {}", path.display()))?;
        tracing::trace!("Using config file:\n{data}");
        Self::parse(&data).wrap_err_with(|| format!("Bad config file: {}", path.display()))
    }

    /// Let any CLI arguments override the config.
    pub fn apply_cli_args(&mut self, cli_args: &CliArgs) {
        if let Some(backend) = cli_args.backend {
            self.backend = backend;
        }
        if let Some(operator) = cli_args.operator {
            self.operator = operator;
        }
        if let Some(count) = cli_args.count {
            self.particle_count = count;
        }
        if let Some(rect_size) = cli_args.rect_size {
            self.rect_size = rect_size;
        }
        if let Some(width) = cli_args.width {
            self.width = width;
        }
        if let Some(height) = cli_args.height {
            self.height = height;
        }
        if cli_args.limit_fps {
            self.limit_fps = true;
        }
        if cli_args.frames.is_some() {
            self.frames = cli_args.frames;
        }
        if cli_args.seed.is_some() {
            self.seed = cli_args.seed;
        }
        if cli_args.output.is_some() {
            self.output.clone_from(&cli_args.output);
        }
        if let Some(level) = cli_args.log_level {
            self.log_level = level;
        }
        if let Some(path) = &cli_args.log_path {
            self.log_path.clone_from(path);
        }
    }

    /// Check that the settings make sense together.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            color_eyre::eyre::bail!(
                "The canvas can't be empty, it's {}x{}",
                self.width,
                self.height
            );
        }

        if !(1..=MAX_PARTICLES).contains(&self.particle_count) {
            color_eyre::eyre::bail!(
                "The number of rectangles must be from 1 to {MAX_PARTICLES}, not {}",
                self.particle_count
            );
        }

        if !self.rect_size.is_finite() || self.rect_size < 0.0 {
            color_eyre::eyre::bail!("Bad rectangle size: {}", self.rect_size);
        }

        Ok(())
    }

    /// The settings for the core animation.
    #[must_use]
    pub fn animation_settings(&self) -> AnimationSettings {
        AnimationSettings {
            count: self.particle_count,
            rect_size: self.rect_size,
            operator: self.operator,
            backend: self.backend,
            limit_fps: self.limit_fps,
            bounds: Bounds::new(f64::from(self.width), f64::from(self.height)),
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn shipped_config_is_the_default() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        config.validate().unwrap();
    }

    #[test]
    fn partial_configs_keep_defaults() {
        let config = Config::parse(
            r#"
            particle_count = 3
            operator = "color-dodge"
            backend = "painter"
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 3);
        assert_eq!(config.operator, CompositingOperator::ColorDodge);
        assert_eq!(config.backend, BackendKind::Painter);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.width, 580);
        assert_eq!(config.log_level, LogLevel::Off);
    }

    #[test]
    fn unknown_operators_are_bad_config() {
        assert!(Config::parse(r#"operator = "sideways""#).is_err());
    }

    #[test]
    fn loading_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"width = 40\nheight = 30\n").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!((config.width, config.height), (40, 30));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nope.toml");
        let result = Config::load(Some(path.as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn cli_args_override_config() {
        let mut config = Config::default();
        let args = CliArgs::try_parse_from([
            "rects",
            "--backend",
            "painter",
            "--operator",
            "xor",
            "--count",
            "7",
            "--width",
            "100",
            "--limit-fps",
            "--log-level",
            "trace",
        ])
        .unwrap();
        config.apply_cli_args(&args);

        assert_eq!(config.backend, BackendKind::Painter);
        assert_eq!(config.operator, CompositingOperator::Xor);
        assert_eq!(config.particle_count, 7);
        assert_eq!(config.width, 100);
        assert_eq!(config.height, 520);
        assert!(config.limit_fps);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn validation() {
        let valid = Config::default();
        assert!(valid.validate().is_ok());

        let empty_canvas = Config {
            width: 0,
            ..Config::default()
        };
        assert!(empty_canvas.validate().is_err());

        let no_particles = Config {
            particle_count: 0,
            ..Config::default()
        };
        assert!(no_particles.validate().is_err());

        let too_many_particles = Config {
            particle_count: MAX_PARTICLES + 1,
            ..Config::default()
        };
        assert!(too_many_particles.validate().is_err());

        let bad_size = Config {
            rect_size: f64::NAN,
            ..Config::default()
        };
        assert!(bad_size.validate().is_err());
    }

    #[test]
    fn settings_for_the_animation() {
        let settings = Config::default().animation_settings();
        assert_eq!(settings.count, 50);
        assert_eq!(settings.bounds, Bounds::new(580.0, 520.0));
    }
}
