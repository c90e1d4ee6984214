//! All the CLI arguments. Any that are set override the config file.

use rects_core::{BackendKind, CompositingOperator};

use crate::config::LogLevel;

/// Bouncing rectangles, rendered headlessly.
#[derive(clap::Parser, Debug, Clone, Default)]
#[command(
    version,
    about,
    long_about = "Animates coloured rectangles bouncing around a canvas, compositing them with \
                  one of two software backends. Nothing is shown on screen, the final frame can \
                  be saved as a PNG."
)]
#[non_exhaustive]
pub struct CliArgs {
    /// Path to a config file. Defaults to `rects.toml` in the standard config directory.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// The rendering backend: `raster` (Blend2D-style) or `painter` (Qt-style).
    #[arg(short, long)]
    pub backend: Option<BackendKind>,

    /// The compositing operator, eg `source-over`, `plus` or `SrcCopy`.
    #[arg(short, long)]
    pub operator: Option<CompositingOperator>,

    /// The number of rectangles.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// The side length of each rectangle.
    #[arg(long)]
    pub rect_size: Option<f64>,

    /// Canvas width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Limit ticking to about 60 frames a second.
    #[arg(long)]
    pub limit_fps: bool,

    /// Stop after this many frames. Otherwise runs until Ctrl-C.
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Seed for the random placement and colouring of rectangles.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save the final frame as a PNG to this path.
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,

    /// Override the log level from the config.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Override the log path from the config.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn no_arguments() {
        let args = CliArgs::try_parse_from(["rects"]).unwrap();
        assert!(args.backend.is_none());
        assert!(args.operator.is_none());
        assert!(!args.limit_fps);
    }

    #[test]
    fn every_argument() {
        let args = CliArgs::try_parse_from([
            "rects",
            "--config",
            "custom.toml",
            "--backend",
            "qt",
            "--operator",
            "SrcCopy",
            "-n",
            "500",
            "--rect-size",
            "12.5",
            "--width",
            "400",
            "--height",
            "300",
            "--limit-fps",
            "--frames",
            "10",
            "--seed",
            "42",
            "--output",
            "frame.png",
            "--log-level",
            "debug",
            "--log-path",
            "rects.log",
        ])
        .unwrap();

        assert_eq!(args.config, Some("custom.toml".into()));
        assert_eq!(args.backend, Some(BackendKind::Painter));
        assert_eq!(args.operator, Some(CompositingOperator::SourceCopy));
        assert_eq!(args.count, Some(500));
        assert_eq!(args.rect_size, Some(12.5));
        assert_eq!(args.width, Some(400));
        assert_eq!(args.height, Some(300));
        assert!(args.limit_fps);
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.output, Some("frame.png".into()));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.log_path, Some("rects.log".into()));
    }

    #[test]
    fn unknown_operators_are_rejected() {
        let result = CliArgs::try_parse_from(["rects", "--operator", "sideways"]);
        assert!(result.is_err());
    }
}
