//! The headless driver for the bouncing rectangles. It owns the tick timer and the canvas, and
//! calls into `rects_core` once per tick.

pub mod cli_args;
pub mod config;
pub mod export;
pub mod run;
