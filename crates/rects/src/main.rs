//! Just `main()`. Keep as small as possible.

use clap::Parser as _;
use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = rects::cli_args::CliArgs::parse();
    let result = rects::run::run(cli_args).await;
    tracing::debug!("rects is exiting");

    match result {
        Ok(outcome) => {
            println!("{}", outcome.status);
            if let Some(path) = outcome.exported {
                println!("Final frame saved to {}", path.display());
            }
            if let Some(path) = outcome.log_path {
                println!("Logs saved to {}", path.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            return Err(error);
        }
    }

    Ok(())
}
