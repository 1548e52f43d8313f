//! Just `main()`. Keep as small as possible.

pub mod cli_args;
/// All the user-configurable settings.
pub mod config {
    pub mod main;
}
pub mod embers;
pub mod renderer;
pub mod run;
pub mod surface;

use clap::Parser as _;
use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::exit,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = cli_args::CliArgs::parse();
    let config = run::setup(&cli_args)?;
    let is_logging = run::setup_logging(&config)?;
    let log_path = config.log_path.clone();

    tracing::info!("Starting Embers");
    tracing::debug!("Loaded config: {config:?}");
    let result = run::run(config).await;
    tracing::debug!("Embers is exiting");

    match result {
        Ok(()) => {
            if is_logging {
                println!("Logs saved to {}", log_path.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error}");
            if is_logging {
                eprintln!("See {} for more details", log_path.display());
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
