//! Main entrypoint for running Embers

use color_eyre::eyre::{ContextCompat as _, Result};
use termwiz::terminal::Terminal as TermwizTerminal;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::CliArgs;
use crate::config::main::{Config, LogLevel};
use crate::embers::Embers;
use crate::renderer::Renderer;

/// The environment variable for setting custom log filters.
const LOG_FILTERS_ENV_VAR: &str = "EMBERS_LOG";

/// Main entrypoint
pub(crate) async fn run(config: Config) -> Result<()> {
    let mut renderer = Renderer::<termwiz::terminal::SystemTerminal>::start()?;

    // The terminal must always be given back to the user, even when the embers fail.
    let result = run_embers(config, &mut renderer).await;
    let restore_result = renderer.restore();

    result?;
    restore_result
}

/// Start the embers at the current size of the user's terminal.
async fn run_embers<T: TermwizTerminal>(
    config: Config,
    renderer: &mut Renderer<T>,
) -> Result<()> {
    let (width, height) = renderer.size();
    let mut embers = Embers::new(config, width, height)?;
    embers.run(renderer).await?;

    tracing::trace!("Leaving Embers' main `run()` function");
    Ok(())
}

/// Prepare the application to start.
pub(crate) fn setup(cli_args: &CliArgs) -> Result<Config> {
    let directory_result = Config::setup_directory(cli_args.config_dir.clone());
    let directory = match directory_result {
        Ok(directory) => directory,
        Err(directory_error) => {
            color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
        }
    };

    let path = Config::main_config_path(&directory, &cli_args.main_config);
    let mut config = match Config::load(&path) {
        Ok(config) => config,
        Err(config_error) => {
            color_eyre::eyre::bail!(
                "Bad config file: {config_error:?}\n\nConfig path: {}",
                path.display()
            );
        }
    };
    config.apply_cli_overrides(cli_args)?;

    // Assuming true colour makes Embers simpler. Without it Termwiz would fall back to the
    // terminal's default colours.
    std::env::set_var("COLORTERM", "truecolor");

    Ok(config)
}

/// Setup logging. Returns whether logs are being written.
pub(crate) fn setup_logging(config: &Config) -> Result<bool> {
    let are_log_filters_manually_set = std::env::var(LOG_FILTERS_ENV_VAR).is_ok();
    let level_as_string = format!("{:?}", config.log_level).to_lowercase();

    let is_loggable = !matches!(config.log_level, LogLevel::Off) || are_log_filters_manually_set;
    if !is_loggable {
        return Ok(false);
    }

    let directory = config
        .log_path
        .parent()
        .context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(&config.log_path)?;

    let filters = if are_log_filters_manually_set {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .with_env_var(LOG_FILTERS_ENV_VAR)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("embers={level_as_string}").parse()?)
            .add_directive(format!("embers_simulation={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    Ok(true)
}
