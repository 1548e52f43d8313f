//! All the CLI arguments for Embers

/// The default name of the main config file, inside the config directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "embers.toml";

/// Glowing embers drifting up your terminal
#[derive(clap::Parser, Debug, Clone, Default)]
#[command(version, about, long_about = "Glowing embers drifting up your terminal")]
#[non_exhaustive]
pub struct CliArgs {
    /// Path to the config directory. Defaults to the system's standard config directory.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// Name of the main config file, relative to the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// Override the log level from the config file.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Override the log file location from the config file.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,

    /// Speed of the simulation relative to the wall clock, eg `0.5` for half speed.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Show the particle count, simulation speed and frame rate in the top-right corner.
    #[arg(long)]
    pub show_stats: bool,
}
