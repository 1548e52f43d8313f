//! All of the user config for Embers.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start Embers.
static DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogLevel {
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
pub(crate) struct Config {
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// Target frame rate
    pub frame_rate: u32,
    /// How many simulation units each terminal pixel covers
    pub scale: f32,
    /// Whether to show the particle count, speed and frame rate in the top-right corner.
    pub show_stats: bool,
    /// The embers themselves
    pub simulation: embers_simulation::config::Config,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory.join("embers").join("embers.log");

        Self {
            log_level: LogLevel::Off,
            log_path,
            frame_rate: 60,
            scale: 10.0,
            show_stats: false,
            simulation: embers_simulation::config::Config::default(),
        }
    }
}

impl Config {
    /// Get the stable location of Embers' config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join("embers"))
    }

    /// Figure out where our config is being stored, and create the directory if needed.
    pub fn setup_directory(
        maybe_custom_path: Option<std::path::PathBuf>,
    ) -> Result<std::path::PathBuf> {
        let path = match maybe_custom_path {
            None => Self::default_directory()?,
            Some(path_string) => std::path::PathBuf::new().join(path_string),
        };

        std::fs::create_dir_all(path.clone())?;

        Ok(path)
    }

    /// Canonical path to the main config file.
    pub fn main_config_path(
        directory: &std::path::Path,
        main_config_file: &std::path::Path,
    ) -> std::path::PathBuf {
        directory.join(main_config_file)
    }

    /// Load the main config. The shipped default config is written out first if the user has
    /// never had one.
    pub fn load(config_path: &std::path::Path) -> Result<Self> {
        let config_file_name = config_path
            .file_name()
            .context("Couldn't get file name from config path")?;
        let is_default_config = config_file_name == crate::cli_args::DEFAULT_CONFIG_FILE_NAME;
        if is_default_config && !config_path.exists() {
            tracing::debug!("Writing default config to: {config_path:?}");
            std::fs::write(config_path, DEFAULT_CONFIG)?;
        }

        let result = std::fs::read_to_string(config_path);
        match result {
            Ok(data) => {
                let config = Self::parse(&data)?;
                Ok(config)
            }
            Err(err) => {
                color_eyre::eyre::bail!(
                    "Couldn't load config at {config_path:?}: {}",
                    err.to_string()
                );
            }
        }
    }

    /// Parse and validate the contents of a config file.
    pub fn parse(data: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Make sure that the config is usable before anything starts.
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            color_eyre::eyre::bail!("Invalid config value for `frame_rate`: must be greater than 0");
        }
        if self.scale <= 0.0 || !self.scale.is_finite() {
            color_eyre::eyre::bail!("Invalid config value for `scale`: must be greater than 0");
        }
        self.simulation.validate()?;

        Ok(())
    }

    /// CLI arguments take precedence over the config file.
    pub fn apply_cli_overrides(&mut self, cli_args: &crate::cli_args::CliArgs) -> Result<()> {
        if let Some(level) = &cli_args.log_level {
            self.log_level = level.clone();
        }
        if let Some(path) = &cli_args.log_path {
            self.log_path.clone_from(path);
        }
        if let Some(speed) = cli_args.speed {
            self.simulation.time_multiplier = speed;
        }
        if cli_args.show_stats {
            self.show_stats = true;
        }
        self.validate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn load_from(directory: &std::path::Path) -> Result<Config> {
        let path = Config::main_config_path(
            directory,
            std::path::Path::new(crate::cli_args::DEFAULT_CONFIG_FILE_NAME),
        );
        Config::load(&path)
    }

    #[test]
    fn default_config_is_written_on_first_load() {
        let directory = tempfile::tempdir().unwrap();
        let config = load_from(directory.path()).unwrap();

        let written = directory.path().join(crate::cli_args::DEFAULT_CONFIG_FILE_NAME);
        assert!(written.exists());
        assert_eq!(std::fs::read_to_string(written).unwrap(), DEFAULT_CONFIG);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.simulation.particle_count, 50);
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join(crate::cli_args::DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(&path, "frame_rate = 24\n").unwrap();

        let config = load_from(directory.path()).unwrap();
        assert_eq!(config.frame_rate, 24);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "frame_rate = 24\n");
    }

    #[test]
    fn shipped_config_matches_the_defaults() {
        let shipped = Config::parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(shipped.log_level, defaults.log_level);
        assert_eq!(shipped.log_path, defaults.log_path);
        assert_eq!(shipped.frame_rate, defaults.frame_rate);
        assert!((shipped.scale - defaults.scale).abs() < f32::EPSILON);
        assert_eq!(shipped.show_stats, defaults.show_stats);

        let simulation = shipped.simulation;
        let default_simulation = defaults.simulation;
        assert_eq!(simulation.particle_count, default_simulation.particle_count);
        assert_eq!(
            simulation.initial_radius_range,
            default_simulation.initial_radius_range
        );
        assert_eq!(simulation.duration_range, default_simulation.duration_range);
        assert_eq!(simulation.jitter_range, default_simulation.jitter_range);
        assert_eq!(simulation.hue_range, default_simulation.hue_range);
        assert_eq!(simulation.lightness_range, default_simulation.lightness_range);
        assert_eq!(simulation.background, default_simulation.background);
        assert_eq!(
            simulation.timestep.to_bits(),
            default_simulation.timestep.to_bits()
        );
    }

    #[test]
    fn partial_simulation_table_keeps_other_defaults() {
        let config = Config::parse(
            r#"
                log_level = "debug"

                [simulation]
                particle_count = 3
                hue_range = [200.0, 240.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.simulation.particle_count, 3);
        assert_eq!(config.simulation.hue_range, (200.0, 240.0));
        assert_eq!(config.simulation.duration_range, (2.0, 4.0));
    }

    #[test]
    fn invalid_simulation_values_are_rejected() {
        let error = Config::parse("[simulation]\nduration_range = [4.0, 2.0]\n").unwrap_err();
        assert_eq!(
            error.root_cause().to_string(),
            "Invalid config value for `duration_range`: minimum (4) is bigger than maximum (2)"
        );
    }

    #[test]
    fn invalid_host_values_are_rejected() {
        assert!(Config::parse("frame_rate = 0\n").is_err());
        assert!(Config::parse("scale = -1.0\n").is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(Config::parse("frame_rate = \"fast\"\n").is_err());
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = Config::default();
        let cli_args = crate::cli_args::CliArgs {
            log_level: Some(LogLevel::Trace),
            log_path: Some("/tmp/other.log".into()),
            speed: Some(0.5),
            show_stats: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&cli_args).unwrap();

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.log_path, std::path::PathBuf::from("/tmp/other.log"));
        assert!((config.simulation.time_multiplier - 0.5).abs() < f32::EPSILON);
        assert!(config.show_stats);
    }

    #[test]
    fn negative_speed_from_cli_is_rejected() {
        let mut config = Config::default();
        let cli_args = crate::cli_args::CliArgs {
            speed: Some(-1.0),
            ..Default::default()
        };
        assert!(config.apply_cli_overrides(&cli_args).is_err());
    }
}
