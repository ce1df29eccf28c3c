//! Game configuration resource.
//!
//! Timing settings loaded from an INI configuration file. Defaults are safe
//! to run with when the file is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [time]
//! host_step_ticks = 166667
//! world_rate = 1.0
//! ui_rate = 1.0
//!
//! [random]
//! seed = 42
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::timing::{DEFAULT_HOST_STEP, Ticks};

const DEFAULT_WORLD_RATE: f64 = 1.0;
const DEFAULT_UI_RATE: f64 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Host frame length in 100 ns ticks.
    pub host_step_ticks: Ticks,
    /// Initial rate of the `world` timeline.
    pub world_rate: f64,
    /// Initial rate of the `ui` timeline.
    pub ui_rate: f64,
    /// Seed for [`GameRng`](crate::resources::gamerng::GameRng); random when unset.
    pub seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            host_step_ticks: DEFAULT_HOST_STEP,
            world_rate: DEFAULT_WORLD_RATE,
            ui_rate: DEFAULT_UI_RATE,
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", self.config_path.display(), e)))?;

        // [time] section
        if let Some(step) = config.getint("time", "host_step_ticks").ok().flatten() {
            if step > 0 {
                self.host_step_ticks = step;
            } else {
                warn!("host_step_ticks = {step} is not positive; keeping {}", self.host_step_ticks);
            }
        }
        if let Some(rate) = config.getfloat("time", "world_rate").ok().flatten() {
            self.world_rate = rate;
        }
        if let Some(rate) = config.getfloat("time", "ui_rate").ok().flatten() {
            self.ui_rate = rate;
        }

        // [random] section
        if let Some(seed) = config.getuint("random", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        info!(
            "Loaded config: host step {} ticks, world rate {}, ui rate {}, seed {:?}",
            self.host_step_ticks, self.world_rate, self.ui_rate, self.seed
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [time] section
        config.set("time", "host_step_ticks", Some(self.host_step_ticks.to_string()));
        config.set("time", "world_rate", Some(self.world_rate.to_string()));
        config.set("time", "ui_rate", Some(self.ui_rate.to_string()));

        // [random] section
        if let Some(seed) = self.seed {
            config.set("random", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save(format!("{}: {}", self.config_path.display(), e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
