//! Configuration management for the sell GUI server.
//!
//! TOML-backed, with defaults for every value and validation on load:
//!
//! ```toml
//! [gui]
//! settings_item = "sellgui:sell_gui_settings"
//! signal_objective = "sellGuiID"
//! sweep_interval_ms = 50
//!
//! [storage]
//! data_dir = "data/sellgui"
//!
//! [logging]
//! level = "info"
//! # file = "sellgui.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gui: GuiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiConfig {
    /// Item that opens the settings menus when used.
    #[serde(default = "default_settings_item")]
    pub settings_item: String,
    /// Objective players write sell ids into.
    #[serde(default = "default_signal_objective")]
    pub signal_objective: String,
    /// Milliseconds between sell-request sweeps.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level filter; CLI -v flags override this.
    #[serde(default)]
    pub level: Option<String>,
    /// Optional log file; console output mirrors it on a TTY.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_settings_item() -> String {
    "sellgui:sell_gui_settings".to_string()
}

fn default_signal_objective() -> String {
    "sellGuiID".to_string()
}

fn default_sweep_interval_ms() -> u64 {
    50
}

fn default_data_dir() -> String {
    "data/sellgui".to_string()
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            settings_item: default_settings_item(),
            signal_objective: default_signal_objective(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read {}: {}", path, e))?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a starter configuration file. Refuses to overwrite.
    pub async fn create_default(path: &str) -> Result<()> {
        if fs::try_exists(path).await? {
            return Err(anyhow!("{} already exists", path));
        }
        let config = Config::default();
        fs::write(path, toml::to_string_pretty(&config)?).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.gui.settings_item.trim().is_empty() {
            return Err(anyhow!("gui.settings_item must not be empty"));
        }
        if self.gui.signal_objective.trim().is_empty() {
            return Err(anyhow!("gui.signal_objective must not be empty"));
        }
        if self.gui.settings_item == self.gui.signal_objective {
            return Err(anyhow!(
                "gui.settings_item and gui.signal_objective must differ"
            ));
        }
        if self.gui.sweep_interval_ms == 0 {
            return Err(anyhow!("gui.sweep_interval_ms must be at least 1"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        Ok(())
    }
}
