//! # Configuration Management
//!
//! Loads runtime settings from `tychos-config.toml`. Two groups live there:
//! where the parameter table comes from ([`DataConfig`]) and the fixed model
//! constants ([`ModelConstants`]). Both are plain values built once at start-up
//! and handed to whatever needs them.

use chrono::{DateTime, TimeZone, Utc};
use glam::DVec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tychos-config.toml";

/// Application configuration loaded from tychos-config.toml
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Config {
    /// Parameter table source
    #[serde(default)]
    pub data: DataConfig,
    /// Epoch, year length and other fixed model constants
    #[serde(default)]
    pub constants: ModelConstants,
}

/// Where and how the celestial parameter table is fetched
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON array of per-body orbit parameters
    pub url: String,
    /// Local copy of the last successful download
    pub cache_path: String,
    /// Age after which the cache is refreshed from the network
    pub cache_ttl_minutes: u64,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            url: "https://github.com/pholmq/tsnext-vite/raw/master/src/settings/celestial-settings.json"
                .to_string(),
            cache_path: "/tmp/tychos_celestials.json".to_string(),
            cache_ttl_minutes: 24 * 60,
            timeout_secs: 30,
        }
    }
}

/// Fixed constants of the model.
///
/// Simulation time is measured in tropical years counted from `epoch`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConstants {
    /// Simulation time zero (2000-06-21 12:00 UTC)
    pub epoch: DateTime<Utc>,
    /// Days per simulation year
    pub year_length_days: f64,
    /// Sidereal Earth rotations per simulation year
    pub earth_rotations_per_year: f64,
    /// Earth axial tilt in degrees
    pub earth_tilt_deg: f64,
    /// Astronomical unit in metres
    pub au_meters: f64,
}

impl Default for ModelConstants {
    fn default() -> Self {
        ModelConstants {
            epoch: Utc.with_ymd_and_hms(2000, 6, 21, 12, 0, 0).single().unwrap_or_default(),
            year_length_days: 365.2425,
            earth_rotations_per_year: 366.2425,
            earth_tilt_deg: 23.0 + 26.0 / 60.0 + 14.0 / 3600.0,
            au_meters: 149_597_870_700.0,
        }
    }
}

impl ModelConstants {
    /// Earth tilt as an (x, y, z) rotation in radians, tilted about y.
    pub fn earth_tilt(&self) -> DVec3 {
        DVec3::new(0.0, self.earth_tilt_deg.to_radians(), 0.0)
    }

    /// Length of one sidereal day in simulation years.
    pub fn sidereal_day(&self) -> f64 {
        1.0 / self.earth_rotations_per_year
    }

    pub fn au_to_meters(&self, au: f64) -> f64 {
        au * self.au_meters
    }

    pub fn meters_to_au(&self, meters: f64) -> f64 {
        meters / self.au_meters
    }
}

impl Config {
    /// Load configuration from tychos-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
