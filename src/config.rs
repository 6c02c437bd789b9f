//! # Configuration Management
//!
//! This module handles loading and parsing the card configuration from the
//! windrose-config.toml file. It covers the entities the card binds to, the
//! four corner readouts, and the layout the corner anchors are derived from.

use crate::{Coordinate, Corners};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "windrose-config.toml";

/// Errors raised when a configuration file cannot be used as-is.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialisation: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Root card configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CardConfig {
    /// Entity providing the wind direction in degrees
    pub wind_direction: EntityRef,
    /// Wind speed entities, in display order
    pub windspeed_entities: Vec<WindSpeedEntityConfig>,
    /// Optional compass auto-rotation
    pub compass: Option<CompassConfig>,
    /// The four corner readouts
    pub corners: Corners<CornerInfo>,
    /// Layout the corner anchors are computed from
    pub dimensions: DimensionConfig,
    /// State fetching options
    pub source: SourceConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EntityRef {
    pub entity: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WindSpeedEntityConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub speed_unit: SpeedUnit,
}

/// Display unit of a wind speed entity.
///
/// Serialised as a plain string; `"auto"` asks for the unit to be taken from
/// the entity's `unit_of_measurement` when the configuration is checked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SpeedUnit {
    #[default]
    Auto,
    Fixed(String),
}

impl SpeedUnit {
    pub const AUTO: &'static str = "auto";

    pub fn is_auto(&self) -> bool {
        matches!(self, SpeedUnit::Auto)
    }
}

impl From<String> for SpeedUnit {
    fn from(value: String) -> Self {
        if value == Self::AUTO {
            SpeedUnit::Auto
        } else {
            SpeedUnit::Fixed(value)
        }
    }
}

impl From<SpeedUnit> for String {
    fn from(unit: SpeedUnit) -> Self {
        match unit {
            SpeedUnit::Auto => SpeedUnit::AUTO.to_string(),
            SpeedUnit::Fixed(unit) => unit,
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::Auto => f.write_str(Self::AUTO),
            SpeedUnit::Fixed(unit) => f.write_str(unit),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompassConfig {
    pub auto_rotate: bool,
    pub entity: Option<String>,
}

impl CompassConfig {
    /// The entity to validate, if rotation is enabled and one is configured.
    pub fn rotation_entity(&self) -> Option<&str> {
        if self.auto_rotate {
            self.entity.as_deref().filter(|entity| !entity.is_empty())
        } else {
            None
        }
    }
}

/// Display settings of one corner readout.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CornerInfo {
    pub show: bool,
    pub entity: Option<String>,
    pub label: Option<String>,
    pub color: String,
    /// Decimal places for numeric states; raw text when unset
    pub precision: Option<u32>,
    /// Suffix appended directly to the value
    pub unit: Option<String>,
}

impl Default for CornerInfo {
    fn default() -> Self {
        Self {
            show: false,
            entity: None,
            label: None,
            color: "#000000".to_string(),
            precision: None,
            unit: None,
        }
    }
}

impl CornerInfo {
    /// Configured entity id, treating an empty string as unset.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity.as_deref().filter(|entity| !entity.is_empty())
    }

    /// Configured label, treating an empty string as unset.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }
}

/// Card layout in drawing-surface units.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DimensionConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
    pub rose_radius: f64,
    /// Font size of corner labels; also the height reserved for a label line
    pub corner_label_font_size: f64,
    pub corner_value_font_size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

impl Margins {
    pub const fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl Default for DimensionConfig {
    fn default() -> Self {
        DimensionConfig {
            width: 400.0,
            height: 400.0,
            margin: Margins::default(),
            rose_radius: 150.0,
            corner_label_font_size: 13.0,
            corner_value_font_size: 22.0,
        }
    }
}

impl DimensionConfig {
    pub fn rose_center(&self) -> Coordinate {
        Coordinate::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Where and how often states are fetched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Cache TTL in seconds
    pub cache_ttl_seconds: u64,
    /// Seconds between state ticks
    pub refresh_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 30,
            refresh_seconds: 10,
        }
    }
}

impl CardConfig {
    /// Load configuration from windrose-config.toml.
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path.
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                log::info!(
                    "Loaded card configuration for {}",
                    config.wind_direction.entity
                );
                config
            }
            Err(ConfigError::Io(_)) => {
                log::info!(
                    "No config file at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
            Err(e) => {
                log::warn!("Invalid config file format: {}", e);
                log::warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from specified path without falling back.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save current configuration as pretty TOML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
