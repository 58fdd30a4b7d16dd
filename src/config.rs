//! Tracker configuration document.
//!
//! The configuration is a flat JSON object:
//!
//! ```json
//! {"buffer_size": 1000, "x_min": 0, "x_max": 220, "y_min": 0, "y_max": 205, "image_path": "map.png"}
//! ```
//!
//! Numeric keys accept either JSON numbers or numeric strings, because older
//! files store every value as the text typed into the controls. Saving always
//! writes numbers. Unknown keys are ignored and missing keys take defaults.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::stream::{DEFAULT_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY};
use crate::trajectory::DEFAULT_CAPACITY;
use crate::types::Viewport;
use crate::{Result, TrackError};

/// Baud rate of the reference device firmware
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default background image
pub const DEFAULT_IMAGE_PATH: &str = "map.png";

/// Session configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Trail length in samples
    #[serde(deserialize_with = "lenient::number")]
    pub buffer_size: usize,

    #[serde(deserialize_with = "lenient::number")]
    pub x_min: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub x_max: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub y_min: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub y_max: f64,

    /// Background image registered against the viewport
    pub image_path: Option<PathBuf>,

    /// Serial link speed, used by whoever opens the port
    #[serde(deserialize_with = "lenient::number")]
    pub baud_rate: u32,

    /// Delivery channel bound between reader and consumer
    #[serde(deserialize_with = "lenient::number")]
    pub channel_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            buffer_size: DEFAULT_CAPACITY,
            x_min: viewport.x_min,
            x_max: viewport.x_max,
            y_min: viewport.y_min,
            y_max: viewport.y_max,
            image_path: Some(PathBuf::from(DEFAULT_IMAGE_PATH)),
            baud_rate: DEFAULT_BAUD_RATE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrackError::file_error(path.to_path_buf(), e))?;

        let config = Self::from_json(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrackError::parse_error("configuration", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration back to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| TrackError::file_error(path.to_path_buf(), e))?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Check values are usable by a session
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(TrackError::invalid_config("buffer_size", "must be at least 1"));
        }
        if self.channel_capacity == 0 {
            return Err(TrackError::invalid_config("channel_capacity", "must be at least 1"));
        }
        if self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(TrackError::invalid_config(
                "channel_capacity",
                format!("must be at most {MAX_CHANNEL_CAPACITY}"),
            ));
        }
        if self.baud_rate == 0 {
            return Err(TrackError::invalid_config("baud_rate", "must be positive"));
        }
        self.viewport().validate()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport { x_min: self.x_min, x_max: self.x_max, y_min: self.y_min, y_max: self.y_max }
    }

    /// Apply a canvas size update: new viewport bounds and trail length
    pub fn with_viewport(mut self, viewport: Viewport, buffer_size: usize) -> Result<Self> {
        viewport.validate()?;
        self.x_min = viewport.x_min;
        self.x_max = viewport.x_max;
        self.y_min = viewport.y_min;
        self.y_max = viewport.y_max;
        self.buffer_size = buffer_size;
        self.validate()?;
        Ok(self)
    }

    /// Replace the background image
    pub fn with_image(mut self, image_path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }
}

/// Deserializers accepting numbers or numeric strings
mod lenient {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let text = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(number) => number.to_string(),
            NumberOrText::Text(text) => text,
        };
        text.trim().parse().map_err(|e| D::Error::custom(format!("invalid number {text:?}: {e}")))
    }
}
