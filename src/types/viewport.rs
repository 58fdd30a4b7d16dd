//! Viewport bounds for plotting and background registration

use serde::{Deserialize, Serialize};

use crate::{Result, TrackError};

/// Coordinate rectangle used both as the plotted range and as the rectangle
/// the background image is stretched over.
///
/// A viewport is static for a render session and replaced wholesale when the
/// user changes the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x_min: 0.0, x_max: 220.0, y_min: 0.0, y_max: 205.0 }
    }
}

impl Viewport {
    /// Create a viewport, rejecting non-finite or inverted bounds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let viewport = Self { x_min, x_max, y_min, y_max };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Check that all bounds are finite and each axis has positive extent.
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ];
        for (key, value) in bounds {
            if !value.is_finite() {
                return Err(TrackError::invalid_config(key, format!("{value} is not finite")));
            }
        }

        if self.x_min >= self.x_max {
            return Err(TrackError::invalid_config(
                "x_max",
                format!("{} must be greater than x_min {}", self.x_max, self.x_min),
            ));
        }
        if self.y_min >= self.y_max {
            return Err(TrackError::invalid_config(
                "y_max",
                format!("{} must be greater than y_min {}", self.y_max, self.y_min),
            ));
        }

        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether a point lies inside the viewport (bounds inclusive).
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Rectangle the background image is registered against, as `(x, y, width, height)`.
    pub fn image_rect(&self) -> (f64, f64, f64, f64) {
        (self.x_min, self.y_min, self.width(), self.height())
    }
}
