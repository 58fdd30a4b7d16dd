//! Decoded telemetry sample

use serde::{Deserialize, Serialize};

/// One decoded telemetry reading.
///
/// `heading` is in degrees using the device's convention, nominally `[0, 360)`.
/// It is neither validated nor wrapped on input; rendering converts it with
/// [`crate::geometry::render_rotation`].
///
/// On the wire the heading field is named `head`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "head")]
    pub heading: f64,
}

impl Sample {
    /// Create a new sample
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Plotted position of this sample
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
