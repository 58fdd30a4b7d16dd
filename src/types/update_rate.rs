//! Pacing control for replayed telemetry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delivery rate for replayed telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// As fast as the file can be read
    Native,

    /// At most this many samples per second
    /// A rate of zero is treated as Native
    Max(u32),
}

impl UpdateRate {
    /// Interval between samples, if pacing is needed
    pub fn interval(self) -> Option<Duration> {
        match self {
            UpdateRate::Native | UpdateRate::Max(0) => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }

    /// Check if pacing is needed
    pub fn is_paced(self) -> bool {
        self.interval().is_some()
    }
}
