//! Device-frame to render-frame transforms.
//!
//! The heading transform is a fixed numeric contract shared with recorded
//! trajectories and external replay viewers: the marker angle is
//! `(270 - heading) mod 360` using a floored modulo (result carries the sign
//! of the divisor), and the rotation applied to the marker is its negation.
//! It must stay bit-for-bit identical, including the sign of zero.
//!
//! ```rust
//! use trackline::geometry::{heading_angle, render_rotation};
//!
//! assert_eq!(heading_angle(90.0), 180.0);
//! assert_eq!(render_rotation(90.0), -180.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Sample, Viewport};

const HEADING_OFFSET: f64 = 270.0;
const FULL_TURN: f64 = 360.0;

/// Floored modulo: the result takes the sign of `divisor`.
///
/// Differs from [`f64::rem_euclid`] only in the sign of a zero result, which
/// is always the sign of the divisor here.
fn floored_mod(value: f64, divisor: f64) -> f64 {
    let rem = value % divisor;
    if rem == 0.0 {
        0.0_f64.copysign(divisor)
    } else if (rem < 0.0) != (divisor < 0.0) {
        rem + divisor
    } else {
        rem
    }
}

/// Marker angle for a device heading: `(270 - heading) mod 360`.
pub fn heading_angle(heading: f64) -> f64 {
    floored_mod(HEADING_OFFSET - heading, FULL_TURN)
}

/// Rotation to apply to the directional marker for a device heading.
pub fn render_rotation(heading: f64) -> f64 {
    -heading_angle(heading)
}

/// Map a plotted coordinate into viewport space.
///
/// Coordinates are used directly as positions; the background image is
/// registered once against the viewport and does not follow samples.
pub fn to_viewport(point: (f64, f64), _viewport: &Viewport) -> (f64, f64) {
    point
}

/// Directional marker placed at the latest sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Marker {
    pub position: (f64, f64),
    pub rotation: f64,
}

impl Marker {
    pub fn for_sample(sample: &Sample, viewport: &Viewport) -> Self {
        Self {
            position: to_viewport(sample.position(), viewport),
            rotation: render_rotation(sample.heading),
        }
    }
}
