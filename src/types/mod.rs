//! Core types for telemetry data representation.
//!
//! - [`Sample`] is one decoded reading: position plus device heading
//! - [`Viewport`] is the plotted coordinate rectangle, also used to register
//!   the background image
//! - [`UpdateRate`] paces replayed telemetry
//!
//! ## Usage Example
//!
//! ```rust
//! use trackline::types::{Sample, Viewport};
//!
//! let viewport = Viewport::new(0.0, 220.0, 0.0, 205.0).unwrap();
//! let sample = Sample::new(10.0, 20.0, 90.0);
//!
//! assert!(viewport.contains(sample.position()));
//! assert_eq!(viewport.image_rect(), (0.0, 0.0, 220.0, 205.0));
//! ```

mod sample;
mod update_rate;
mod viewport;

pub use sample::Sample;
pub use update_rate::UpdateRate;
pub use viewport::Viewport;
