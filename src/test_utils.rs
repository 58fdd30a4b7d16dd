//! Test utilities for generating telemetry captures
//!
//! Shared by unit tests and the benchmarks: synthetic device output shaped
//! like real firmware logs, including boot chatter and truncated lines.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::Sample;

/// Boot banner some firmware prints before streaming
pub const BOOT_BANNER: &str = "IMU ready, streaming at 50Hz";

/// Deterministic sample for index `i`: a slow spiral with a rotating heading
pub fn spiral_sample(i: usize) -> Sample {
    let t = i as f64 * 0.05;
    let radius = 10.0 + t;
    Sample::new(110.0 + radius * t.cos(), 100.0 + radius * t.sin(), (i as f64 * 3.0) % 360.0)
}

/// One well-formed telemetry line, terminated with `\r\n` like most firmware
pub fn telemetry_line(sample: &Sample) -> String {
    format!("{{\"x\":{},\"y\":{},\"head\":{}}}\r\n", sample.x, sample.y, sample.heading)
}

/// A capture of `count` samples with a noise line inserted every `noise_every`
/// samples (0 disables noise)
pub fn noisy_capture(count: usize, noise_every: usize) -> String {
    let mut capture = format!("{BOOT_BANNER}\r\n");
    for i in 0..count {
        if noise_every > 0 && i > 0 && i % noise_every == 0 {
            // Truncated frame, as after a buffer overrun
            capture.push_str("{\"x\":12.5,\"y\":\r\n");
        }
        capture.push_str(&telemetry_line(&spiral_sample(i)));
    }
    capture
}
