//! Live position and heading telemetry ingestion.
//!
//! Trackline reads newline-delimited JSON telemetry from a device link,
//! decodes each line into a [`Sample`], and delivers samples in order to a
//! consumer that keeps a bounded trail of recent positions and turns it into
//! drawable geometry over a static background image.
//!
//! # Architecture
//!
//! - **Read loop**: a dedicated task owns the inbound half of the transport,
//!   splits it into lines and decodes them with [`FrameCodec`]. Undecodable
//!   lines are discarded.
//! - **Delivery**: samples cross to the consumer over a bounded, ordered
//!   channel ([`SampleStream`]). A slow consumer loses the oldest undelivered
//!   samples, never the newest. Transport failure arrives as a terminal
//!   [`EndReason`].
//! - **Consumer**: a [`render::Trail`] owns the [`TrajectoryBuffer`] and the
//!   [`Viewport`]; [`geometry`] converts device heading into marker rotation.
//! - **Outbound**: [`Session::send`] writes fire-and-forget JSON messages on
//!   the other half of the transport.
//!
//! Opening the serial port, windowing and image loading belong to the
//! embedding application.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trackline::{Delivery, TrackerConfig, Trackline};
//! use trackline::render::Trail;
//!
//! # async fn run(port: tokio::io::DuplexStream) -> trackline::Result<()> {
//! let config = TrackerConfig::load("config.json")?;
//! let mut trail = Trail::from_config(&config);
//!
//! let mut session = Trackline::attach(port, config).await?;
//! let mut samples = session.subscribe();
//! session.send(&serde_json::json!({"text": "start"})).await?;
//!
//! while let Delivery::Sample(sample) = samples.recv().await {
//!     trail.ingest(sample);
//!     let frame = trail.frame();
//!     // hand `frame` to the renderer
//! #   let _ = frame;
//! }
//!
//! session.stop().await?;
//! # Ok(())
//! # }
//! ```

// Core types and error handling
pub mod codec;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Stream-based ingestion architecture
pub mod connection;
pub mod driver;
pub mod output;
pub mod provider;
pub mod providers;
pub mod stream;

// Consumer side
pub mod config;
pub mod geometry;
pub mod render;
pub mod trajectory;

// Core exports
pub use codec::FrameCodec;
pub use error::*;
pub use types::*;

// Main API exports
pub use config::TrackerConfig;
pub use connection::Session;
pub use output::OutputChannel;
pub use stream::{Delivery, EndReason, SampleStream};
pub use trajectory::TrajectoryBuffer;

use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};

/// Unified entry point for trackline sessions.
///
/// # Examples
///
/// ## Live device link
/// ```rust,no_run
/// use trackline::{Trackline, TrackerConfig};
///
/// # async fn run(port: tokio::io::DuplexStream) -> trackline::Result<()> {
/// let session = Trackline::attach(port, TrackerConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
///
/// ## Captured log replay
/// ```rust,no_run
/// use trackline::{Trackline, TrackerConfig, UpdateRate};
///
/// # async fn run() -> trackline::Result<()> {
/// let session = Trackline::replay("capture.log", TrackerConfig::default(), UpdateRate::Max(50)).await?;
/// # Ok(())
/// # }
/// ```
pub struct Trackline;

impl Trackline {
    /// Start streaming from an open transport.
    ///
    /// The transport is typically a serial port opened by the caller at
    /// [`TrackerConfig::baud_rate`]; any bidirectional async byte stream works.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub async fn attach<T>(transport: T, config: TrackerConfig) -> Result<Session>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        Session::attach(transport, config).await
    }

    /// Replay a captured telemetry log.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate or the log
    /// cannot be opened.
    pub async fn replay<P: AsRef<Path>>(
        path: P,
        config: TrackerConfig,
        rate: UpdateRate,
    ) -> Result<Session> {
        Session::replay(path, config, rate).await
    }
}
