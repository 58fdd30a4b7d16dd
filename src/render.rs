//! Consumer-side trail state and the hand-off to a renderer.
//!
//! The consumer owns a [`Trail`]: the trajectory buffer together with the
//! viewport and background image it is drawn over. Each delivered sample is
//! appended and a [`RenderFrame`] is produced for the [`RenderSink`]. The
//! renderer itself (window, widgets, image decoding) lives outside this crate.
//!
//! ```rust,no_run
//! use trackline::render::{RenderFrame, RenderSink, Trail, drive};
//! use trackline::{Trackline, TrackerConfig};
//!
//! struct Printer;
//!
//! impl RenderSink for Printer {
//!     fn draw(&mut self, frame: &RenderFrame) {
//!         if let Some(marker) = frame.marker {
//!             println!("at {:?} rotated {}", marker.position, marker.rotation);
//!         }
//!     }
//! }
//!
//! # async fn run(port: tokio::io::DuplexStream) -> trackline::Result<()> {
//! let config = TrackerConfig::default();
//! let mut trail = Trail::from_config(&config);
//! let mut session = Trackline::attach(port, config).await?;
//! let mut samples = session.subscribe();
//!
//! let reason = drive(&mut samples, &mut trail, &mut Printer).await;
//! println!("stopped: {reason:?}");
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::TrackerConfig;
use crate::geometry::{Marker, to_viewport};
use crate::stream::{Delivery, EndReason, SampleStream};
use crate::trajectory::TrajectoryBuffer;
use crate::types::{Sample, Viewport};

/// Everything a renderer needs to draw one update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RenderFrame {
    /// Trail positions, oldest first
    pub path: Vec<(f64, f64)>,
    /// Directional marker at the latest sample
    pub marker: Option<Marker>,
    /// Axis ranges and background rectangle
    pub viewport: Viewport,
    /// Background image registered against the viewport
    pub background: Option<PathBuf>,
}

/// Renderer fed by the consumer loop
pub trait RenderSink {
    /// Redraw with the current trail
    fn draw(&mut self, frame: &RenderFrame);

    /// Raw sample as received, before drawing
    fn sample(&mut self, _sample: &Sample) {}

    /// The stream ended; no more draws will follow
    fn stopped(&mut self, _reason: &EndReason) {}
}

/// Consumer-owned trail state
#[derive(Debug, Clone)]
pub struct Trail {
    buffer: TrajectoryBuffer,
    viewport: Viewport,
    background: Option<PathBuf>,
}

impl Trail {
    pub fn new(viewport: Viewport, capacity: usize) -> Self {
        Self { buffer: TrajectoryBuffer::new(capacity), viewport, background: None }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            buffer: TrajectoryBuffer::new(config.buffer_size),
            viewport: config.viewport(),
            background: config.image_path.clone(),
        }
    }

    /// Append a delivered sample
    pub fn ingest(&mut self, sample: Sample) {
        self.buffer.append(sample);
    }

    /// Current drawable state
    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            path: self.buffer.positions().map(|point| to_viewport(point, &self.viewport)).collect(),
            marker: self.buffer.latest().map(|sample| Marker::for_sample(&sample, &self.viewport)),
            viewport: self.viewport,
            background: self.background.clone(),
        }
    }

    /// Canvas size update: replace the viewport and trail length, and clear
    pub fn resize(&mut self, viewport: Viewport, capacity: usize) {
        debug!("Resizing trail to {:?} with capacity {}", viewport, capacity);
        self.viewport = viewport;
        self.buffer.set_capacity(capacity);
        self.buffer.clear();
    }

    /// Replace the background image, clearing the trail
    pub fn set_background(&mut self, path: Option<PathBuf>) {
        self.background = path;
        self.buffer.clear();
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.buffer.set_capacity(capacity);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &TrajectoryBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn background(&self) -> Option<&Path> {
        self.background.as_deref()
    }
}

/// Consumer loop: ingest every delivered sample and redraw until the stream
/// closes. Returns why it closed.
pub async fn drive<S>(stream: &mut SampleStream, trail: &mut Trail, sink: &mut S) -> EndReason
where
    S: RenderSink + ?Sized,
{
    loop {
        match stream.recv().await {
            Delivery::Sample(sample) => {
                sink.sample(&sample);
                trail.ingest(sample);
                sink.draw(&trail.frame());
            }
            Delivery::Closed(reason) => {
                sink.stopped(&reason);
                return reason;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamEvent;
    use tokio::sync::broadcast;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<RenderFrame>,
        samples: Vec<Sample>,
        stopped: Option<EndReason>,
    }

    impl RenderSink for RecordingSink {
        fn draw(&mut self, frame: &RenderFrame) {
            self.frames.push(frame.clone());
        }

        fn sample(&mut self, sample: &Sample) {
            self.samples.push(*sample);
        }

        fn stopped(&mut self, reason: &EndReason) {
            self.stopped = Some(reason.clone());
        }
    }

    #[test]
    fn frame_reflects_trail_and_marker() {
        let mut trail = Trail::new(Viewport::default(), 3);
        for i in 1..=5 {
            trail.ingest(Sample::new(i as f64, 10.0 * i as f64, 90.0));
        }

        let frame = trail.frame();
        assert_eq!(frame.path, vec![(3.0, 30.0), (4.0, 40.0), (5.0, 50.0)]);
        let marker = frame.marker.unwrap();
        assert_eq!(marker.position, (5.0, 50.0));
        assert_eq!(marker.rotation, -180.0);
    }

    #[test]
    fn empty_trail_has_no_marker() {
        let trail = Trail::new(Viewport::default(), 10);
        let frame = trail.frame();
        assert!(frame.path.is_empty());
        assert_eq!(frame.marker, None);
    }

    #[test]
    fn resize_replaces_viewport_and_clears() {
        let mut trail = Trail::new(Viewport::default(), 10);
        trail.ingest(Sample::new(1.0, 1.0, 0.0));

        let viewport = Viewport::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        trail.resize(viewport, 2);

        assert!(trail.buffer().is_empty());
        assert_eq!(trail.buffer().capacity(), 2);
        assert_eq!(*trail.viewport(), viewport);
    }

    #[test]
    fn background_change_clears_trail() {
        let config = TrackerConfig::default();
        let mut trail = Trail::from_config(&config);
        assert_eq!(trail.background(), Some(Path::new("map.png")));

        trail.ingest(Sample::new(1.0, 1.0, 0.0));
        trail.set_background(Some(PathBuf::from("floor.png")));

        assert!(trail.buffer().is_empty());
        assert_eq!(trail.frame().background, Some(PathBuf::from("floor.png")));
    }

    #[tokio::test]
    async fn drive_draws_each_sample_and_reports_end() {
        let (tx, rx) = broadcast::channel(16);
        let mut stream = SampleStream::new(rx, CancellationToken::new());
        let samples = [Sample::new(1.0, 2.0, 0.0), Sample::new(2.0, 3.0, 180.0)];
        for sample in samples {
            tx.send(StreamEvent::Sample(sample)).unwrap();
        }
        tx.send(StreamEvent::Ended(EndReason::EndOfStream)).unwrap();

        let mut trail = Trail::new(Viewport::default(), 10);
        let mut sink = RecordingSink::default();
        let reason = drive(&mut stream, &mut trail, &mut sink).await;

        assert!(matches!(reason, EndReason::EndOfStream));
        assert!(matches!(sink.stopped, Some(EndReason::EndOfStream)));
        assert_eq!(sink.samples, samples);
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.frames[1].path, vec![(1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(sink.frames[1].marker.unwrap().rotation, -90.0);
    }
}
