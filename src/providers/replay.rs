//! Replay provider for captured telemetry logs

use std::path::Path;
use tokio::fs::File;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::provider::Provider;
use crate::providers::StreamProvider;
use crate::types::{Sample, UpdateRate};
use crate::{Result, TrackError};

/// Replay provider that reads a captured line-delimited telemetry log
///
/// The log is the raw byte stream as received from a device, so it goes
/// through the same line splitting and decoding as a live transport.
pub struct ReplayProvider {
    /// Line reader over the log file
    lines: StreamProvider<File>,

    /// Sample pacing, if any
    interval: Option<Interval>,

    /// Samples replayed so far
    replayed: u64,
}

impl ReplayProvider {
    /// Open a telemetry log for replay
    pub async fn open<P: AsRef<Path>>(path: P, rate: UpdateRate) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| TrackError::file_error(path.to_path_buf(), e))?;

        info!("Opened telemetry log {} for replay at {:?}", path.display(), rate);

        Ok(Self::from_file(file, rate))
    }

    fn from_file(file: File, rate: UpdateRate) -> Self {
        let interval = rate.interval().map(|period| {
            let mut interval = interval(period);
            // Set missed tick behavior to delay (don't burst)
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        Self { lines: StreamProvider::new(file), interval, replayed: 0 }
    }

    /// Samples replayed so far
    pub fn replayed(&self) -> u64 {
        self.replayed
    }
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    async fn next_sample(&mut self) -> Result<Option<Sample>> {
        let Some(sample) = self.lines.next_sample().await? else {
            debug!("Reached end of replay after {} samples", self.replayed);
            return Ok(None);
        };

        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }

        self.replayed += 1;
        Ok(Some(sample))
    }

    fn discarded(&self) -> u64 {
        self.lines.discarded()
    }
}
