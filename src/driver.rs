//! Driver spawns and manages the telemetry read loop

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::provider::Provider;
use crate::stream::{EndReason, StreamEvent};

/// Result of spawning the read loop
pub struct DriverChannels {
    /// First receiver for delivered events
    pub events: broadcast::Receiver<StreamEvent>,
    /// Cancellation token for stopping the read loop
    pub cancel: CancellationToken,
    /// Handle resolving to the number of samples delivered
    pub handle: JoinHandle<u64>,
}

/// Driver spawns and manages the telemetry read loop
///
/// The read loop owns the provider, and therefore the read half of the
/// transport, for its whole life. It is the only producer on the delivery
/// channel.
pub struct Driver;

impl Driver {
    /// Spawn the read loop for the given provider
    ///
    /// `capacity` bounds the delivery channel; when the consumer lags, the
    /// oldest undelivered samples are overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not called from within a tokio runtime.
    pub fn spawn<P>(provider: P, capacity: usize) -> DriverChannels
    where
        P: Provider,
    {
        let (event_tx, event_rx) = broadcast::channel(capacity);
        let cancel = CancellationToken::new();
        let cancel_reader = cancel.clone();

        let handle = tokio::spawn(async move {
            Self::read_loop(provider, event_tx, cancel_reader).await
        });

        DriverChannels { events: event_rx, cancel, handle }
    }

    /// Read loop - pulls samples from the provider until stopped or the
    /// source ends
    async fn read_loop<P>(
        mut provider: P,
        event_tx: broadcast::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> u64
    where
        P: Provider,
    {
        info!("Read loop started");
        let mut sample_count = 0u64;

        loop {
            // Check for cancellation between samples
            if cancel.is_cancelled() {
                info!("Read loop cancelled");
                break;
            }

            // Race the pending read against cancellation; an in-flight read
            // is abandoned, not drained
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Read loop cancelled during read");
                    break;
                }
                result = provider.next_sample() => result,
            };

            match result {
                Ok(Some(sample)) => {
                    sample_count += 1;
                    trace!(
                        "Sample {}: x={}, y={}, heading={}",
                        sample_count, sample.x, sample.y, sample.heading
                    );

                    if event_tx.send(StreamEvent::Sample(sample)).is_err() {
                        debug!("All sample receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Telemetry source ended after {} samples", sample_count);
                    let _ = event_tx.send(StreamEvent::Ended(EndReason::EndOfStream));
                    break;
                }
                Err(e) => {
                    // Transport failures end the session; no retry here
                    error!("Transport failure after {} samples: {}", sample_count, e);
                    let reason = EndReason::TransportFailed(Arc::new(e));
                    let _ = event_tx.send(StreamEvent::Ended(reason));
                    break;
                }
            }
        }

        info!(
            "Read loop ended (delivered {} samples, discarded {} lines)",
            sample_count,
            provider.discarded()
        );
        sample_count
    }
}
