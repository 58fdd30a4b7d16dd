//! Ordered sample delivery from the reader to the consumer

use std::sync::Arc;

use futures::Stream;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::TrackError;
use crate::types::Sample;

/// Default capacity of the delivery channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Largest accepted delivery channel capacity; every slot is allocated up front
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 20;

/// Why a stream stopped delivering samples
#[derive(Debug, Clone)]
pub enum EndReason {
    /// The session was stopped by request
    Stopped,
    /// The transport reached end of stream (device closed the link)
    EndOfStream,
    /// The transport failed; the session is over
    TransportFailed(Arc<TrackError>),
}

impl EndReason {
    /// Whether the stream ended because something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(self, EndReason::TransportFailed(_))
    }
}

/// Item carried on the delivery channel
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Sample(Sample),
    Ended(EndReason),
}

/// What the consumer observes from [`SampleStream::recv`]
#[derive(Debug, Clone)]
pub enum Delivery {
    Sample(Sample),
    /// Terminal; every later call returns the same reason
    Closed(EndReason),
}

impl Delivery {
    pub fn sample(&self) -> Option<Sample> {
        match self {
            Delivery::Sample(sample) => Some(*sample),
            Delivery::Closed(_) => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Delivery::Closed(_))
    }
}

/// Consumer end of the delivery channel.
///
/// Samples arrive in decode order with no duplication. The channel is bounded
/// and the reader never waits: when the consumer falls more than the channel
/// capacity behind, the oldest undelivered samples are skipped and counted in
/// [`dropped`](Self::dropped).
///
/// Once the owning session is stopped no further samples are returned, even
/// if some were still queued. A terminal event queued before the stop is
/// still reported, so a transport failure is never masked as a stop.
pub struct SampleStream {
    events: broadcast::Receiver<StreamEvent>,
    cancel: CancellationToken,
    finished: Option<EndReason>,
    delivered: u64,
    dropped: u64,
}

impl SampleStream {
    pub(crate) fn new(events: broadcast::Receiver<StreamEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel, finished: None, delivered: 0, dropped: 0 }
    }

    /// Wait for the next delivery.
    pub async fn recv(&mut self) -> Delivery {
        if let Some(reason) = &self.finished {
            return Delivery::Closed(reason.clone());
        }

        loop {
            let received = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.stopped(),
                received = self.events.recv() => received,
            };

            match received {
                Ok(StreamEvent::Sample(sample)) => {
                    self.delivered += 1;
                    return Delivery::Sample(sample);
                }
                Ok(StreamEvent::Ended(reason)) => return self.finish(reason),
                Err(RecvError::Lagged(skipped)) => {
                    self.dropped += skipped;
                    warn!("Consumer lagging, dropped {} oldest samples", skipped);
                }
                Err(RecvError::Closed) => {
                    // Reader went away without a terminal event
                    let reason = if self.cancel.is_cancelled() {
                        EndReason::Stopped
                    } else {
                        EndReason::EndOfStream
                    };
                    return self.finish(reason);
                }
            }
        }
    }

    /// Samples returned so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Samples skipped because the consumer fell behind
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Terminal reason, once the stream has closed
    pub fn end_reason(&self) -> Option<&EndReason> {
        self.finished.as_ref()
    }

    /// Adapt into a [`Stream`] that yields every delivery, ending after the
    /// terminal [`Delivery::Closed`].
    pub fn into_stream(self) -> impl Stream<Item = Delivery> + Send + 'static {
        futures::stream::unfold(Some(self), |state| async move {
            let mut stream = state?;
            let delivery = stream.recv().await;
            let next = if delivery.is_closed() { None } else { Some(stream) };
            Some((delivery, next))
        })
    }

    /// Close after cancellation, preferring an end reason already queued
    fn stopped(&mut self) -> Delivery {
        loop {
            match self.events.try_recv() {
                Ok(StreamEvent::Ended(reason)) => return self.finish(reason),
                Ok(StreamEvent::Sample(_)) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        self.finish(EndReason::Stopped)
    }

    fn finish(&mut self, reason: EndReason) -> Delivery {
        debug!(
            "Sample stream closed ({:?}) after {} samples, {} dropped",
            reason, self.delivered, self.dropped
        );
        self.finished = Some(reason.clone());
        Delivery::Closed(reason)
    }
}
