//! Streaming session over one transport

use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::output::OutputChannel;
use crate::provider::Provider;
use crate::providers::{ReplayProvider, StreamProvider};
use crate::stream::{SampleStream, StreamEvent};
use crate::types::UpdateRate;
use crate::{Result, TrackError, TrackerConfig};

/// Upper bound on waiting for the read loop to stop
pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// One streaming session: a transport, its read loop and a configuration
/// snapshot.
///
/// The read loop owns the inbound half of the transport; the session owns
/// the outbound half through its [`OutputChannel`]. Stopping cancels the
/// read loop, waits for it to finish and only then releases the transport.
/// A session cannot be restarted; stream again with a new transport.
pub struct Session {
    /// Configuration captured at start
    config: TrackerConfig,

    /// Outbound half of the transport
    output: OutputChannel,

    /// Receiver template; each subscriber gets its own
    events: broadcast::Receiver<StreamEvent>,

    /// Whether the first subscriber has been handed out
    subscribed: bool,

    /// Cancellation token for the read loop
    cancel: CancellationToken,

    /// Read loop task
    reader: Option<JoinHandle<u64>>,
}

impl Session {
    /// Start streaming from a bidirectional transport.
    ///
    /// The transport is split: reads happen on a dedicated task, writes go
    /// through [`Session::send`]. Fails only if the configuration is invalid.
    pub async fn attach<T>(transport: T, config: TrackerConfig) -> Result<Self>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        config.validate()?;

        let (read_half, write_half) = tokio::io::split(transport);
        let provider = StreamProvider::new(read_half);
        let output = OutputChannel::new(write_half);

        info!(
            "Streaming session started (trail {} samples, channel {})",
            config.buffer_size, config.channel_capacity
        );

        Self::spawn(provider, output, config)
    }

    /// Start replaying a captured telemetry log.
    ///
    /// Replay sessions have no outbound transport; [`Session::send`] fails
    /// with [`TrackError::OutputClosed`].
    pub async fn replay<P: AsRef<Path>>(
        path: P,
        config: TrackerConfig,
        rate: UpdateRate,
    ) -> Result<Self> {
        config.validate()?;

        let provider = ReplayProvider::open(path, rate).await?;
        Self::spawn(provider, OutputChannel::unavailable(), config)
    }

    /// Start a session over an arbitrary provider
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn spawn<P>(provider: P, output: OutputChannel, config: TrackerConfig) -> Result<Self>
    where
        P: Provider,
    {
        config.validate()?;
        let channels = Driver::spawn(provider, config.channel_capacity);

        Ok(Self {
            config,
            output,
            events: channels.events,
            subscribed: false,
            cancel: channels.cancel,
            reader: Some(channels.handle),
        })
    }

    /// Consumer end of the sample channel.
    ///
    /// The first subscriber sees every sample since the session started;
    /// later subscribers see samples from the moment they subscribe.
    pub fn subscribe(&mut self) -> SampleStream {
        let fresh = self.events.resubscribe();
        let receiver = if self.subscribed {
            fresh
        } else {
            self.subscribed = true;
            std::mem::replace(&mut self.events, fresh)
        };

        SampleStream::new(receiver, self.cancel.clone())
    }

    /// Send one outbound message to the device.
    ///
    /// Fire-and-forget: no response is awaited and failures are not retried.
    pub async fn send<T>(&self, mapping: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.output.send(mapping).await
    }

    /// Handle for sending from another task
    pub fn output(&self) -> OutputChannel {
        self.output.clone()
    }

    /// Configuration snapshot taken at start
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether the read loop is still running
    pub fn is_running(&self) -> bool {
        self.reader.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop streaming and release the transport.
    ///
    /// The read loop is cancelled (an in-flight read is abandoned) and joined
    /// within [`STOP_TIMEOUT`]; the outbound half is closed afterwards.
    /// Subscribers observe [`EndReason::Stopped`](crate::stream::EndReason::Stopped)
    /// unless the stream had already ended. Returns the number of samples the
    /// read loop delivered.
    pub async fn stop(mut self) -> Result<u64> {
        debug!("Stopping streaming session");
        self.cancel.cancel();

        let joined = match self.reader.take() {
            Some(mut handle) => match tokio::time::timeout(STOP_TIMEOUT, &mut handle).await {
                Ok(Ok(delivered)) => Ok(delivered),
                Ok(Err(e)) => Err(TrackError::transport_failed_with_source(
                    "read loop terminated abnormally",
                    Box::new(e),
                )),
                Err(_) => {
                    warn!("Read loop did not stop within {:?}, aborting", STOP_TIMEOUT);
                    handle.abort();
                    Err(TrackError::Timeout { duration: STOP_TIMEOUT })
                }
            },
            None => Ok(0),
        };

        let closed = self.output.close().await;

        let delivered = joined?;
        closed?;
        info!("Streaming session stopped after {} samples", delivered);
        Ok(delivered)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Dropping streaming session");
        // Cancel the read loop on drop for clean shutdown
        self.cancel.cancel();
    }
}
