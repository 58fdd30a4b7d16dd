//! Outbound message path to the device

use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::codec::FrameCodec;
use crate::{Result, TrackError};

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Write side of the transport.
///
/// Messages are fire-and-forget: each call encodes one JSON document and
/// writes it with no extra framing, no acknowledgment and no retry. Sends are
/// serialized: a send in progress completes before the next one begins.
/// Reads happen on the other half of the transport and are not blocked by
/// sends.
#[derive(Clone)]
pub struct OutputChannel {
    writer: Arc<Mutex<Option<BoxedWriter>>>,
}

impl std::fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannel").finish_non_exhaustive()
    }
}

impl OutputChannel {
    /// Wrap the write half of a transport
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self { writer: Arc::new(Mutex::new(Some(Box::new(writer)))) }
    }

    /// Channel with no transport behind it; every send fails
    pub fn unavailable() -> Self {
        Self { writer: Arc::new(Mutex::new(None)) }
    }

    /// Encode and write one outbound mapping.
    ///
    /// Encoding failures, write failures and sends after [`close`](Self::close)
    /// are returned to the caller.
    pub async fn send<T>(&self, mapping: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = FrameCodec::encode(mapping)?;

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(TrackError::OutputClosed)?;

        writer.write_all(&bytes).await.map_err(|e| {
            TrackError::transport_failed_with_source("failed to write to transport", Box::new(e))
        })?;
        writer.flush().await.map_err(|e| {
            TrackError::transport_failed_with_source("failed to flush transport", Box::new(e))
        })?;

        trace!("Sent {} byte message", bytes.len());
        Ok(())
    }

    /// Shut down and release the write half.
    ///
    /// Waits for an in-progress send to finish. Idempotent.
    pub async fn close(&self) -> Result<()> {
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            debug!("Closing output channel");
            writer.shutdown().await?;
        }
        Ok(())
    }

    pub async fn is_closed(&self) -> bool {
        self.writer.lock().await.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn sends_json_without_framing() {
        let (host, mut device) = tokio::io::duplex(1024);
        let output = OutputChannel::new(host);

        output.send(&json!({"text": "hello"})).await.unwrap();
        output.close().await.unwrap();

        let mut received = String::new();
        device.read_to_string(&mut received).await.unwrap();
        assert_eq!(received, r#"{"text":"hello"}"#);
    }

    #[tokio::test]
    async fn concurrent_sends_do_not_interleave() {
        let (host, mut device) = tokio::io::duplex(64);
        let output = OutputChannel::new(host);

        let reader = tokio::spawn(async move {
            let mut received = String::new();
            device.read_to_string(&mut received).await.unwrap();
            received
        });

        let payload = "x".repeat(200);
        let mut sends = Vec::new();
        for i in 0..8 {
            let output = output.clone();
            let payload = payload.clone();
            sends.push(tokio::spawn(async move {
                output.send(&json!({"id": i, "pad": payload})).await.unwrap();
            }));
        }
        for send in sends {
            send.await.unwrap();
        }
        output.close().await.unwrap();

        // Each message is a complete JSON document back to back
        let received = reader.await.unwrap();
        let messages: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&received)
            .into_iter()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(messages.len(), 8);
        let mut ids: Vec<_> = messages.iter().map(|m| m["id"].as_i64().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn send_after_close_fails() {
        let (host, _device) = tokio::io::duplex(64);
        let output = OutputChannel::new(host);
        output.close().await.unwrap();
        output.close().await.unwrap();

        assert!(output.is_closed().await);
        let err = output.send(&json!({"text": "late"})).await.unwrap_err();
        assert!(matches!(err, TrackError::OutputClosed));
    }

    #[tokio::test]
    async fn unavailable_channel_rejects_sends() {
        let output = OutputChannel::unavailable();
        let err = output.send(&json!({})).await.unwrap_err();
        assert!(matches!(err, TrackError::OutputClosed));
    }

    #[tokio::test]
    async fn write_failures_are_surfaced() {
        let (host, device) = tokio::io::duplex(64);
        drop(device);
        let output = OutputChannel::new(host);

        let err = output.send(&json!({"text": "nobody listening"})).await.unwrap_err();
        assert!(matches!(err, TrackError::Transport { .. }));
    }
}
