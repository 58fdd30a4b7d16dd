//! Line-delimited telemetry provider over any async byte stream

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, trace, warn};

use crate::codec::FrameCodec;
use crate::provider::Provider;
use crate::types::Sample;
use crate::{Result, TrackError};

/// Inbound line terminator
const LINE_TERMINATOR: u8 = b'\n';

/// Longest accepted line, terminator included
pub const MAX_LINE_LENGTH: usize = 4096;

/// Line buffer size kept between reads
const LINE_BUFFER_CAPACITY: usize = 128;

/// Provider reading newline-delimited JSON frames from a transport
///
/// Bytes are split on `\n`; each complete line is decoded as UTF-8 with
/// malformed sequences replaced, then handed to [`FrameCodec::decode`].
/// Lines longer than [`MAX_LINE_LENGTH`] are skipped through their
/// terminator without being buffered and count as discarded.
pub struct StreamProvider<R> {
    /// Buffered read half of the transport
    reader: BufReader<R>,

    /// Reused line buffer
    line: Vec<u8>,

    /// Lines that did not decode to a sample
    discarded: u64,
}

impl<R> StreamProvider<R>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    /// Create a provider over the read half of a transport
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: Vec::with_capacity(LINE_BUFFER_CAPACITY),
            discarded: 0,
        }
    }

    /// Read the next raw line, without its decoding applied
    ///
    /// Returns `Ok(None)` at end of stream. A final line without a terminator
    /// is returned as-is. Oversized lines are skipped.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            self.line.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_LENGTH as u64)
                .read_until(LINE_TERMINATOR, &mut self.line)
                .await
                .map_err(read_failed)?;

            if read == 0 {
                return Ok(None);
            }

            if read < MAX_LINE_LENGTH || self.line.last() == Some(&LINE_TERMINATOR) {
                return Ok(Some(String::from_utf8_lossy(&self.line).into_owned()));
            }

            let skipped = read + self.skip_line().await?;
            self.discarded += 1;
            self.line.clear();
            self.line.shrink_to(LINE_BUFFER_CAPACITY);
            warn!("Discarded oversized line ({} bytes)", skipped);
        }
    }

    /// Consume input through the next terminator, returning the bytes dropped
    async fn skip_line(&mut self) -> Result<usize> {
        let mut skipped = 0;
        loop {
            let (used, done) = {
                let available = self.reader.fill_buf().await.map_err(read_failed)?;
                if available.is_empty() {
                    return Ok(skipped);
                }
                match available.iter().position(|&b| b == LINE_TERMINATOR) {
                    Some(end) => (end + 1, true),
                    None => (available.len(), false),
                }
            };

            self.reader.consume(used);
            skipped += used;
            if done {
                return Ok(skipped);
            }
        }
    }
}

fn read_failed(e: std::io::Error) -> TrackError {
    TrackError::transport_failed_with_source("failed to read from transport", Box::new(e))
}

#[async_trait::async_trait]
impl<R> Provider for StreamProvider<R>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    async fn next_sample(&mut self) -> Result<Option<Sample>> {
        loop {
            let Some(line) = self.next_line().await? else {
                debug!("Transport reached end of stream ({} lines discarded)", self.discarded);
                return Ok(None);
            };

            match FrameCodec::decode(&line) {
                Some(sample) => return Ok(Some(sample)),
                None => {
                    self.discarded += 1;
                    trace!("Discarding undecodable line: {:?}", line.trim_end());
                }
            }
        }
    }

    fn discarded(&self) -> u64 {
        self.discarded
    }
}
