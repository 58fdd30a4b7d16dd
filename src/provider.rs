//! Provider trait for telemetry sources

use crate::Result;
use crate::types::Sample;

/// Trait for telemetry data sources
///
/// Providers own the inbound side of a transport and turn it into decoded
/// samples. Lines that fail to decode are discarded inside the provider and
/// never surface here.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next decoded sample
    ///
    /// Returns:
    /// - `Ok(Some(sample))` - New sample available
    /// - `Ok(None)` - Source ended (device closed the link or file exhausted)
    /// - `Err(e)` - Transport failure; the source is unusable afterwards
    ///
    /// Implementations block until a complete line is available. The driver
    /// may drop this future at any await point when the session is stopped.
    async fn next_sample(&mut self) -> Result<Option<Sample>>;

    /// Number of lines discarded as noise so far
    fn discarded(&self) -> u64;
}
