//! Telemetry source implementations

pub mod replay;
pub mod stream;

pub use replay::ReplayProvider;
pub use stream::StreamProvider;
