//! Cross-task sample delivery

mod samples;

pub use samples::{
    DEFAULT_CHANNEL_CAPACITY, Delivery, EndReason, MAX_CHANNEL_CAPACITY, SampleStream, StreamEvent,
};
