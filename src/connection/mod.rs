//! Streaming sessions

pub mod session;


pub use session::{STOP_TIMEOUT, Session};
