//! The message wait engine: polling, matching, timeout and cleanup.

pub(crate) mod engine;
pub(crate) mod error;

pub use engine::{
    DEFAULT_CLEANUP_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, Matcher,
};
pub use error::WaitError;
