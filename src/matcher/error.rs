//! Wait-engine error types.

use std::time::Duration;
use thiserror::Error;

use crate::errors::ProviderError;

/// Error returned by [`Matcher::wait_for_message`](super::Matcher::wait_for_message).
///
/// Timeout and cancellation are distinct outcomes, but both trigger the
/// same cleanup behavior inside the engine.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The overall deadline elapsed without a matching message.
    #[error(
        "timed out waiting for a matching message after {:.1}s ({polls} polls)",
        timeout.as_secs_f64()
    )]
    Timeout {
        /// Configured overall timeout.
        timeout: Duration,
        /// Number of completed polls.
        polls: u32,
    },

    /// The caller's cancellation token fired mid-wait.
    #[error("wait cancelled after {:.1}s ({polls} polls)", elapsed.as_secs_f64())]
    Cancelled {
        /// Time spent waiting before the signal was observed.
        elapsed: Duration,
        /// Number of completed polls.
        polls: u32,
    },

    /// The provider failed; terminal vendor states and generic provider
    /// errors both end the wait without retry.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
