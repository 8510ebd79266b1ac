//! The polling loop that bridges a provider and a match predicate.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::error::WaitError;
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::PhoneNumber;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Default interval between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default overall wait deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default deadline for the best-effort release call.
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one trip through the wait loop's select.
enum PollOutcome {
    CallerCancelled,
    DeadlineElapsed,
    Polled(Result<Vec<String>, ProviderError>),
}

/// Polls a provider for messages on a leased number, applying a match
/// predicate, until a match, a deadline, a cancellation or a provider
/// failure, whichever comes first.
///
/// On every exit path except a successful match the engine releases the
/// number via [`Provider::cancel_phone_number`], bounded by its own short
/// deadline and detached from the caller's cancellation signal. Release
/// failures are logged and swallowed; they never override the primary
/// outcome. A number whose code was captured is deliberately *not*
/// released here; finalizing a used number is the caller's call.
///
/// The match predicate receives one message body at a time and returns the
/// extracted value, or `None` for no match. It must be pure: safe to call
/// repeatedly and in any order across the messages of one poll.
///
/// # Example
///
/// ```rust,ignore
/// use sms_verify::Matcher;
/// use std::time::Duration;
///
/// let matcher = Matcher::new(|message: &str| {
///     message.contains("is your code").then(|| message.to_string())
/// })
/// .with_poll_interval(Duration::from_secs(1))
/// .with_timeout(Duration::from_secs(60));
///
/// let code = matcher.wait_for_message(&provider, &mut number).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Matcher<F> {
    match_fn: F,
    poll_interval: Duration,
    timeout: Duration,
    cleanup_timeout: Duration,
}

impl<F> Matcher<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    /// Create a matcher with the default intervals.
    pub fn new(match_fn: F) -> Self {
        Self {
            match_fn,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
        }
    }

    /// Set the interval between polls. Must be nonzero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall wait deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the deadline for the best-effort release call.
    pub fn with_cleanup_timeout(mut self, timeout: Duration) -> Self {
        self.cleanup_timeout = timeout;
        self
    }

    /// Wait without external cancellation.
    pub async fn wait_for_message<P: Provider>(
        &self,
        provider: &P,
        number: &mut PhoneNumber,
    ) -> Result<String, WaitError> {
        self.wait_for_message_cancellable(provider, number, CancellationToken::new())
            .await
    }

    /// Wait, unwinding early when `cancel` fires.
    ///
    /// Cancellation is cooperative: the signal is observed at every
    /// suspension point, and an in-flight poll is dropped (the request
    /// aborted) rather than run to completion. The release call still runs
    /// under its own deadline even when the token has already fired.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "matcher.wait_for_message",
            skip_all,
            fields(number = %number)
        )
    )]
    pub async fn wait_for_message_cancellable<P: Provider>(
        &self,
        provider: &P,
        number: &mut PhoneNumber,
        cancel: CancellationToken,
    ) -> Result<String, WaitError> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0u32;

        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => PollOutcome::CallerCancelled,
                _ = tokio::time::sleep_until(deadline) => PollOutcome::DeadlineElapsed,
                polled = async {
                    // The first tick completes immediately, so a message
                    // already waiting is matched with zero delay.
                    ticker.tick().await;
                    provider.get_messages(number).await
                } => PollOutcome::Polled(polled),
            };

            match outcome {
                PollOutcome::CallerCancelled => {
                    self.release(provider, number).await;
                    return Err(WaitError::Cancelled {
                        elapsed: started.elapsed(),
                        polls,
                    });
                }
                PollOutcome::DeadlineElapsed => {
                    #[cfg(feature = "tracing")]
                    warn!(
                        timeout_secs = %self.timeout.as_secs_f64(),
                        polls,
                        "timed out waiting for a matching message"
                    );
                    self.release(provider, number).await;
                    return Err(WaitError::Timeout {
                        timeout: self.timeout,
                        polls,
                    });
                }
                PollOutcome::Polled(Err(err)) => {
                    self.release(provider, number).await;
                    return Err(WaitError::Provider(err));
                }
                PollOutcome::Polled(Ok(messages)) => {
                    polls += 1;
                    for message in &messages {
                        if let Some(matched) = (self.match_fn)(message) {
                            #[cfg(feature = "tracing")]
                            debug!(polls, "message matched");
                            return Ok(matched);
                        }
                    }
                }
            }
        }
    }

    /// Best-effort release of the number.
    ///
    /// Runs detached from the caller's cancellation signal, which may
    /// already have fired, under its own short deadline. Never masks the
    /// primary failure reason.
    async fn release<P: Provider>(&self, provider: &P, number: &mut PhoneNumber) {
        match tokio::time::timeout(self.cleanup_timeout, provider.cancel_phone_number(number)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(_err)) => {
                #[cfg(feature = "tracing")]
                warn!(error = %_err, "failed to release phone number");
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                warn!(
                    timeout_secs = %self.cleanup_timeout.as_secs_f64(),
                    "releasing phone number timed out"
                );
            }
        }
    }
}
