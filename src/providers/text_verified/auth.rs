//! Shared bearer-token state.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Authentication state shared between request paths and the keep-alive
/// loop through a `tokio::sync::watch` cell.
#[derive(Debug, Clone, Default)]
pub(crate) enum AuthState {
    /// No bearer token yet; requests carry the static access token only.
    #[default]
    Anonymous,
    /// An active bearer token and when it lapses.
    Bearer {
        token: SecretString,
        expires_at: DateTime<Utc>,
    },
    /// The vendor confirmed the credentials are bad. Terminal for this
    /// session: every dependent request fails fast.
    Failed,
}
