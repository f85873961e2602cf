//! Idle editor session sweep.

use coedit_service::SessionStore;
use tracing::{debug, error};

/// Closes every editor session idle past the configured window.
///
/// Browsers crash and networks drop; sessions abandoned that way never
/// see an explicit close or a terminal callback. The sweep keeps the
/// active-editors view honest and is the only writer that closes
/// sessions outside the request path.
pub async fn sweep_idle_sessions(sessions: &SessionStore) {
    debug!("Running idle session sweep");
    match sessions.sweep_expired().await {
        Ok(0) => debug!("No idle sessions to close"),
        Ok(closed) => debug!(closed, "Idle session sweep finished"),
        Err(e) => error!(error = %e, "Idle session sweep failed"),
    }
}
