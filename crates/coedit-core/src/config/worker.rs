//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the idle-session sweep.
    #[serde(default = "default_sweep_schedule")]
    pub session_sweep_schedule: String,
}

fn default_true() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    // every 5 minutes
    "0 */5 * * * *".to_string()
}
