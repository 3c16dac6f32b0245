//! Engine configuration.
//!
//! All knobs are environment-driven so deployments can tune them without
//! rebuilding. The called-timeout is deliberately optional: whether an
//! unanswered call expires to no-show is facility policy, not an engine
//! default.

use chrono::Duration;

/// Default starvation threshold in minutes for walk-in promotion.
const DEFAULT_STARVATION_MINUTES: i64 = 45;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wait time after which a walk-in or administrative entry is promoted
    /// ahead of not-yet-due scheduled appointments.
    pub starvation_threshold: Duration,
    /// If set, CALLED entries with no operator action within this window are
    /// swept to NO_SHOW by a background task. Unset disables the sweep.
    pub called_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starvation_threshold: Duration::minutes(DEFAULT_STARVATION_MINUTES),
            called_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Build configuration from environment variables.
    ///
    /// - `ATTENDQ_STARVATION_MINUTES` - starvation threshold (default 45)
    /// - `ATTENDQ_CALLED_TIMEOUT_SECS` - auto no-show window (unset = disabled)
    pub fn from_env() -> Self {
        let starvation_minutes = std::env::var("ATTENDQ_STARVATION_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_STARVATION_MINUTES);

        let called_timeout = std::env::var("ATTENDQ_CALLED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|s| *s > 0)
            .map(Duration::seconds);

        Self {
            starvation_threshold: Duration::minutes(starvation_minutes),
            called_timeout,
        }
    }
}
