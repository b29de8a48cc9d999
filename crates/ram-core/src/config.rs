use std::time::Duration;

use thiserror::Error;

/// Default cap on recorded steps.
pub const DEFAULT_MAX_INSTRUCTIONS: usize = 10_000;
/// Default delay between rendered steps in non-interactive mode.
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 1.0;
/// Default number of recent snapshots rendered per frame.
pub const DEFAULT_LINES_LOGGED: usize = 10;

/// Run-time options for a simulation session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct SimulatorConfig {
    /// Abort once the step history grows past this many entries.
    pub max_instructions: usize,
    /// Render frames while stepping.
    pub logging: bool,
    /// Wait for operator commands instead of a timed delay.
    pub debug: bool,
    /// Delay between rendered frames when not interactive.
    pub timeout_seconds: f64,
    /// Number of recent snapshots shown per frame.
    pub num_of_lines_logged: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
            logging: false,
            debug: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            num_of_lines_logged: DEFAULT_LINES_LOGGED,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A zero cap would abort before the first step.
    #[error("maxInstructions must be at least 1")]
    ZeroInstructionLimit,
    /// The delay is negative, NaN or infinite.
    #[error("timeoutSeconds must be a finite, non-negative number (got {0})")]
    InvalidTimeout(f64),
}

impl SimulatorConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_instructions == 0 {
            return Err(ConfigError::ZeroInstructionLimit);
        }
        if !self.timeout_seconds.is_finite() || self.timeout_seconds < 0.0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }
        Ok(())
    }

    /// Delay between rendered frames.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for values `Duration` cannot
    /// represent.
    pub fn delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .map_err(|_| ConfigError::InvalidTimeout(self.timeout_seconds))
    }

    /// Whether any frame will ever be rendered.
    #[must_use]
    pub const fn renders(&self) -> bool {
        self.logging || self.debug
    }
}
