//! # Per-task configuration.
//!
//! [`TaskConfig`] holds the settings the execution engine applies to a single task.
//! Today that is only the deadline; [`Task::spawn`](crate::Task::spawn) and every
//! combinator use [`TaskConfig::default`], while [`Task::spawn_with`](crate::Task::spawn_with)
//! accepts an explicit value.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no deadline (the task waits for its producer or its scope)
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskpromise::TaskConfig;
//!
//! let cfg = TaskConfig::default().with_timeout(Duration::from_secs(5));
//! assert_eq!(cfg.deadline(), Some(Duration::from_secs(5)));
//!
//! let unbounded = TaskConfig::default().with_timeout(Duration::ZERO);
//! assert_eq!(unbounded.deadline(), None);
//! ```

use std::time::Duration;

/// Deadline applied to every task unless overridden: one hour.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Settings for a single task.
///
/// ## Field semantics
/// - `timeout`: how long the producer may run before the task resolves to
///   [`TaskError::Timeout`](crate::TaskError::Timeout) (`0s` = never)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskConfig {
    /// Maximum time the producer may run.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = the task times out after this long
    pub timeout: Duration,
}

impl TaskConfig {
    /// Returns a copy with the given timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → the task times out after `d`
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }
}

impl Default for TaskConfig {
    /// Default configuration:
    ///
    /// - `timeout = 1h` ([`DEFAULT_TIMEOUT`])
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
