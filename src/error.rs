//! Error types produced by tasks and combinators.
//!
//! A single enum, [`TaskError`], covers every way a [`Task`](crate::Task) can fail:
//!
//! - engine outcomes: [`TaskError::Timeout`], [`TaskError::Canceled`], [`TaskError::Panicked`];
//! - argument checks: [`TaskError::NilValue`], [`TaskError::NilProducer`];
//! - user failures returned by producers and mappers: [`TaskError::Fail`].
//!
//! Errors are plain values: they are `Clone` so a memoized result can be handed to every
//! observer, and `PartialEq` so callers distinguish kinds by comparison instead of by string
//! matching. Combinators forward dependency errors verbatim.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by task execution.
///
/// Returned by [`Task::wait`](crate::Task::wait) and by every combinator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The producer did not finish before the task deadline.
    #[error("task took too long to complete (timeout {timeout:?})")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The task's cancellation scope (or one of its ancestors) fired before the producer finished.
    #[error("context cancelled")]
    Canceled {
        /// Error latched by the scope when it fired, if any.
        cause: Option<Box<TaskError>>,
    },

    /// The producer panicked; the panic was caught at the task boundary.
    #[error("task panicked: {reason}")]
    Panicked {
        /// Description extracted from the panic payload.
        reason: String,
    },

    /// A required value was absent.
    #[error("null value encountered")]
    NilValue,

    /// A required producer or generator function was absent.
    #[error("null function encountered")]
    NilProducer,

    /// Failure reported by user code (a producer or mapper).
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use taskpromise::TaskError;
    ///
    /// let err = TaskError::fail("disk full");
    /// assert_eq!(err, TaskError::Fail { error: "disk full".into() });
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Builds a [`TaskError::Canceled`] carrying an optional cause.
    pub fn canceled(cause: Option<TaskError>) -> Self {
        TaskError::Canceled {
            cause: cause.map(Box::new),
        }
    }

    /// Converts a caught panic payload into [`TaskError::Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let reason = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else if let Some(err) = payload.downcast_ref::<TaskError>() {
            err.to_string()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { reason }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskpromise::TaskError;
    /// use std::time::Duration;
    ///
    /// let err = TaskError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Canceled { .. } => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::NilValue => "nil_value",
            TaskError::NilProducer => "nil_producer",
            TaskError::Fail { .. } => "task_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            TaskError::Canceled { cause: Some(cause) } => {
                format!("context cancelled; cause: {}", cause.as_message())
            }
            TaskError::Canceled { cause: None } => "context cancelled".to_string(),
            TaskError::Panicked { reason } => format!("panic: {reason}"),
            TaskError::NilValue => "null value encountered".to_string(),
            TaskError::NilProducer => "null function encountered".to_string(),
            TaskError::Fail { error } => format!("error: {error}"),
        }
    }

    /// `true` for [`TaskError::Canceled`], with or without a cause.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled { .. })
    }

    /// `true` for [`TaskError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::Timeout { .. })
    }

    /// Returns the latched cause of a cancellation, if there is one.
    ///
    /// # Example
    /// ```
    /// use taskpromise::TaskError;
    ///
    /// let err = TaskError::canceled(Some(TaskError::fail("upstream")));
    /// assert_eq!(err.cause(), Some(&TaskError::fail("upstream")));
    /// assert_eq!(TaskError::NilValue.cause(), None);
    /// ```
    pub fn cause(&self) -> Option<&TaskError> {
        match self {
            TaskError::Canceled { cause } => cause.as_deref(),
            _ => None,
        }
    }
}

/// Result type returned by producers, mappers and [`Task::wait`](crate::Task::wait).
pub type TaskResult<T> = Result<T, TaskError>;
