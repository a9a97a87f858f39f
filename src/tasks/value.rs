//! # Pre-resolved tasks.
//!
//! Constructors for tasks whose outcome is known up front. They spawn nothing: the
//! outcome is stored inline and [`Task::wait`] returns it immediately.
//!
//! Used as the "already known" branch of [`tern`](crate::tern) and
//! [`tern_fn`](crate::tern_fn), and to synthesize a failed task from a fired scope.

use crate::error::{TaskError, TaskResult};
use crate::scope::CancelScope;
use crate::tasks::task::{Slot, Task};

impl<T> Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A task already resolved to `Ok(value)`.
    ///
    /// The stub shares `scope` (it does not derive a child); with `None` it gets a fresh root.
    ///
    /// # Example
    /// ```
    /// use taskpromise::Task;
    ///
    /// let t = Task::ready(None, "cached");
    /// assert!(t.is_resolved());
    /// assert_eq!(t.blocking_wait(), Ok("cached"));
    /// ```
    pub fn ready(scope: Option<&CancelScope>, value: T) -> Self {
        Self::from_result(scope, Ok(value))
    }

    /// A task already resolved to `Err(err)`.
    pub fn failed(scope: Option<&CancelScope>, err: TaskError) -> Self {
        Self::from_result(scope, Err(err))
    }

    /// A task already resolved to `res`.
    pub fn from_result(scope: Option<&CancelScope>, res: TaskResult<T>) -> Self {
        Self {
            scope: scope.cloned().unwrap_or_default(),
            slot: Slot::Ready(res),
        }
    }

    /// A failed task carrying the cause `scope` was cancelled with.
    ///
    /// Falls back to [`TaskError::Canceled`] without a cause when none was latched
    /// (or when the scope has not fired at all).
    pub fn canceled_by(scope: &CancelScope) -> Self {
        let err = scope
            .cause()
            .unwrap_or_else(|| TaskError::canceled(None));
        Self::failed(Some(scope), err)
    }
}
