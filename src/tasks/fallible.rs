//! # Type-erased success/failure probe.
//!
//! [`Fallible`] lets tasks of different value types sit side by side, e.g. in the slice
//! handed to [`are_valid`](crate::are_valid). Every [`Task<T>`] implements it.

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// # Anything that eventually reports success or an error.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskpromise::{Fallible, TaskError};
///
/// struct AlwaysBroken;
///
/// #[async_trait]
/// impl Fallible for AlwaysBroken {
///     async fn error(&self) -> Option<TaskError> {
///         Some(TaskError::fail("broken"))
///     }
/// }
/// ```
#[async_trait]
pub trait Fallible: Send + Sync {
    /// Waits for the outcome and returns its error, or `None` on success.
    async fn error(&self) -> Option<TaskError>;
}

#[async_trait]
impl<T> Fallible for Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn error(&self) -> Option<TaskError> {
        Task::error(self).await
    }
}
