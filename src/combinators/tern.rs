//! # Condition-gated selection.
//!
//! Three variants pick between a computing task and an alternative, based on a condition
//! evaluated at call time. They differ in how the alternative is produced:
//!
//! | Variant       | `cond == true`         | `cond == false`                                   |
//! |---------------|------------------------|---------------------------------------------------|
//! | [`tern()`]    | `Task::spawn(producer)`| `Task::ready(value)`; nothing runs                |
//! | [`tern_fn`]   | `Task::spawn(producer)`| `otherwise()` called **synchronously**, wrapped   |
//! | [`tern_task`] | `Task::spawn(producer)`| `Task::spawn(otherwise)`, a full computing task   |
//!
//! The unchosen producer is never invoked.

use std::future::Future;

use crate::error::TaskResult;
use crate::scope::CancelScope;
use crate::tasks::Task;

/// Runs `producer` when `cond` holds, otherwise resolves immediately to `Ok(otherwise)`.
///
/// # Example
/// ```
/// use taskpromise::{tern, CancelScope, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let cached = Some(2);
///     let fetch = |_: CancelScope| async { Ok::<_, TaskError>(1) };
///     let t = tern(None, cached.is_none(), fetch, cached.unwrap_or(0));
///     assert_eq!(t.wait().await, Ok(2));
/// }
/// ```
pub fn tern<T, P, Fut>(
    scope: Option<&CancelScope>,
    cond: bool,
    producer: P,
    otherwise: T,
) -> Task<T>
where
    T: Clone + Send + Sync + 'static,
    P: FnOnce(CancelScope) -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
{
    if !cond {
        return Task::ready(scope, otherwise);
    }
    Task::spawn(scope, producer)
}

/// Runs `producer` when `cond` holds, otherwise calls `otherwise` on the caller's thread
/// and wraps its result (value or error) in a pre-resolved task.
pub fn tern_fn<T, P, Fut, O>(
    scope: Option<&CancelScope>,
    cond: bool,
    producer: P,
    otherwise: O,
) -> Task<T>
where
    T: Clone + Send + Sync + 'static,
    P: FnOnce(CancelScope) -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
    O: FnOnce() -> TaskResult<T>,
{
    if !cond {
        return Task::from_result(scope, otherwise());
    }
    Task::spawn(scope, producer)
}

/// Spawns a computing task from `producer` when `cond` holds, from `otherwise` when not.
pub fn tern_task<T, P, Fut, O, OFut>(
    scope: Option<&CancelScope>,
    cond: bool,
    producer: P,
    otherwise: O,
) -> Task<T>
where
    T: Clone + Send + Sync + 'static,
    P: FnOnce(CancelScope) -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
    O: FnOnce(CancelScope) -> OFut + Send + 'static,
    OFut: Future<Output = TaskResult<T>> + Send + 'static,
{
    if !cond {
        return Task::spawn(scope, otherwise);
    }
    Task::spawn(scope, producer)
}
