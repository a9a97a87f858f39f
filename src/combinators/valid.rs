//! # Validity gate.
//!
//! [`are_valid`] checks that a set of tasks all succeeded; [`map_on_valid`] runs a generator
//! only once that check passes. Together they model a precondition gate: side-effecting
//! work proceeds only after every prerequisite task is confirmed successful.
//!
//! ## Flow
//! ```text
//! are_valid(scope, [t1, t2, .., tN])
//!   ├─► N == 0 → Ok(())
//!   └─► FuturesUnordered { t1.error(), t2.error(), .., tN.error() }   (polled concurrently)
//!         ├─ some check → Some(err) → Err(err), remaining checks dropped
//!         ├─ scope fired            → Err(Canceled { cause })
//!         └─ all checks → None      → Ok(())
//!
//! map_on_valid(scope, generator, tasks)
//!   ├─► generator == None  → Task::failed(NilProducer)   (tasks untouched)
//!   ├─► are_valid → Err(e) → Task::failed(e)             (generator never invoked)
//!   └─► are_valid → Ok     → Task::spawn(scope, generator)
//! ```

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::scope::CancelScope;
use crate::tasks::{Fallible, Task};

/// Waits until every task in `tasks` succeeded, or until the first one fails.
///
/// Returns the first error observed (in completion order, not slice order). If `scope`
/// fires first, returns [`TaskError::Canceled`] with the scope's cause.
///
/// # Example
/// ```
/// use taskpromise::{are_valid, Task, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let user = Task::spawn(None, |_| async { Ok::<_, TaskError>("ada") });
///     let quota = Task::spawn(None, |_| async { Ok::<_, TaskError>(10u32) });
///
///     assert_eq!(are_valid(None, &[&user, &quota]).await, Ok(()));
///     assert_eq!(are_valid(None, &[]).await, Ok(()));
/// }
/// ```
pub async fn are_valid(
    scope: Option<&CancelScope>,
    tasks: &[&dyn Fallible],
) -> Result<(), TaskError> {
    if tasks.is_empty() {
        return Ok(());
    }

    let mut checks: FuturesUnordered<_> = tasks.iter().map(|task| task.error()).collect();
    let fired = async {
        match scope {
            Some(s) => s.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(fired);

    loop {
        tokio::select! {
            biased;

            next = checks.next() => match next {
                Some(None) => continue,
                Some(Some(err)) => {
                    debug!(
                        label = err.as_label(),
                        pending = checks.len(),
                        "validity check failed"
                    );
                    return Err(err);
                }
                None => return Ok(()),
            },
            _ = &mut fired => {
                let cause = scope.and_then(CancelScope::cause);
                debug!(cause = ?cause, "validity gate cancelled");
                return Err(TaskError::canceled(cause));
            }
        }
    }
}

/// Spawns a task from `generator` once every task in `tasks` succeeded.
///
/// - `generator == None` → a task failed with [`TaskError::NilProducer`]; `tasks` are not awaited
/// - a failing dependency → a task failed with that error; `generator` is never invoked
/// - otherwise → the generator's own outcome
pub async fn map_on_valid<T, G, Fut>(
    scope: Option<&CancelScope>,
    generator: Option<G>,
    tasks: &[&dyn Fallible],
) -> Task<T>
where
    T: Clone + Send + Sync + 'static,
    G: FnOnce(CancelScope) -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
{
    let Some(generator) = generator else {
        return Task::failed(scope, TaskError::NilProducer);
    };

    if let Err(err) = are_valid(scope, tasks).await {
        return Task::failed(scope, err);
    }
    Task::spawn(scope, generator)
}
