//! # Run a producer and race it against its deadline and scope.
//!
//! Executes one producer on the tokio runtime and resolves the task outcome exactly once.
//!
//! - **Spawn the producer** on its own tokio task, with panics caught at the boundary
//! - **Race** producer completion against the deadline and the task's scope
//! - **Fire the scope** with the error as cause when the producer fails
//!
//! ## Outcome table
//!
//! ```text
//! producer → Ok(v)           → Ok(v)
//! producer → Err(e) / panic  → scope.cancel_with(e) → Err(e)
//! deadline elapsed           → Err(Timeout { timeout })
//! scope fired                → Err(Canceled { cause: scope.cause() })
//! producer unit lost         → Err(Canceled { cause: None })   (runtime shutting down)
//! ```
//!
//! ## Rules
//! - A finished producer wins over a scope that fired in the same poll (`biased`)
//! - Only a producer failure fires the scope; timeout and cancellation do not
//! - When the deadline or the scope wins, the producer's `JoinHandle` is dropped: the
//!   producer keeps running detached and its result is discarded. Producers that never
//!   return leak their tokio task; they should watch the scope they are given.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, trace};

use crate::error::{TaskError, TaskResult};
use crate::scope::CancelScope;

/// Spawns `producer` on `runtime`, converting a panic into [`TaskError::Panicked`].
///
/// The producer closure is invoked inside the spawned task, so a panic raised while
/// building its future is caught as well.
pub(crate) fn spawn_producer<T, P, Fut>(
    runtime: &Handle,
    scope: CancelScope,
    producer: P,
) -> JoinHandle<TaskResult<T>>
where
    T: Send + 'static,
    P: FnOnce(CancelScope) -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
{
    runtime.spawn(async move {
        let guarded = AssertUnwindSafe(async move { producer(scope).await });
        match guarded.catch_unwind().await {
            Ok(res) => res,
            Err(payload) => {
                let err = TaskError::from_panic(payload);
                debug!(error = %err, "producer panicked");
                Err(err)
            }
        }
    })
}

/// Resolves the outcome of a running producer.
///
/// ### Flow
/// 1. Wait for the first of: producer finished, deadline elapsed, scope fired
/// 2. On producer failure, fire `scope` with the error as cause
/// 3. Return the outcome (the caller memoizes it)
pub(crate) async fn race<T>(
    producer: JoinHandle<TaskResult<T>>,
    scope: &CancelScope,
    deadline: Option<Duration>,
) -> TaskResult<T> {
    let expired = async {
        match deadline {
            Some(dur) => time::sleep(dur).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;

        joined = producer => {
            let res = joined.unwrap_or_else(|join_err| {
                debug!(error = %join_err, "producer unit lost before completion");
                Err(TaskError::canceled(None))
            });
            if let Err(err) = &res {
                trace!(label = err.as_label(), "producer failed; firing task scope");
                scope.cancel_with(err.clone());
            }
            res
        }
        _ = scope.cancelled() => {
            let cause = scope.cause();
            debug!(cause = ?cause, "task scope fired before producer finished");
            Err(TaskError::canceled(cause))
        }
        _ = expired => {
            let timeout = deadline.unwrap_or_default();
            debug!(timeout = ?timeout, "task deadline elapsed");
            Err(TaskError::Timeout { timeout })
        }
    }
}
