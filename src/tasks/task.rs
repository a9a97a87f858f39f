//! # The task handle and its execution engine.
//!
//! [`Task`] is a cheap-to-clone handle to a deferred computation producing
//! `Result<T, TaskError>`. Construction starts the computation immediately; every observer,
//! concurrent or sequential, receives a clone of the single memoized outcome.
//!
//! ## Lifecycle
//! ```text
//! Task::spawn(parent, producer)
//!   ├─► scope = parent.child()            (or a fresh root)
//!   ├─► tokio::spawn(producer(scope))     (panics caught → Panicked)
//!   └─► tokio::spawn(racer)
//!          select! {
//!            producer done  → outcome (on Err: scope.cancel_with(err))
//!            scope fired    → Canceled { cause }
//!            deadline       → Timeout
//!          }
//!          watch::Sender::send_replace(Some(outcome))   (exactly once)
//!
//! wait() ──► watch::Receiver::wait_for(is_some) ──► clone of outcome
//! ```
//!
//! ## Rules
//! - The producer runs **at most once**; it is spawned once, at construction
//! - The outcome is written once and never changes afterwards
//! - Every observer gets its own clone (`T: Clone`)
//! - Construction requires a running tokio runtime

use std::fmt;
use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::trace;

use crate::config::TaskConfig;
use crate::error::{TaskError, TaskResult};
use crate::scope::{self, CancelScope};
use crate::tasks::runner;

/// Where the outcome of a task lives.
#[derive(Clone)]
pub(crate) enum Slot<T> {
    /// Known at construction (value/error stubs).
    Ready(TaskResult<T>),
    /// Published by the racer once the race resolves. `runtime` is the runtime the task
    /// was spawned on; subscribers are scheduled there.
    Pending {
        rx: watch::Receiver<Option<TaskResult<T>>>,
        runtime: Handle,
    },
}

/// # Handle to a deferred, memoized, at-most-once computation.
///
/// Clones share the same computation and the same [`CancelScope`].
///
/// # Example
/// ```
/// use taskpromise::{Task, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let answer = Task::spawn(None, |_scope| async { Ok::<_, TaskError>(21) });
///     let doubled = answer.map(None, |v| Ok(v * 2));
///
///     assert_eq!(doubled.wait().await, Ok(42));
///     assert_eq!(answer.wait().await, Ok(21));
/// }
/// ```
#[derive(Clone)]
pub struct Task<T> {
    pub(crate) scope: CancelScope,
    pub(crate) slot: Slot<T>,
}

impl<T> Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts `producer` in the background with the default [`TaskConfig`].
    ///
    /// The task's scope is a child of `parent` (or a fresh root when `None`) and is handed
    /// to the producer, which should watch it to stop early on cancellation.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn<P, Fut>(parent: Option<&CancelScope>, producer: P) -> Self
    where
        P: FnOnce(CancelScope) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self::spawn_with(TaskConfig::default(), parent, producer)
    }

    /// Starts `producer` in the background with an explicit configuration.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn_with<P, Fut>(
        config: TaskConfig,
        parent: Option<&CancelScope>,
        producer: P,
    ) -> Self
    where
        P: FnOnce(CancelScope) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        let scope = scope::derive(parent);
        let deadline = config.deadline();
        let (tx, rx) = watch::channel(None);
        let runtime = Handle::current();

        let job = runner::spawn_producer(&runtime, scope.clone(), producer);
        let racer_scope = scope.clone();
        runtime.spawn(async move {
            let outcome = runner::race(job, &racer_scope, deadline).await;
            trace!(ok = outcome.is_ok(), "task resolved");
            tx.send_replace(Some(outcome));
        });
        trace!(deadline = ?deadline, "task spawned");

        Self {
            scope,
            slot: Slot::Pending { rx, runtime },
        }
    }

    /// Waits for the memoized outcome and returns a clone of it.
    ///
    /// Never re-runs the producer. If the runtime shuts down before the outcome is
    /// published, returns [`TaskError::Canceled`] without a cause.
    pub async fn wait(&self) -> TaskResult<T> {
        match &self.slot {
            Slot::Ready(res) => res.clone(),
            Slot::Pending { rx, .. } => {
                let mut rx = rx.clone();
                let outcome = match rx.wait_for(Option::is_some).await {
                    Ok(published) => (*published).clone(),
                    Err(_closed) => None,
                };
                outcome.unwrap_or_else(|| Err(TaskError::canceled(None)))
            }
        }
    }

    /// Blocks the current thread until the outcome is available.
    ///
    /// Meant for synchronous callers. Calling it from a task on a current-thread runtime
    /// deadlocks, since the racer cannot make progress; use [`Task::wait`] there.
    pub fn blocking_wait(&self) -> TaskResult<T> {
        futures::executor::block_on(self.wait())
    }

    /// Delivers the outcome to `callback` without blocking the caller.
    ///
    /// For a pending task the callback runs on the runtime the task was spawned on, so
    /// `subscribe` may be called from any thread; for a pre-resolved task it runs
    /// immediately, before `subscribe` returns.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: FnOnce(TaskResult<T>) + Send + 'static,
    {
        match &self.slot {
            Slot::Ready(res) => callback(res.clone()),
            Slot::Pending { runtime, .. } => {
                let task = self.clone();
                runtime.spawn(async move { callback(task.wait().await) });
            }
        }
    }

    /// Waits for the outcome and keeps only the error, if any.
    pub async fn error(&self) -> Option<TaskError> {
        self.wait().await.err()
    }

    /// Returns `true` once the outcome is known. Never blocks.
    pub fn is_resolved(&self) -> bool {
        match &self.slot {
            Slot::Ready(_) => true,
            Slot::Pending { rx, .. } => rx.borrow().is_some(),
        }
    }

    /// Method form of [`fmap`](crate::fmap).
    pub fn map<U, F>(&self, scope: Option<&CancelScope>, mapper: F) -> Task<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> TaskResult<U> + Send + 'static,
    {
        crate::combinators::fmap(scope, self, mapper)
    }
}

impl<T> Task<T> {
    /// Returns the task's cancellation scope.
    ///
    /// Derive from it to tie other tasks to this one: the scope fires when this task's
    /// producer fails, with the failure as cause.
    pub fn scope(&self) -> &CancelScope {
        &self.scope
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = match &self.slot {
            Slot::Ready(_) => true,
            Slot::Pending { rx, .. } => rx.borrow().is_some(),
        };
        f.debug_struct("Task")
            .field("resolved", &resolved)
            .field("cancelled", &self.scope.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::{self, Instant};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_producer_runs_once_for_many_concurrent_waiters() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = Task::spawn(None, move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            time::sleep(Duration::from_millis(20)).await;
            Ok(String::from("shared"))
        });

        let mut waiters = Vec::new();
        for _ in 0..32 {
            let t = task.clone();
            waiters.push(tokio::spawn(async move { t.wait().await }));
        }
        for w in waiters {
            assert_eq!(w.await.unwrap(), Ok(String::from("shared")));
        }

        assert_eq!(task.wait().await, Ok(String::from("shared")));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_is_memoized_too() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = Task::spawn(None, move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(TaskError::fail("nope"))
        });

        for _ in 0..3 {
            assert_eq!(task.wait().await, Err(TaskError::fail("nope")));
            assert_eq!(task.error().await, Some(TaskError::fail("nope")));
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_resolves_to_panicked_error() {
        let task = Task::spawn(None, |_| async {
            if true {
                panic!("producer exploded");
            }
            Ok(1u8)
        });

        assert_eq!(
            task.wait().await,
            Err(TaskError::Panicked {
                reason: "producer exploded".into()
            })
        );
        assert!(task.scope().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_producer_times_out_after_default_deadline() {
        let start = Instant::now();
        let task = Task::spawn(None, |_| async {
            time::sleep(Duration::from_secs(2 * 60 * 60)).await;
            Ok(1)
        });

        assert_eq!(
            task.wait().await,
            Err(TaskError::Timeout {
                timeout: crate::config::DEFAULT_TIMEOUT
            })
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= crate::config::DEFAULT_TIMEOUT);
        assert!(elapsed < crate::config::DEFAULT_TIMEOUT + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_fast_producer_returns_value() {
        let task = Task::spawn(None, |_| async {
            time::sleep(Duration::from_millis(5)).await;
            Ok(99)
        });
        assert_eq!(task.wait().await, Ok(99));
        assert!(task.is_resolved());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_deadline() {
        let cfg = TaskConfig::default().with_timeout(Duration::from_millis(50));
        let task = Task::spawn_with(cfg, None, |_| async {
            time::sleep(Duration::from_secs(1)).await;
            Ok(())
        });
        assert!(task.wait().await.unwrap_err().is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_parent_scope_cancels_derived_task() {
        let a = Task::spawn(None, |_| async {
            time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        });
        let b = Task::spawn(Some(a.scope()), |_| async {
            time::sleep(Duration::from_secs(10)).await;
            Ok(2)
        });

        a.scope().cancel();

        assert_eq!(b.wait().await, Err(TaskError::canceled(None)));
        assert_eq!(a.wait().await, Err(TaskError::canceled(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_producer_failure_reaches_derived_task_as_cause() {
        let a = Task::spawn(None, |_| async { Err::<i32, _>(TaskError::fail("a broke")) });
        let b = Task::spawn(Some(a.scope()), |_| async {
            time::sleep(Duration::from_secs(10)).await;
            Ok(2)
        });

        assert_eq!(a.wait().await, Err(TaskError::fail("a broke")));
        let err = b.wait().await.unwrap_err();
        assert!(err.is_canceled());
        assert_eq!(err.cause(), Some(&TaskError::fail("a broke")));
    }

    #[tokio::test]
    async fn test_failed_child_leaves_parent_scope_alone() {
        let parent = CancelScope::new();
        let task = Task::spawn(Some(&parent), |_| async { Err::<(), _>(TaskError::NilValue) });

        assert_eq!(task.error().await, Some(TaskError::NilValue));
        assert!(task.scope().is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_producer_observes_its_scope() {
        let parent = CancelScope::new();
        let (seen_tx, seen_rx) = oneshot::channel();
        let task = Task::spawn_with(
            TaskConfig::default().with_timeout(Duration::ZERO),
            Some(&parent),
            |scope| async move {
                scope.cancelled().await;
                let _ = seen_tx.send(scope.cause());
                time::sleep(Duration::from_secs(60)).await;
                Ok("stopped")
            },
        );
        parent.cancel_with(TaskError::fail("shutdown"));

        let err = task.wait().await.unwrap_err();
        assert_eq!(err.cause(), Some(&TaskError::fail("shutdown")));
        assert_eq!(seen_rx.await.unwrap(), Some(TaskError::fail("shutdown")));
    }

    #[tokio::test]
    async fn test_subscribe_delivers_without_blocking() {
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let task = Task::spawn(None, |_| async move {
            let _ = release_rx.await;
            Ok(5)
        });

        let (tx, rx) = oneshot::channel();
        task.subscribe(move |res| {
            let _ = tx.send(res);
        });
        assert!(!task.is_resolved());

        release_tx.send(()).unwrap();
        assert_eq!(rx.await.unwrap(), Ok(5));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_wait_from_sync_code() {
        let task = Task::spawn(None, |_| async {
            time::sleep(Duration::from_millis(5)).await;
            Ok(vec![1, 2, 3])
        });

        let res = tokio::task::spawn_blocking(move || task.blocking_wait())
            .await
            .unwrap();
        assert_eq!(res, Ok(vec![1, 2, 3]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_subscribe_from_thread_without_runtime() {
        let task = Task::spawn(None, |_| async {
            time::sleep(Duration::from_millis(20)).await;
            Ok(7u32)
        });

        let (tx, rx) = oneshot::channel();
        let handle = {
            let task = task.clone();
            std::thread::spawn(move || {
                task.subscribe(move |res| {
                    let _ = tx.send(res);
                });
            })
        };
        handle.join().unwrap();

        assert_eq!(rx.await.unwrap(), Ok(7));
    }
}
