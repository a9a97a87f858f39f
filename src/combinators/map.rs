//! # Mapping and join combinators.
//!
//! [`fmap`], [`fmap2`] and [`fmap3`] build a task whose producer awaits 1–3 dependencies
//! and feeds their values to a mapper.
//!
//! ## Flow
//! ```text
//! fmapN(scope, t1, .., tN, mapper)
//!   ├─► any tK.scope() already fired?  (checked left to right)
//!   │     └─ yes → Task::canceled_by(tK.scope())   (no spawn)
//!   └─► Task::spawn(scope, ..)
//!          v1 = t1.wait()?   ── Err(e1) → Err(e1), t2..tN never awaited
//!          v2 = t2.wait()?
//!          ..
//!          mapper(v1, .., vN)
//! ```
//!
//! ## Rules
//! - Dependencies are awaited strictly left to right; the first error wins
//! - Dependency errors are forwarded verbatim
//! - The mapper runs only when every dependency succeeded
//! - The new task's scope derives from `scope`, not from the dependencies

use crate::error::TaskResult;
use crate::scope::CancelScope;
use crate::tasks::Task;

/// Returns a failed task for the leftmost dependency scope that has already fired.
fn fired_dependency<U>(scopes: &[&CancelScope]) -> Option<Task<U>>
where
    U: Clone + Send + Sync + 'static,
{
    scopes
        .iter()
        .find(|s| s.is_cancelled())
        .map(|s| Task::canceled_by(s))
}

/// Maps the value of `task` with `mapper` (`Map`/`FMap`).
///
/// # Example
/// ```
/// use taskpromise::{fmap, Task, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let len = Task::spawn(None, |_| async { Ok::<_, TaskError>(String::from("hello")) });
///     let shout = fmap(None, &len, |s| Ok(s.to_uppercase()));
///     assert_eq!(shout.wait().await, Ok(String::from("HELLO")));
/// }
/// ```
pub fn fmap<T, U, F>(scope: Option<&CancelScope>, task: &Task<T>, mapper: F) -> Task<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: FnOnce(T) -> TaskResult<U> + Send + 'static,
{
    if let Some(failed) = fired_dependency(&[task.scope()]) {
        return failed;
    }

    let dep = task.clone();
    Task::spawn(scope, move |_| async move {
        let resolved = dep.wait().await?;
        mapper(resolved)
    })
}

/// Joins two tasks with `mapper`. `task1`'s error wins over `task2`'s.
pub fn fmap2<T1, T2, U, F>(
    scope: Option<&CancelScope>,
    task1: &Task<T1>,
    task2: &Task<T2>,
    mapper: F,
) -> Task<U>
where
    T1: Clone + Send + Sync + 'static,
    T2: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: FnOnce(T1, T2) -> TaskResult<U> + Send + 'static,
{
    if let Some(failed) = fired_dependency(&[task1.scope(), task2.scope()]) {
        return failed;
    }

    let (dep1, dep2) = (task1.clone(), task2.clone());
    Task::spawn(scope, move |_| async move {
        let resolved1 = dep1.wait().await?;
        let resolved2 = dep2.wait().await?;
        mapper(resolved1, resolved2)
    })
}

/// Joins three tasks with `mapper`, awaiting them left to right.
pub fn fmap3<T1, T2, T3, U, F>(
    scope: Option<&CancelScope>,
    task1: &Task<T1>,
    task2: &Task<T2>,
    task3: &Task<T3>,
    mapper: F,
) -> Task<U>
where
    T1: Clone + Send + Sync + 'static,
    T2: Clone + Send + Sync + 'static,
    T3: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: FnOnce(T1, T2, T3) -> TaskResult<U> + Send + 'static,
{
    if let Some(failed) = fired_dependency(&[task1.scope(), task2.scope(), task3.scope()]) {
        return failed;
    }

    let (dep1, dep2, dep3) = (task1.clone(), task2.clone(), task3.clone());
    Task::spawn(scope, move |_| async move {
        let resolved1 = dep1.wait().await?;
        let resolved2 = dep2.wait().await?;
        let resolved3 = dep3.wait().await?;
        mapper(resolved1, resolved2, resolved3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time;

    fn delayed<T>(ms: u64, res: TaskResult<T>) -> Task<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Task::spawn(None, move |_| async move {
            time::sleep(Duration::from_millis(ms)).await;
            res
        })
    }

    #[tokio::test]
    async fn test_fmap_transforms_value() {
        let base = delayed(5, Ok(20));
        let mapped = fmap(None, &base, |v| Ok(format!("v={}", v + 1)));
        assert_eq!(mapped.wait().await, Ok(String::from("v=21")));
    }

    #[tokio::test]
    async fn test_fmap_forwards_dependency_error_and_skips_mapper() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let base = delayed::<i32>(5, Err(TaskError::fail("upstream")));
        let mapped = base.map(None, move |v| {
            flag.store(true, Ordering::SeqCst);
            Ok(v)
        });

        assert_eq!(mapped.wait().await, Err(TaskError::fail("upstream")));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_fmap_mapper_error_is_result() {
        let base = delayed(1, Ok(0));
        let mapped = fmap(None, &base, |v: i32| {
            if v == 0 {
                Err(TaskError::fail("division by zero"))
            } else {
                Ok(10 / v)
            }
        });
        assert_eq!(mapped.wait().await, Err(TaskError::fail("division by zero")));
    }

    #[tokio::test]
    async fn test_fmap_on_already_failed_dependency_resolves_eagerly() {
        let base = delayed::<u8>(0, Err(TaskError::fail("gone")));
        assert!(base.error().await.is_some());

        let mapped = fmap(None, &base, |v| Ok(v + 1));
        assert!(mapped.is_resolved());
        assert_eq!(mapped.wait().await, Err(TaskError::fail("gone")));
    }

    #[tokio::test]
    async fn test_fmap_on_cancelled_dependency_without_cause() {
        let scope = CancelScope::new();
        let base = Task::spawn(Some(&scope), |_| async {
            time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        });
        scope.cancel();

        let mapped = fmap(None, &base, |v| Ok(v * 2));
        assert!(mapped.is_resolved());
        assert_eq!(mapped.wait().await, Err(TaskError::canceled(None)));
    }

    #[tokio::test]
    async fn test_fmap2_first_error_wins_when_both_fail() {
        let first = delayed::<i32>(30, Err(TaskError::fail("first")));
        let second = delayed::<i32>(0, Err(TaskError::fail("second")));

        let joined = fmap2(None, &first, &second, |a, b| Ok(a + b));
        assert_eq!(joined.wait().await, Err(TaskError::fail("first")));
    }

    #[tokio::test]
    async fn test_fmap2_joins_heterogeneous_values() {
        let name = delayed(5, Ok(String::from("answer")));
        let value = delayed(1, Ok(42u64));

        let joined = fmap2(None, &name, &value, |n, v| Ok(format!("{n}={v}")));
        assert_eq!(joined.wait().await, Ok(String::from("answer=42")));
    }

    #[tokio::test]
    async fn test_fmap3_stops_at_first_failure() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let a = delayed(1, Ok(1));
        let b = delayed::<i32>(10, Err(TaskError::NilValue));
        let c = delayed(1, Ok(3));

        let joined = fmap3(None, &a, &b, &c, move |x, y, z| {
            flag.store(true, Ordering::SeqCst);
            Ok(x + y + z)
        });
        assert_eq!(joined.wait().await, Err(TaskError::NilValue));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fmap2_does_not_wait_for_second_after_first_fails() {
        let start = time::Instant::now();
        let first = delayed::<i32>(0, Err(TaskError::fail("early")));
        let second = delayed(10 * 60 * 1_000, Ok(2));

        let joined = fmap2(None, &first, &second, |a, b| Ok(a + b));
        assert_eq!(joined.wait().await, Err(TaskError::fail("early")));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!second.is_resolved());
    }

    #[tokio::test]
    async fn test_fmap3_checks_third_dependency_scope() {
        let a = Task::ready(None, 1);
        let b = Task::ready(None, 2);
        let c_scope = CancelScope::new();
        c_scope.cancel_with(TaskError::fail("third"));
        let c = Task::<i32>::canceled_by(&c_scope);

        let joined = fmap3(None, &a, &b, &c, |x, y, z| Ok(x + y + z));
        assert!(joined.is_resolved());
        assert_eq!(joined.wait().await, Err(TaskError::fail("third")));
    }

    #[tokio::test]
    async fn test_fmap3_sums() {
        let joined = fmap3(
            None,
            &delayed(3, Ok(1)),
            &delayed(2, Ok(2)),
            &delayed(1, Ok(3)),
            |x, y, z| Ok(x + y + z),
        );
        assert_eq!(joined.wait().await, Ok(6));
    }

    #[tokio::test]
    async fn test_mapper_panic_is_recovered() {
        let base = Task::ready(None, 1);
        let mapped: Task<i32> = fmap(None, &base, |_| panic!("mapper blew up"));
        assert_eq!(
            mapped.wait().await,
            Err(TaskError::Panicked {
                reason: "mapper blew up".into()
            })
        );
    }
}
