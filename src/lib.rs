//! # taskpromise
//!
//! **taskpromise** is a small promise library for tokio.
//!
//! A [`Task`] wraps a deferred computation with single-execution memoization, panic
//! safety, a deadline and cooperative cancellation that carries its *cause*. Combinators
//! compose tasks: mapping, multi-dependency joins, condition-gated selection and a
//! validity gate that runs work only after its prerequisites succeeded.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller scope (CancelScope, optional)
//!        │ child()
//!        ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Task<T>                                                      │
//! │   - scope: CancelScope (fires with the producer's error)      │
//! │   - slot:  watch::Receiver<Option<Result<T, TaskError>>>      │
//! └──────┬──────────────────────────────┬─────────────────────────┘
//!        │ tokio::spawn                 │ tokio::spawn
//!        ▼                              ▼
//!   ┌───────────┐  JoinHandle   ┌────────────────────────────────┐
//!   │ producer  │──────────────►│ racer                          │
//!   │ (panics   │               │  select! {                     │
//!   │  caught)  │               │    producer done → outcome     │
//!   └───────────┘               │    scope fired   → Canceled    │
//!                               │    deadline      → Timeout     │
//!                               │  }                             │
//!                               │  send_replace(Some(outcome))   │
//!                               └───────────────┬────────────────┘
//!                                               ▼
//!                     wait() / error() / subscribe()  (any number of observers)
//! ```
//!
//! ### Composition
//! ```text
//! fmap / fmap2 / fmap3 ──► Task::spawn { t1.wait()?; t2.wait()?; ..; mapper(..) }
//! tern / tern_fn       ──► Task::ready(..) | Task::from_result(otherwise()) | Task::spawn(producer)
//! tern_task            ──► Task::spawn(producer | otherwise)
//! map_on_valid         ──► are_valid(tasks).await ──► Task::failed(err) | Task::spawn(generator)
//! ```
//!
//! ## Features
//! | Area             | Description                                                  | Key types / functions                      |
//! |------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Tasks**        | Memoized, deadline-bounded, panic-safe computations.         | [`Task`], [`TaskConfig`]                   |
//! | **Cancellation** | Derivable scopes that remember why they fired.               | [`CancelScope`]                            |
//! | **Combinators**  | Map, join, conditional selection, validity gate.             | [`fmap`], [`fmap2`], [`tern()`], [`map_on_valid`] |
//! | **Errors**       | One comparable error enum for every failure kind.            | [`TaskError`]                              |
//! | **Containers**   | Lock-guarded value, map and vector wrappers.                 | [`Container`], [`SyncMap`], [`SyncSlice`]  |
//!
//! ## Logging
//! The crate emits [`tracing`] events (`trace` on spawn/resolution, `debug` on timeout,
//! cancellation, panic recovery and gate failures). Install any subscriber to see them.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskpromise::{fmap2, map_on_valid, CancelScope, Task, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let scope = CancelScope::new();
//!
//!     let user = Task::spawn(Some(&scope), |_| async {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         Ok::<_, TaskError>(String::from("ada"))
//!     });
//!     let visits = Task::spawn(Some(&scope), |_| async { Ok::<_, TaskError>(3u32) });
//!
//!     let greeting = fmap2(Some(&scope), &user, &visits, |u, v| Ok(format!("{u}: {v}")));
//!     assert_eq!(greeting.wait().await?, "ada: 3");
//!
//!     let report = map_on_valid(
//!         Some(&scope),
//!         Some(|_: CancelScope| async { Ok::<_, TaskError>("report written") }),
//!         &[&user, &visits],
//!     )
//!     .await;
//!     assert_eq!(report.wait().await?, "report written");
//!     Ok(())
//! }
//! ```
mod combinators;
mod config;
mod error;
mod scope;
mod shared;
mod tasks;

// ---- Public re-exports ----

pub use combinators::{are_valid, fmap, fmap2, fmap3, map_on_valid, tern, tern_fn, tern_task};
pub use config::{TaskConfig, DEFAULT_TIMEOUT};
pub use error::{TaskError, TaskResult};
pub use scope::CancelScope;
pub use shared::{Container, SyncMap, SyncSlice};
pub use tasks::{Fallible, Task};
