//! # Task handle, execution engine and pre-resolved tasks.
//!
//! This module provides the core task types:
//! - [`Task`] - handle to a memoized, cancelable, deadline-bounded computation
//! - [`Fallible`] - type-erased "did it fail?" probe implemented by every task
//!
//! Internal modules:
//! - `runner`: spawns the producer and races it against deadline and scope;
//! - `value`: pre-resolved constructors (`ready`, `failed`, `canceled_by`).

mod fallible;
mod runner;
mod task;
mod value;

pub use fallible::Fallible;
pub use task::Task;
