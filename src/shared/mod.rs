//! # Lock-guarded containers.
//!
//! Small thread-safe wrappers callers use to stash intermediate results next to their
//! tasks. They are independent of the execution engine.
//!
//! - [`Container`] - a single value behind an `RwLock`
//! - [`SyncMap`] - a `HashMap` behind an `RwLock`
//! - [`SyncSlice`] - a `Vec` behind an `RwLock`
//!
//! All three recover from lock poisoning: a panic in another holder does not make the
//! data unreachable.

mod container;
mod map;
mod slice;

pub use container::Container;
pub use map::SyncMap;
pub use slice::SyncSlice;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
