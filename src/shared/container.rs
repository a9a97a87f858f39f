use std::sync::RwLock;

use super::{read, write};

/// # A single value behind a read/write lock.
///
/// # Example
/// ```
/// use taskpromise::Container;
///
/// let c = Container::new(vec![1, 2]);
/// c.set(|v| v.push(3));
/// assert_eq!(c.get(|v| v.len()), 3);
/// ```
#[derive(Debug, Default)]
pub struct Container<T> {
    data: RwLock<T>,
}

impl<T> Container<T> {
    /// Wraps `data`.
    pub fn new(data: T) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Reads the value through `f` under a shared lock.
    pub fn get<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&read(&self.data))
    }

    /// Updates the value in place through `f` under an exclusive lock.
    pub fn set(&self, f: impl FnOnce(&mut T)) {
        f(&mut write(&self.data));
    }

    /// Stores `data`, returning the previous value.
    pub fn replace(&self, data: T) -> T {
        std::mem::replace(&mut *write(&self.data), data)
    }

    /// Consumes the container and returns the value.
    pub fn into_inner(self) -> T {
        self.data
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
