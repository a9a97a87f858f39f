use std::ops::RangeBounds;
use std::sync::RwLock;

use super::{read, write};

/// # A `Vec` behind a read/write lock.
///
/// [`append`](SyncSlice::append) and [`slice`](SyncSlice::slice) return new wrappers and
/// leave the original untouched.
#[derive(Debug, Default)]
pub struct SyncSlice<V> {
    s: RwLock<Vec<V>>,
}

impl<V> SyncSlice<V> {
    /// Creates an empty slice.
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<V>
    where
        V: Clone,
    {
        read(&self.s).get(index).cloned()
    }

    /// Overwrites the element at `index`. Returns `false` when out of bounds.
    pub fn set(&self, index: usize, val: V) -> bool {
        match write(&self.s).get_mut(index) {
            Some(slot) => {
                *slot = val;
                true
            }
            None => false,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        read(&self.s).len()
    }

    /// Returns `true` when there are no elements.
    pub fn is_empty(&self) -> bool {
        read(&self.s).is_empty()
    }

    /// Returns a new wrapper holding the current elements followed by `vals`.
    pub fn append(&self, vals: impl IntoIterator<Item = V>) -> SyncSlice<V>
    where
        V: Clone,
    {
        let mut next = read(&self.s).clone();
        next.extend(vals);
        Self::from(next)
    }

    /// Returns a new wrapper holding a copy of `range`, or `None` when out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<SyncSlice<V>>
    where
        V: Clone,
    {
        let s = read(&self.s);
        let range = (range.start_bound().cloned(), range.end_bound().cloned());
        s.get(range).map(|part| Self::from(part.to_vec()))
    }

    /// Removes every element.
    pub fn clear(&self) {
        write(&self.s).clear();
    }

    /// Runs `f` on the vector under an exclusive lock.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Vec<V>) -> R) -> R {
        f(&mut write(&self.s))
    }

    /// Returns a copy of the elements.
    pub fn to_vec(&self) -> Vec<V>
    where
        V: Clone,
    {
        read(&self.s).clone()
    }
}

impl<V> From<Vec<V>> for SyncSlice<V> {
    fn from(s: Vec<V>) -> Self {
        Self { s: RwLock::new(s) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_slice_leave_original_untouched() {
        let s = SyncSlice::from(vec![1, 2, 3]);
        let longer = s.append([4, 5]);
        assert_eq!(s.to_vec(), vec![1, 2, 3]);
        assert_eq!(longer.to_vec(), vec![1, 2, 3, 4, 5]);

        let mid = longer.slice(1..3).unwrap();
        assert_eq!(mid.to_vec(), vec![2, 3]);
        assert!(longer.slice(4..9).is_none());
        assert_eq!(longer.slice(..).unwrap().len(), 5);
    }

    #[test]
    fn test_set_get_and_mutate() {
        let s = SyncSlice::new();
        assert!(!s.set(0, "a"));
        s.mutate(|v| v.push("a"));
        assert!(s.set(0, "b"));
        assert_eq!(s.get(0), Some("b"));
        assert_eq!(s.get(1), None);

        s.clear();
        assert!(s.is_empty());
    }
}
