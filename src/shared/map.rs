use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use super::{read, write};

/// # A `HashMap` behind a read/write lock.
///
/// # Example
/// ```
/// use taskpromise::SyncMap;
///
/// let m = SyncMap::new();
/// assert_eq!(m.set("a", 1), None);
/// assert_eq!(m.set("a", 2), Some(1));
/// assert_eq!(m.get(&"a"), Some(2));
/// assert_eq!(m.del(&"a"), Some(2));
/// assert!(m.is_empty());
/// ```
#[derive(Debug)]
pub struct SyncMap<K, V> {
    m: RwLock<HashMap<K, V>>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::from(HashMap::new())
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        read(&self.m).get(key).cloned()
    }

    /// Stores `val` under `key`, returning the previous value.
    pub fn set(&self, key: K, val: V) -> Option<V> {
        write(&self.m).insert(key, val)
    }

    /// Removes `key`, returning its value.
    pub fn del(&self, key: &K) -> Option<V> {
        write(&self.m).remove(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        write(&self.m).clear();
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        read(&self.m).len()
    }

    /// Returns `true` when there are no elements.
    pub fn is_empty(&self) -> bool {
        read(&self.m).is_empty()
    }

    /// Runs `f` on the map under an exclusive lock.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        f(&mut write(&self.m))
    }
}

impl<K, V> From<HashMap<K, V>> for SyncMap<K, V> {
    fn from(m: HashMap<K, V>) -> Self {
        Self { m: RwLock::new(m) }
    }
}

impl<K, V> Default for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
