//! Type-keyed, write-once descriptor cache.
//!
//! Readers load an immutable snapshot of the map and never block. Writers
//! serialize on a mutex, copy the snapshot, insert and publish the copy.
//! An entry is never replaced once published: a racing store returns the
//! entry that got there first.

use std::any::TypeId;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use twox_hash::XxHash64;

/// Hasher used for `TypeId` keys.
pub(crate) type TypeHasher = BuildHasherDefault<XxHash64>;

type Snapshot<V> = HashMap<TypeId, V, TypeHasher>;

/// Concurrent map from type identity to a published value.
pub(crate) struct TypeCache<V> {
    entries: ArcSwap<Snapshot<V>>,
    publish: Mutex<()>,
}

impl<V: Clone> TypeCache<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Snapshot::default()),
            publish: Mutex::new(()),
        }
    }

    /// Returns the published value for `key`, if any.
    pub(crate) fn retrieve(&self, key: TypeId) -> Option<V> {
        self.entries.load().get(&key).cloned()
    }

    /// Publishes `value` under `key` unless an entry already exists.
    ///
    /// Returns the value that is published after the call, which is the
    /// earlier entry when this store lost a race.
    pub(crate) fn store(&self, key: TypeId, value: V) -> V {
        if let Some(existing) = self.retrieve(key) {
            return existing;
        }

        let _guard = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.entries.load_full();
        if let Some(existing) = current.get(&key) {
            return existing.clone();
        }

        let mut next = Snapshot::clone(&current);
        next.insert(key, value.clone());
        self.entries.store(Arc::new(next));
        value
    }

    /// Number of published entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.load().len()
    }
}

impl<V: Clone> Default for TypeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn retrieve_misses_until_stored() {
        let cache: TypeCache<Arc<str>> = TypeCache::new();
        let key = TypeId::of::<u8>();
        assert!(cache.retrieve(key).is_none());

        let stored = cache.store(key, Arc::from("first"));
        assert_eq!(&*stored, "first");
        assert_eq!(cache.retrieve(key).as_deref(), Some("first"));
    }

    #[test]
    fn first_store_wins() {
        let cache: TypeCache<Arc<str>> = TypeCache::new();
        let key = TypeId::of::<String>();
        cache.store(key, Arc::from("first"));
        let second = cache.store(key, Arc::from("second"));
        assert_eq!(&*second, "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn racing_stores_agree_on_one_entry() {
        let cache = Arc::new(TypeCache::<usize>::new());
        let barrier = Arc::new(Barrier::new(8));
        let key = TypeId::of::<i64>();

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.store(key, n)
                })
            })
            .collect();

        let results: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();
        let winner = cache.retrieve(key).expect("stored");
        assert!(results.iter().all(|&r| r == winner));
    }
}
