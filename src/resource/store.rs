//! Concurrent keyed storage for byte providers.
//!
//! # Layout
//!
//! ```text
//! KeyedStore<K>
//! └── RwLock<FxHashMap<K, ByteProvider>>
//!     ├── put / remove / extend  ── exclusive, one structural write each
//!     └── get / keys / entries   ── shared, cloned out before the lock drops
//! ```
//!
//! Every operation takes the map lock for its own duration only, so the
//! store is safe to share between threads with no external locking.
//! Nothing is borrowed out of the map: lookups return cloned providers and
//! enumeration returns an owned snapshot.

use std::fmt;
use std::hash::Hash;

use bytes::Bytes;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::provider::ByteProvider;

/// A thread-safe map from keys to [`ByteProvider`]s.
pub struct KeyedStore<K> {
    entries: RwLock<FxHashMap<K, ByteProvider>>,
}

impl<K> KeyedStore<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Insert or replace the content under `key`, returning the bytes.
    pub fn put(&self, key: K, bytes: impl Into<Bytes>) -> Bytes {
        let bytes = bytes.into();
        self.entries
            .write()
            .insert(key, ByteProvider::Memory(bytes.clone()));
        bytes
    }

    /// Insert or replace an arbitrary provider under `key`.
    pub fn put_provider(&self, key: K, provider: ByteProvider) {
        self.entries.write().insert(key, provider);
    }

    /// Insert a batch of entries under a single write.
    ///
    /// Readers observe either none or all of the batch. Later duplicates in
    /// the batch win over earlier ones.
    pub fn extend(&self, batch: impl IntoIterator<Item = (K, ByteProvider)>) {
        self.entries.write().extend(batch);
    }

    /// Look up the provider stored under `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<ByteProvider> {
        self.entries.read().get(key).cloned()
    }

    /// Remove `key`. Returns `true` if an entry was present.
    pub fn remove(&self, key: &K) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Check whether `key` is present.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Snapshot of the keys present right now.
    ///
    /// The returned vector can be iterated any number of times; it does not
    /// follow mutations made after this call.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    /// Snapshot of all entries present right now.
    pub fn entries(&self) -> Vec<(K, ByteProvider)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the entries whose key satisfies `filter`.
    pub fn entries_where(&self, mut filter: impl FnMut(&K) -> bool) -> Vec<(K, ByteProvider)> {
        self.entries
            .read()
            .iter()
            .filter(|(k, _)| filter(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<K> Default for KeyedStore<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for KeyedStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("len", &self.entries.read().len())
            .finish()
    }
}
