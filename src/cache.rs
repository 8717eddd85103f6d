//! The result cache: committed render props, keyed by location fingerprint.
//!
//! The underlying map is replaced wholesale on every write. A reader holding
//! the map returned by [`ResultCache::get`] always sees a complete snapshot,
//! never a partially updated one, and a `set` call's swap is visible to
//! `get` before any subscriber is notified.
//!
//! Entries are never evicted; the cache lives as long as the process. Stale
//! entries are what makes stale-while-loading possible.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::screen::Props;

/// The props committed for one location fingerprint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CachedEntry {
    /// Props for the layout's render capability. Empty when the route has no
    /// layout or the layout has no load.
    pub layout_props: Props,
    /// Props for the screen's render capability.
    pub screen_props: Props,
}

/// The full cache map, fingerprint to committed entry.
pub type CacheMap = BTreeMap<String, CachedEntry>;

/// Identifies a cache subscription, for [`ResultCache::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(usize);

struct CacheInner {
    entries: RwLock<Arc<CacheMap>>,
    subscribers: RwLock<Vec<(usize, Arc<dyn Fn()>)>>,
    next_id: AtomicUsize,
}

/// A keyed, subscribable store of committed render props.
///
/// Cloning yields another handle to the same store.
///
/// ```rust
/// # use signpost::prelude::*;
/// let cache = ResultCache::new();
/// cache.set("fp", CachedEntry::default());
/// assert!(cache.get().contains_key("fp"));
/// ```
#[derive(Clone)]
pub struct ResultCache {
    inner: Arc<CacheInner>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(Arc::new(CacheMap::new())),
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Get the current full map.
    #[must_use]
    pub fn get(&self) -> Arc<CacheMap> {
        self.inner.entries.read().unwrap().clone()
    }

    /// Commit `value` under `key`, then notify every subscriber.
    ///
    /// The map is copied, updated and swapped before any subscriber runs, so
    /// subscribers re-reading via [`get`](Self::get) always observe the new
    /// entry. Every call produces one notification round; rapid calls are
    /// not coalesced.
    pub fn set(&self, key: impl Into<String>, value: CachedEntry) {
        {
            let mut entries = self.inner.entries.write().unwrap();
            let mut next = CacheMap::clone(&entries);
            next.insert(key.into(), value);
            *entries = Arc::new(next);
        }

        let subscribers: Vec<Arc<dyn Fn()>> = self
            .inner
            .subscribers
            .read()
            .unwrap()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in subscribers {
            callback();
        }
    }

    /// Register `callback` to run after every commit.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .write()
            .unwrap()
            .push((id, Arc::new(callback)));
        SubscriptionId(id)
    }

    /// Remove a subscription. Idempotent.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .write()
            .unwrap()
            .retain(|(sub, _)| *sub != id.0);
    }
}
