//! Run-wide deduplication of discovered artifacts.

use crate::patterns::ArtifactType;
use parking_lot::Mutex;
use std::collections::HashSet;

/// A set of strings with an atomic insert-if-absent. Values are never removed.
#[derive(Debug, Default)]
pub struct UniqueSet {
    values: Mutex<HashSet<String>>,
}

impl UniqueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` if absent. Returns true when this call added it.
    pub fn insert(&self, value: &str) -> bool {
        self.insert_then(value, || {})
    }

    /// Insert `value` if absent and, only in that case, run `on_new` while the lock is
    /// still held. Concurrent callers never both see the same value as new, and `on_new`
    /// calls for one set are serialized in insertion order.
    pub fn insert_then<F: FnOnce()>(&self, value: &str, on_new: F) -> bool {
        let mut values = self.values.lock();
        if values.contains(value) {
            return false;
        }
        values.insert(value.to_string());
        on_new();
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.lock().contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents, sorted
    pub fn snapshot(&self) -> Vec<String> {
        let mut values: Vec<String> = self.values.lock().iter().cloned().collect();
        values.sort();
        values
    }
}

/// One independent unique set per artifact type. Each set has its own lock, so
/// contention on one type never blocks another.
#[derive(Debug, Default)]
pub struct AssetStore {
    urlpaths: UniqueSet,
    emails: UniqueSet,
    ips: UniqueSet,
    domains: UniqueSet,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, artifact_type: ArtifactType) -> &UniqueSet {
        match artifact_type {
            ArtifactType::UrlPath => &self.urlpaths,
            ArtifactType::Email => &self.emails,
            ArtifactType::Ip => &self.ips,
            ArtifactType::Domain => &self.domains,
        }
    }

    pub fn insert(&self, artifact_type: ArtifactType, value: &str) -> bool {
        self.set(artifact_type).insert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_insert_reports_first_time_only() {
        let set = UniqueSet::new();
        assert!(set.insert("a@b.com"));
        assert!(!set.insert("a@b.com"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_is_case_sensitive() {
        let set = UniqueSet::new();
        assert!(set.insert("Example.com"));
        assert!(set.insert("example.com"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_callback_runs_only_for_new_values() {
        let set = UniqueSet::new();
        let calls = AtomicUsize::new(0);
        set.insert_then("x", || {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        set.insert_then("x", || {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_inserts_of_same_value_win_once() {
        let set = UniqueSet::new();
        let wins = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        if set.insert("admin@corp.com") {
                            wins.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_types_are_independent() {
        let store = AssetStore::new();
        assert!(store.insert(ArtifactType::Domain, "1.2.3.4"));
        assert!(store.insert(ArtifactType::Ip, "1.2.3.4"));
        assert!(!store.insert(ArtifactType::Ip, "1.2.3.4"));
        assert_eq!(store.set(ArtifactType::Email).len(), 0);
    }

    #[test]
    fn test_urlpath_and_email_sets_are_separate() {
        let store = AssetStore::new();
        store.insert(ArtifactType::UrlPath, "http://a.b/c");
        assert!(store.set(ArtifactType::UrlPath).contains("http://a.b/c"));
        assert!(store.set(ArtifactType::Email).is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let set = UniqueSet::new();
        set.insert("c.com");
        set.insert("a.com");
        set.insert("b.com");
        assert_eq!(set.snapshot(), vec!["a.com", "b.com", "c.com"]);
    }
}
