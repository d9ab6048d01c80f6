use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OwnedMutexGuard;

use crate::models::{QuestionType, ValidRequest};

pub const DEFAULT_TTL_SECS: u64 = 300;
pub const DEFAULT_CAPACITY: usize = 100;

/// Identifies one logical question pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub class_name: String,
    pub course_name: String,
    pub section: String,
    pub subsection: String,
    pub language: String,
    pub question_type: QuestionType,
    pub difficulty: String,
}

impl Fingerprint {
    pub fn from_request(req: &ValidRequest) -> Self {
        Self {
            class_name: req.class_name.clone(),
            course_name: req.course_name.clone(),
            section: req.section.clone(),
            subsection: req.subsection.clone(),
            language: req.language.clone(),
            question_type: req.question_type,
            difficulty: req.difficulty.clone(),
        }
    }

    // Cache key: hash of every field, unit-separated so fields cannot bleed into each other
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.class_name.as_str(),
            self.course_name.as_str(),
            self.section.as_str(),
            self.subsection.as_str(),
            self.language.as_str(),
            self.question_type.as_str(),
            self.difficulty.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(b"\x1f");
        }
        format!("{:x}", hasher.finalize())
    }
}

// Seen-set with the time it was last written
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub seen: HashSet<String>,
    pub written_at: DateTime<Utc>,
}

/// Questions already served per fingerprint, bounded in size and age.
///
/// Every operation takes the one lock for its whole duration. Entries older
/// than the TTL are only dropped by [`QuestionCache::sweep`]; on overflow the
/// least recently used entry is evicted.
pub struct QuestionCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl QuestionCache {
    pub fn new(capacity: usize, ttl: std::time::Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every entry last written before `now - ttl`. Returns how many went.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| now.signed_duration_since(entry.written_at) > self.ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }
        if !expired.is_empty() {
            tracing::debug!(removed = expired.len(), remaining = entries.len(), "swept question cache");
        }
        expired.len()
    }

    /// Seen-set for `fingerprint`, empty when there is none.
    pub fn get(&self, fingerprint: &Fingerprint) -> HashSet<String> {
        self.entries()
            .get(&fingerprint.digest())
            .map(|entry| entry.seen.clone())
            .unwrap_or_default()
    }

    pub fn put(&self, fingerprint: &Fingerprint, seen: HashSet<String>, now: DateTime<Utc>) {
        self.entries().put(
            fingerprint.digest(),
            CacheEntry {
                seen,
                written_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QuestionCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAPACITY,
            std::time::Duration::from_secs(DEFAULT_TTL_SECS),
        )
    }
}

/// One async lock per fingerprint, held across a whole generation run so
/// two runs for the same pool never both start from the same seen-set.
#[derive(Clone, Default)]
pub struct FingerprintLocks {
    locks: Arc<DashMap<String, LockSlot>>,
}

#[derive(Default)]
struct LockSlot {
    mutex: Arc<tokio::sync::Mutex<()>>,
    // runs holding or waiting on the mutex; only changed under the shard lock
    users: AtomicUsize,
}

/// Releases the fingerprint lock on drop, also when the wait was cancelled.
pub struct FingerprintGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<String, LockSlot>>,
}

impl FingerprintLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, fingerprint: &Fingerprint) -> FingerprintGuard {
        let key = fingerprint.digest();
        let mutex = {
            let slot = self.locks.entry(key.clone()).or_default();
            slot.users.fetch_add(1, Ordering::SeqCst);
            Arc::clone(&slot.mutex)
        };

        let mut guard = FingerprintGuard {
            key,
            guard: None,
            locks: Arc::clone(&self.locks),
        };
        guard.guard = Some(mutex.lock_owned().await);
        guard
    }

    /// Number of fingerprints currently locked or waited on.
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for FingerprintGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.remove_if(&self.key, |_, slot| {
            slot.users.fetch_sub(1, Ordering::SeqCst) == 1
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn fingerprint(section: &str) -> Fingerprint {
        Fingerprint {
            class_name: "Class 9".into(),
            course_name: "Physics".into(),
            section: section.into(),
            subsection: "Basics".into(),
            language: "English".into(),
            question_type: QuestionType::Mcq,
            difficulty: "Easy".into(),
        }
    }

    fn seen(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_digest_is_stable_and_field_sensitive() {
        assert_eq!(fingerprint("Motion").digest(), fingerprint("Motion").digest());
        assert_ne!(fingerprint("Motion").digest(), fingerprint("Force").digest());

        let mut shifted = fingerprint("Motion");
        shifted.class_name = "Class 9P".into();
        shifted.course_name = "hysics".into();
        assert_ne!(shifted.digest(), fingerprint("Motion").digest());
    }

    #[test]
    fn test_get_absent_is_empty() {
        let cache = QuestionCache::default();
        assert!(cache.get(&fingerprint("Motion")).is_empty());
    }

    #[test]
    fn test_put_replaces_seen_set() {
        let cache = QuestionCache::default();
        let fp = fingerprint("Motion");
        let now = Utc::now();
        cache.put(&fp, seen(&["a"]), now);
        cache.put(&fp, seen(&["a", "b"]), now);
        assert_eq!(cache.get(&fp), seen(&["a", "b"]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_removes_exactly_the_expired() {
        let cache = QuestionCache::new(10, StdDuration::from_secs(300));
        let now = Utc::now();
        let stale = fingerprint("Stale");
        let edge = fingerprint("Edge");
        let fresh = fingerprint("Fresh");
        cache.put(&stale, seen(&["old"]), now - Duration::seconds(301));
        cache.put(&edge, seen(&["edge"]), now - Duration::seconds(300));
        cache.put(&fresh, seen(&["new"]), now - Duration::seconds(10));

        assert_eq!(cache.sweep(now), 1);
        assert!(cache.get(&stale).is_empty());
        assert_eq!(cache.get(&edge), seen(&["edge"]));
        assert_eq!(cache.get(&fresh), seen(&["new"]));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = QuestionCache::new(2, StdDuration::from_secs(300));
        let now = Utc::now();
        cache.put(&fingerprint("A"), seen(&["a"]), now);
        cache.put(&fingerprint("B"), seen(&["b"]), now);
        // touch A so B becomes the eviction candidate
        let _ = cache.get(&fingerprint("A"));
        cache.put(&fingerprint("C"), seen(&["c"]), now);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&fingerprint("B")).is_empty());
        assert_eq!(cache.get(&fingerprint("A")), seen(&["a"]));
    }

    #[tokio::test]
    async fn test_locks_serialize_same_fingerprint() {
        let locks = FingerprintLocks::new();
        let fp = fingerprint("Motion");

        let first = locks.acquire(&fp).await;
        let waiter = {
            let locks = locks.clone();
            let fp = fp.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&fp).await;
            })
        };
        tokio::time::sleep(StdDuration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        waiter.await.unwrap();
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_lock_entry() {
        let locks = FingerprintLocks::new();
        let fp = fingerprint("Motion");

        let holder = locks.acquire(&fp).await;
        let waited = tokio::time::timeout(StdDuration::from_millis(20), locks.acquire(&fp)).await;
        assert!(waited.is_err());
        assert_eq!(locks.active(), 1);

        drop(holder);
        assert_eq!(locks.active(), 0);

        // the fingerprint is still usable afterwards
        let _again = locks.acquire(&fp).await;
        assert_eq!(locks.active(), 1);
    }

    #[tokio::test]
    async fn test_locks_do_not_block_other_fingerprints() {
        let locks = FingerprintLocks::new();
        let _a = locks.acquire(&fingerprint("A")).await;
        let _b = locks.acquire(&fingerprint("B")).await;
        assert_eq!(locks.active(), 2);
    }
}
