//! Short-lived request cache used to suppress duplicate match requests

use crate::config::CacheConfig;
use crate::matching::{MatchRequest, MatchResponse};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum CacheState {
    Pending,
    Done(MatchResponse),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    state: CacheState,
    inserted_at: Instant,
}

/// Outcome of claiming a request fingerprint
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Nobody holds the key; the caller now owns it as pending
    Claimed,
    /// An identical request is still being computed
    InFlight,
    Hit(MatchResponse),
}

pub struct RequestCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl RequestCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    /// SHA-256 over the user and every parameter that changes the result
    pub fn fingerprint(request: &MatchRequest) -> String {
        let mut excluded = request.exclude_job_ids.clone();
        excluded.sort();
        excluded.dedup();

        let mut hasher = Sha256::new();
        hasher.update(request.user_identifier.trim().to_lowercase().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.top_k.to_le_bytes());
        hasher.update(request.min_similarity.to_bits().to_le_bytes());
        hasher.update(request.offset.to_le_bytes());
        hasher.update([request.randomize as u8]);
        for id in &excluded {
            hasher.update(id.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Claim `key`. With `reuse_done`, a finished response is returned instead of recomputing.
    pub fn begin(&self, key: &str, reuse_done: bool) -> CacheLookup {
        self.begin_at(key, reuse_done, Instant::now())
    }

    pub fn begin_at(&self, key: &str, reuse_done: bool, now: Instant) -> CacheLookup {
        let mut entries = self.entries.lock();
        Self::evict_expired_locked(&mut entries, self.ttl, now);

        if let Some(entry) = entries.get(key) {
            match &entry.state {
                CacheState::Pending => return CacheLookup::InFlight,
                CacheState::Done(response) if reuse_done => return CacheLookup::Hit(response.clone()),
                CacheState::Done(_) => {}
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                state: CacheState::Pending,
                inserted_at: now,
            },
        );
        Self::enforce_capacity(&mut entries, self.max_entries);
        CacheLookup::Claimed
    }

    pub fn complete(&self, key: &str, response: MatchResponse) {
        self.complete_at(key, response, Instant::now())
    }

    pub fn complete_at(&self, key: &str, response: MatchResponse, now: Instant) {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            CacheEntry {
                state: CacheState::Done(response),
                inserted_at: now,
            },
        );
        Self::enforce_capacity(&mut entries, self.max_entries);
    }

    /// Drop a pending claim after a failed computation so retries are not rejected
    pub fn abandon(&self, key: &str) {
        let mut entries = self.entries.lock();
        if matches!(entries.get(key), Some(CacheEntry { state: CacheState::Pending, .. })) {
            entries.remove(key);
        }
    }

    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    pub fn evict_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        Self::evict_expired_locked(&mut entries, self.ttl, now)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_expired_locked(entries: &mut HashMap<String, CacheEntry>, ttl: Duration, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("Evicted {} expired request cache entries", evicted);
        }
        evicted
    }

    /// Evict the oldest finished entries until within `max_entries`.
    ///
    /// Pending claims are never evicted here; they leave through `complete`,
    /// `abandon` or TTL expiry, so an in-flight request stays rejectable.
    fn enforce_capacity(entries: &mut HashMap<String, CacheEntry>, max_entries: usize) {
        while entries.len() > max_entries {
            let oldest_done = entries
                .iter()
                .filter(|(_, entry)| matches!(entry.state, CacheState::Done(_)))
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            match oldest_done {
                Some(key) => {
                    entries.remove(&key);
                }
                None => {
                    log::debug!(
                        "Request cache holds {} pending claims, above its {} entry bound",
                        entries.len(),
                        max_entries
                    );
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn response() -> MatchResponse {
        MatchResponse {
            matches: vec![],
            total_found: 0,
            total_jobs_analyzed: 3,
            has_more: false,
            next_offset: None,
            skipped_job_ids: vec![],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fingerprint_ignores_exclusion_order_and_email_case() {
        let mut a = MatchRequest::new("Dev@Example.com");
        a.exclude_job_ids = vec!["2".to_string(), "1".to_string()];
        let mut b = MatchRequest::new("dev@example.com");
        b.exclude_job_ids = vec!["1".to_string(), "2".to_string()];
        assert_eq!(RequestCache::fingerprint(&a), RequestCache::fingerprint(&b));

        b.offset = 30;
        assert_ne!(RequestCache::fingerprint(&a), RequestCache::fingerprint(&b));
    }

    #[test]
    fn test_pending_rejects_duplicates() {
        let cache = RequestCache::new(Duration::from_secs(60), 16);
        assert!(matches!(cache.begin("k", true), CacheLookup::Claimed));
        assert!(matches!(cache.begin("k", true), CacheLookup::InFlight));

        cache.complete("k", response());
        assert!(matches!(cache.begin("k", true), CacheLookup::Hit(r) if r.total_jobs_analyzed == 3));
        // Without reuse the key is claimed again for a fresh computation
        assert!(matches!(cache.begin("k", false), CacheLookup::Claimed));
        assert!(matches!(cache.begin("k", false), CacheLookup::InFlight));
    }

    #[test]
    fn test_abandon_releases_pending() {
        let cache = RequestCache::new(Duration::from_secs(60), 16);
        cache.begin("k", true);
        cache.abandon("k");
        assert!(cache.is_empty());
        assert!(matches!(cache.begin("k", true), CacheLookup::Claimed));
    }

    #[test]
    fn test_entries_expire() {
        let cache = RequestCache::new(Duration::from_secs(10), 16);
        let start = Instant::now();
        cache.begin_at("k", true, start);
        assert_eq!(cache.evict_expired_at(start + Duration::from_secs(5)), 0);
        assert!(matches!(
            cache.begin_at("k", true, start + Duration::from_secs(11)),
            CacheLookup::Claimed
        ));
    }

    #[test]
    fn test_capacity_evicts_oldest_finished() {
        let cache = RequestCache::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        cache.begin_at("a", true, start);
        cache.complete_at("a", response(), start);
        cache.begin_at("b", true, start + Duration::from_secs(1));
        cache.complete_at("b", response(), start + Duration::from_secs(1));
        cache.begin_at("c", true, start + Duration::from_secs(2));
        assert_eq!(cache.len(), 2);
        assert!(matches!(
            cache.begin_at("a", true, start + Duration::from_secs(3)),
            CacheLookup::Claimed
        ));
    }

    #[test]
    fn test_capacity_keeps_in_flight_claims() {
        let cache = RequestCache::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        cache.begin_at("inflight", true, start);
        cache.begin_at("b", true, start + Duration::from_secs(1));
        cache.begin_at("c", true, start + Duration::from_secs(2));
        assert!(matches!(
            cache.begin_at("inflight", true, start + Duration::from_secs(3)),
            CacheLookup::InFlight
        ));

        // A finished entry is the one that makes room
        cache.complete_at("b", response(), start + Duration::from_secs(4));
        cache.begin_at("d", true, start + Duration::from_secs(5));
        assert!(matches!(
            cache.begin_at("inflight", true, start + Duration::from_secs(6)),
            CacheLookup::InFlight
        ));
        assert!(matches!(
            cache.begin_at("b", true, start + Duration::from_secs(7)),
            CacheLookup::Claimed
        ));
    }
}
