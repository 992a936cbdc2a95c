use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

static GLOBAL: OnceLock<Arc<TokenCache>> = OnceLock::new();

/// Short random token -> chosen mirror URL, read back when a button is clicked.
///
/// Bounded in both size and age. Once `capacity` entries exist the oldest is
/// dropped to make room, and entries older than `ttl` are never returned.
#[derive(Debug)]
pub struct TokenCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    urls: HashMap<String, (String, Instant)>,
    // insertion order, oldest first
    order: VecDeque<String>,
}

impl Inner {
    fn evict_expired(&mut self, now: Instant, ttl: Duration) {
        while let Some(token) = self.order.front() {
            let expired = self
                .urls
                .get(token)
                .map(|(_, at)| now.duration_since(*at) >= ttl)
                .unwrap_or(true);
            if !expired {
                break;
            }
            if let Some(token) = self.order.pop_front() {
                self.urls.remove(&token);
            }
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(token) = self.order.pop_front() {
            self.urls.remove(&token);
        }
    }
}

impl TokenCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Process-wide cache sized from the user settings
    pub fn global() -> Arc<TokenCache> {
        GLOBAL
            .get_or_init(|| {
                let settings = crate::config::settings();
                Arc::new(TokenCache::new(settings.cache_capacity, settings.cache_ttl()))
            })
            .clone()
    }

    /// Store `url` under a fresh 8-character hex token and return the token
    pub fn insert(&self, url: impl Into<String>) -> String {
        let url = url.into();
        let now = Instant::now();
        let mut inner = self.lock();

        inner.evict_expired(now, self.ttl);
        while inner.urls.len() >= self.capacity {
            inner.evict_oldest();
        }

        let mut rng = rand::rng();
        let token = loop {
            let candidate = format!("{:08x}", rng.random::<u32>());
            if !inner.urls.contains_key(&candidate) {
                break candidate;
            }
        };

        inner.urls.insert(token.clone(), (url, now));
        inner.order.push_back(token.clone());
        token
    }

    pub fn get(&self, token: &str) -> Option<String> {
        let inner = self.lock();
        inner
            .urls
            .get(token)
            .filter(|(_, at)| at.elapsed() < self.ttl)
            .map(|(url, _)| url.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().urls.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = TokenCache::new(16, Duration::from_secs(60));
        assert!(cache.is_empty());
        let token = cache.insert("https://example.org/a.zip");

        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(cache.get(&token).as_deref(), Some("https://example.org/a.zip"));
        assert_eq!(cache.get("deadbeef-not-a-token"), None);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let cache = TokenCache::new(1000, Duration::from_secs(60));
        let tokens: std::collections::HashSet<String> =
            (0..500).map(|i| cache.insert(format!("u{}", i))).collect();
        assert_eq!(tokens.len(), 500);
        assert_eq!(cache.len(), 500);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = TokenCache::new(2, Duration::from_secs(60));
        let first = cache.insert("one");
        let second = cache.insert("two");
        let third = cache.insert("three");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&first), None);
        assert_eq!(cache.get(&second).as_deref(), Some("two"));
        assert_eq!(cache.get(&third).as_deref(), Some("three"));
    }

    #[test]
    fn test_expired_entries() {
        let cache = TokenCache::new(16, Duration::ZERO);
        let token = cache.insert("gone");
        assert_eq!(cache.get(&token), None);

        // Expired entries are dropped on the next insert
        cache.insert("also gone");
        assert_eq!(cache.len(), 1);
    }
}
