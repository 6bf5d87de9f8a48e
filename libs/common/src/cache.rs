//! In-process cache with per-entry TTL
//!
//! Used for reference data that rarely changes (categories, positions,
//! seasons, teams). Expiry is lazy: an entry is only dropped when it is read
//! after its deadline or explicitly invalidated. There is no size bound; the
//! key space is one entry per cacheable path.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live for cached lookups (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Longest lifetime any entry gets (1 day)
pub const MAX_TTL: Duration = Duration::from_secs(86_400);

/// Configuration for the lookup cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live applied when `set` is called without an explicit TTL
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new CacheConfig from environment variables
    ///
    /// # Environment Variables
    /// - `LOOKUP_CACHE_TTL_SECS`: default entry lifetime in seconds (default: 300,
    ///   capped at `MAX_TTL`)
    pub fn from_env() -> Result<Self> {
        let default_ttl = std::env::var("LOOKUP_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL)
            .min(MAX_TTL);

        Ok(CacheConfig { default_ttl })
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value store with lazy expiry, cheap to clone and share
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    config: CacheConfig,
    entries: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get a live value. An expired entry is removed and reported as absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
            debug!("Cache entry expired: {}", key);
        }

        None
    }

    /// Store a value with an optional TTL (falls back to the configured
    /// default). Lifetimes are capped at `MAX_TTL`.
    pub async fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.config.default_ttl).min(MAX_TTL);
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Drop every entry whose key starts with `pattern`, or everything when
    /// no pattern is given. Returns the number of entries removed.
    pub async fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();

        match pattern {
            Some(prefix) => entries.retain(|key, _| !key.starts_with(prefix)),
            None => entries.clear(),
        }

        let removed = before - entries.len();
        if removed > 0 {
            debug!("Invalidated {} cache entries (pattern: {:?})", removed, pattern);
        }
        removed
    }

    /// Number of stored entries, expired ones included until they are read
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// The TTL used when `set` gets `None`
    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<String> {
        TtlCache::new(CacheConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_get_before_expiry() {
        let cache = cache();
        cache.set("/categories", "u12".to_string(), None).await;

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("/categories").await, Some("u12".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_after_expiry_is_absent_and_removed() {
        let cache = cache();
        cache
            .set("/seasons", "2025".to_string(), Some(Duration::from_secs(10)))
            .await;
        assert_eq!(cache.len().await, 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get("/seasons").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_deadline() {
        let cache = cache();
        cache
            .set("/teams", "a".to_string(), Some(Duration::from_secs(5)))
            .await;
        tokio::time::advance(Duration::from_secs(4)).await;
        cache
            .set("/teams", "b".to_string(), Some(Duration::from_secs(5)))
            .await;
        tokio::time::advance(Duration::from_secs(4)).await;

        assert_eq!(cache.get("/teams").await, Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_invalidate_by_prefix_and_all() {
        let cache = cache();
        cache.set("/teams", "all".to_string(), None).await;
        cache.set("/teams/7", "one".to_string(), None).await;
        cache.set("/categories", "cats".to_string(), None).await;

        assert_eq!(cache.invalidate(Some("/teams")).await, 2);
        assert_eq!(cache.get("/teams").await, None);
        assert_eq!(cache.get("/categories").await, Some("cats".to_string()));

        assert_eq!(cache.invalidate(None).await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_capped() {
        let cache = TtlCache::new(CacheConfig {
            default_ttl: Duration::MAX,
        });
        cache.set("/categories", "cats".to_string(), None).await;
        cache
            .set("/seasons", "2025".to_string(), Some(Duration::MAX))
            .await;

        tokio::time::advance(MAX_TTL - Duration::from_secs(1)).await;
        assert!(cache.get("/categories").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("/categories").await.is_none());
        assert!(cache.get("/seasons").await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = cache();
        let other = cache.clone();
        cache.set("/seasons", "2025".to_string(), None).await;

        assert_eq!(other.get("/seasons").await, Some("2025".to_string()));
    }
}
