//! Result cache with time-based expiry and a "known empty" sentinel
//!
//! Entries live in named groups and expire after a TTL. An entry is either a
//! JSON payload or [`CachedValue::Empty`], which records that a lookup was
//! already made and found nothing, so callers can skip the expensive query
//! until the entry expires.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::translation::error::CacheError;

/// A cache entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    /// The lookup was made and returned nothing
    Empty,
    /// Serialized result
    Payload(String),
}

/// Outcome of a typed cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Miss,
    Empty,
    Hit(T),
}

/// TTL cache keyed by (group, key)
#[cfg_attr(test, automock)]
pub trait ResultCache: Send + Sync {
    /// Returns `None` when the entry is absent or expired
    fn get(&self, group: &str, key: &str) -> Result<Option<CachedValue>, CacheError>;

    /// Insert or overwrite an entry
    fn set(
        &self,
        group: &str,
        key: &str,
        value: &CachedValue,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

/// Read and deserialize a cache entry.
///
/// Cache failures and undecodable payloads degrade to a miss.
pub fn load<T: DeserializeOwned>(cache: &dyn ResultCache, group: &str, key: &str) -> CacheLookup<T> {
    let value = match cache.get(group, key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Cache read failed for {}/{}: {}", group, key, e);
            return CacheLookup::Miss;
        }
    };

    match value {
        None => CacheLookup::Miss,
        Some(CachedValue::Empty) => CacheLookup::Empty,
        Some(CachedValue::Payload(json)) => match serde_json::from_str(&json) {
            Ok(decoded) => CacheLookup::Hit(decoded),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}/{}: {}", group, key, e);
                CacheLookup::Miss
            }
        },
    }
}

/// Serialize and store a result, writing the empty sentinel for empty slices.
///
/// Failures are logged and otherwise ignored.
pub fn store<T: Serialize>(
    cache: &dyn ResultCache,
    group: &str,
    key: &str,
    items: &[T],
    ttl: Duration,
) {
    let value = if items.is_empty() {
        CachedValue::Empty
    } else {
        match serde_json::to_string(items) {
            Ok(json) => CachedValue::Payload(json),
            Err(e) => {
                warn!("Failed to encode cache entry {}/{}: {}", group, key, e);
                return;
            }
        }
    };

    let _ = cache
        .set(group, key, &value, ttl)
        .inspect_err(|e| warn!("Cache write failed for {}/{}: {}", group, key, e));
}

/// Get current timestamp in milliseconds since UNIX epoch
fn current_timestamp_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// SQLite-backed cache shared between processes
pub struct SqliteResultCache {
    conn: Mutex<Connection>,
}

impl SqliteResultCache {
    pub fn open(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing result cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.create_schema()?;
        Ok(cache)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                cache_group TEXT NOT NULL,
                cache_key TEXT NOT NULL,
                payload TEXT,
                empty INTEGER NOT NULL DEFAULT 0,
                expires_at INTEGER NOT NULL,
                PRIMARY KEY (cache_group, cache_key)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cache_expires_at ON cache_entries(expires_at)",
            [],
        )?;

        Ok(())
    }

    /// Delete expired entries, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = current_timestamp_ms();
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM cache_entries WHERE expires_at <= ?1", [now])?;
        debug!("Purged {} expired cache entries", removed);
        Ok(removed)
    }
}

impl ResultCache for SqliteResultCache {
    fn get(&self, group: &str, key: &str) -> Result<Option<CachedValue>, CacheError> {
        let now = current_timestamp_ms();
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            r#"
            SELECT payload, empty FROM cache_entries
            WHERE cache_group = ?1 AND cache_key = ?2 AND expires_at > ?3
            "#,
            (group, key, now),
            |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, bool>(1)?)),
        );

        match result {
            Ok((_, true)) => Ok(Some(CachedValue::Empty)),
            Ok((Some(payload), false)) => Ok(Some(CachedValue::Payload(payload))),
            Ok((None, false)) => Ok(None),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(
        &self,
        group: &str,
        key: &str,
        value: &CachedValue,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = current_timestamp_ms().saturating_add(ttl_ms);
        let (payload, empty) = match value {
            CachedValue::Empty => (None, true),
            CachedValue::Payload(json) => (Some(json.as_str()), false),
        };

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO cache_entries (cache_group, cache_key, payload, empty, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(cache_group, cache_key) DO UPDATE SET
                payload = excluded.payload,
                empty = excluded.empty,
                expires_at = excluded.expires_at
            "#,
            (group, key, payload, empty, expires_at),
        )?;

        Ok(())
    }
}

const MAX_MEMORY_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Process-local cache
#[derive(Default)]
pub struct MemoryResultCache {
    entries: Mutex<HashMap<(String, String), (CachedValue, Instant)>>,
}

impl MemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<(String, String), (CachedValue, Instant)>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::LockPoisoned)
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, group: &str, key: &str) -> Result<Option<CachedValue>, CacheError> {
        let mut entries = self.lock_entries()?;
        let entry_key = (group.to_string(), key.to_string());

        match entries.get(&entry_key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(&entry_key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(
        &self,
        group: &str,
        key: &str,
        value: &CachedValue,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self.lock_entries()?;
        let now = Instant::now();
        // TTLs past what Instant can represent are capped at a century
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(MAX_MEMORY_TTL))
            .unwrap_or(now);
        entries.insert(
            (group.to_string(), key.to_string()),
            (value.clone(), expires_at),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const TTL: Duration = Duration::from_secs(900);

    fn sqlite_cache(temp_dir: &TempDir) -> SqliteResultCache {
        SqliteResultCache::open(&temp_dir.path().join("cache.db")).unwrap()
    }

    #[rstest]
    #[case(CachedValue::Empty)]
    #[case(CachedValue::Payload(r#"["de_DE"]"#.to_string()))]
    fn sqlite_cache_returns_stored_value(#[case] value: CachedValue) {
        let temp_dir = TempDir::new().unwrap();
        let cache = sqlite_cache(&temp_dir);

        cache.set("group", "key", &value, TTL).unwrap();

        assert_eq!(cache.get("group", "key").unwrap(), Some(value));
    }

    #[test]
    fn sqlite_cache_separates_groups() {
        let temp_dir = TempDir::new().unwrap();
        let cache = sqlite_cache(&temp_dir);

        cache.set("a", "key", &CachedValue::Empty, TTL).unwrap();

        assert_eq!(cache.get("b", "key").unwrap(), None);
    }

    #[test]
    fn sqlite_cache_expires_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = sqlite_cache(&temp_dir);

        cache
            .set("group", "key", &CachedValue::Empty, Duration::ZERO)
            .unwrap();

        assert_eq!(cache.get("group", "key").unwrap(), None);
        assert_eq!(cache.purge_expired().unwrap(), 1);
    }

    #[test]
    fn sqlite_cache_last_writer_wins() {
        let temp_dir = TempDir::new().unwrap();
        let cache = sqlite_cache(&temp_dir);

        cache.set("group", "key", &CachedValue::Empty, TTL).unwrap();
        cache
            .set("group", "key", &CachedValue::Payload("[1]".to_string()), TTL)
            .unwrap();

        assert_eq!(
            cache.get("group", "key").unwrap(),
            Some(CachedValue::Payload("[1]".to_string()))
        );
    }

    #[test]
    fn memory_cache_expires_entries() {
        let cache = MemoryResultCache::new();

        cache
            .set("group", "key", &CachedValue::Empty, Duration::ZERO)
            .unwrap();
        cache
            .set("group", "fresh", &CachedValue::Empty, TTL)
            .unwrap();

        assert_eq!(cache.get("group", "key").unwrap(), None);
        assert_eq!(cache.get("group", "fresh").unwrap(), Some(CachedValue::Empty));
    }

    #[test]
    fn sqlite_cache_keeps_entries_with_huge_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let cache = sqlite_cache(&temp_dir);

        cache
            .set("group", "key", &CachedValue::Empty, Duration::MAX)
            .unwrap();

        assert_eq!(cache.get("group", "key").unwrap(), Some(CachedValue::Empty));
        assert_eq!(cache.purge_expired().unwrap(), 0);
    }

    #[test]
    fn memory_cache_keeps_entries_with_huge_ttl() {
        let cache = MemoryResultCache::new();

        cache
            .set("group", "key", &CachedValue::Empty, Duration::from_secs(u64::MAX))
            .unwrap();

        assert_eq!(cache.get("group", "key").unwrap(), Some(CachedValue::Empty));
    }

    #[test]
    fn store_writes_sentinel_for_empty_results() {
        let cache = MemoryResultCache::new();

        store::<String>(&cache, "group", "key", &[], TTL);

        assert_eq!(load::<Vec<String>>(&cache, "group", "key"), CacheLookup::Empty);
    }

    #[test]
    fn store_then_load_returns_items() {
        let cache = MemoryResultCache::new();

        store(&cache, "group", "key", &["5.2".to_string()], TTL);

        assert_eq!(
            load::<Vec<String>>(&cache, "group", "key"),
            CacheLookup::Hit(vec!["5.2".to_string()])
        );
    }

    #[test]
    fn load_treats_undecodable_payload_as_miss() {
        let cache = MemoryResultCache::new();
        cache
            .set("group", "key", &CachedValue::Payload("{not json".to_string()), TTL)
            .unwrap();

        assert_eq!(load::<Vec<String>>(&cache, "group", "key"), CacheLookup::Miss);
    }

    #[test]
    fn load_treats_cache_errors_as_miss() {
        let mut cache = MockResultCache::new();
        cache
            .expect_get()
            .returning(|_, _| Err(CacheError::LockPoisoned));

        assert_eq!(load::<Vec<String>>(&cache, "group", "key"), CacheLookup::Miss);
    }
}
