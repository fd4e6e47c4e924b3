//! Record store and service fixtures

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use langpack_resolver::config::ResolverConfig;
use langpack_resolver::service::{Collaborators, TranslationService};
use langpack_resolver::translation::availability::PackageAvailability;
use langpack_resolver::translation::cache::{MemoryResultCache, ResultCache};
use langpack_resolver::translation::error::StoreError;
use langpack_resolver::translation::locale::StaticLocaleResolver;
use langpack_resolver::translation::store::{RecordStore, SqliteRecordStore};
use langpack_resolver::translation::types::{ProjectType, TranslationRecord, VersionCandidate};
use langpack_resolver::version::WpVersionOrdering;

pub fn record(language: &str, version: &str, updated: &str) -> TranslationRecord {
    TranslationRecord {
        language: language.to_string(),
        version: version.to_string(),
        updated: updated.to_string(),
    }
}

/// Record store that counts queries and can be switched to failing
#[derive(Default)]
pub struct CountingRecordStore {
    rows: Vec<(ProjectType, String, TranslationRecord)>,
    failing: bool,
    active_calls: AtomicUsize,
    language_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, project_type: ProjectType, domain: &str, record: TranslationRecord) -> Self {
        self.rows.push((project_type, domain.to_string(), record));
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn active_calls(&self) -> usize {
        self.active_calls.load(Ordering::SeqCst)
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    fn matching<'a>(
        &'a self,
        project_type: ProjectType,
        domain: &'a str,
    ) -> impl Iterator<Item = &'a TranslationRecord> + 'a {
        self.rows
            .iter()
            .filter(move |(t, d, _)| *t == project_type && d == domain)
            .map(|(_, _, r)| r)
    }
}

impl RecordStore for CountingRecordStore {
    fn active_records(
        &self,
        project_type: ProjectType,
        domain: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        self.active_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::LockPoisoned);
        }
        Ok(self.matching(project_type, domain).cloned().collect())
    }

    fn language_records(
        &self,
        project_type: ProjectType,
        domain: &str,
        language: &str,
    ) -> Result<Vec<VersionCandidate>, StoreError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::LockPoisoned);
        }
        Ok(self
            .matching(project_type, domain)
            .filter(|r| r.language == language)
            .map(|r| VersionCandidate {
                version: r.version.clone(),
                updated: r.updated.clone(),
            })
            .collect())
    }
}

/// Every package counts as built
pub struct AlwaysAvailable;

impl PackageAvailability for AlwaysAvailable {
    fn is_available(&self, _path: &str) -> bool {
        true
    }
}

/// Only the listed package paths count as built
#[allow(dead_code)]
pub struct BuiltPackages(pub HashSet<String>);

impl PackageAvailability for BuiltPackages {
    fn is_available(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// In-memory SQLite store seeded with active records
#[allow(dead_code)]
pub fn seeded_store(project_type: ProjectType, domain: &str, records: &[TranslationRecord]) -> SqliteRecordStore {
    let store = SqliteRecordStore::in_memory().unwrap();
    for record in records {
        store.insert_record(project_type, domain, record, true).unwrap();
    }
    store
}

/// Service over the given store with an in-memory cache and built-in locales
#[allow(dead_code)]
pub fn create_test_service(
    store: Arc<dyn RecordStore>,
    availability: Arc<dyn PackageAvailability>,
) -> (TranslationService, Arc<MemoryResultCache>) {
    let cache = Arc::new(MemoryResultCache::new());
    let service = create_service_with_cache(store, cache.clone(), availability);
    (service, cache)
}

#[allow(dead_code)]
pub fn create_service_with_cache(
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ResultCache>,
    availability: Arc<dyn PackageAvailability>,
) -> TranslationService {
    TranslationService::new(
        Collaborators {
            store,
            cache,
            locales: Arc::new(StaticLocaleResolver::default()),
            availability,
            ordering: Arc::new(WpVersionOrdering),
        },
        &ResolverConfig::default(),
    )
}
