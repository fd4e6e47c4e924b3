//! Translation service wiring
//!
//! Groups the catalog builder and the update decision engine over one set of
//! collaborators (record store, result cache, locale resolver and package
//! availability).

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{ResolverConfig, cache_db_path, data_dir, db_path};
use crate::request::{CatalogRequest, UpdateCheckRequest};
use crate::translation::availability::{BuildsDirectory, PackageAvailability};
use crate::translation::cache::{ResultCache, SqliteResultCache};
use crate::translation::catalog::CatalogBuilder;
use crate::translation::decision::UpdateDecisionEngine;
use crate::translation::error::{CacheError, StoreError};
use crate::translation::finder::LanguagePackFinder;
use crate::translation::locale::{LocaleResolver, StaticLocaleResolver};
use crate::translation::store::{RecordStore, SqliteRecordStore};
use crate::translation::types::{LanguagePackCandidate, ResolvedTranslation};
use crate::translation::url::UrlBuilder;
use crate::version::{VersionOrdering, WpVersionOrdering};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to create data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Result cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Collaborators shared by every component of the service
pub struct Collaborators {
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn ResultCache>,
    pub locales: Arc<dyn LocaleResolver>,
    pub availability: Arc<dyn PackageAvailability>,
    pub ordering: Arc<dyn VersionOrdering>,
}

pub struct TranslationService {
    catalog: CatalogBuilder,
    engine: UpdateDecisionEngine,
}

impl TranslationService {
    pub fn new(collaborators: Collaborators, config: &ResolverConfig) -> Self {
        let urls = UrlBuilder::new(
            config.packages.translation_host.as_str(),
            config.packages.builds_host.as_str(),
        );
        let ttl = config.cache.ttl();

        let catalog = CatalogBuilder::new(
            collaborators.store.clone(),
            collaborators.cache.clone(),
            collaborators.locales,
            urls.clone(),
            ttl,
            config.core.latest_release.as_str(),
        )
        .with_ordering(collaborators.ordering.clone());

        let finder = LanguagePackFinder::new(
            collaborators.store,
            collaborators.cache,
            collaborators.availability,
            urls,
            ttl,
        )
        .with_ordering(collaborators.ordering);

        Self {
            catalog,
            engine: UpdateDecisionEngine::new(finder),
        }
    }

    /// Open the SQLite store and cache under the data directory
    pub fn open(config: &ResolverConfig) -> Result<Self, ServiceError> {
        std::fs::create_dir_all(data_dir())?;

        let store = SqliteRecordStore::open(&db_path())?;
        let cache = SqliteResultCache::open(&cache_db_path())?;
        let builds_dir = config.packages.builds_dir();
        info!("Checking built packages under {:?}", builds_dir);

        Ok(Self::new(
            Collaborators {
                store: Arc::new(store),
                cache: Arc::new(cache),
                locales: Arc::new(StaticLocaleResolver::default()),
                availability: Arc::new(BuildsDirectory::new(builds_dir)),
                ordering: Arc::new(WpVersionOrdering),
            },
            config,
        ))
    }

    pub fn catalog(&self, request: &CatalogRequest) -> Vec<ResolvedTranslation> {
        self.catalog.build_catalog(request)
    }

    pub fn check_update(&self, request: &UpdateCheckRequest) -> Vec<LanguagePackCandidate> {
        self.engine.translations_paired_with_update(request)
    }

    pub fn check_installed(&self, request: &UpdateCheckRequest) -> Vec<LanguagePackCandidate> {
        self.engine.translations_for_installed_items(request)
    }
}
