//! Per-language language pack lookup for update checks

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use tracing::{debug, error};

use crate::config::{CANDIDATE_CACHE_GROUP, EXCLUDED_LOCALE};
use crate::request::LanguagePackQuery;
use crate::translation::availability::PackageAvailability;
use crate::translation::cache::{self, CacheLookup, ResultCache};
use crate::translation::store::RecordStore;
use crate::translation::types::{LanguagePackCandidate, VersionCandidate};
use crate::translation::url::UrlBuilder;
use crate::version::{VersionOrdering, WpVersionOrdering, select_best_version};

/// Resolves the best available language pack for each requested language
pub struct LanguagePackFinder {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ResultCache>,
    availability: Arc<dyn PackageAvailability>,
    urls: UrlBuilder,
    ordering: Arc<dyn VersionOrdering>,
    ttl: Duration,
}

impl LanguagePackFinder {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn ResultCache>,
        availability: Arc<dyn PackageAvailability>,
        urls: UrlBuilder,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            availability,
            urls,
            ordering: Arc::new(WpVersionOrdering),
            ttl,
        }
    }

    /// Replace the version ordering strategy
    pub fn with_ordering(mut self, ordering: Arc<dyn VersionOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> &dyn VersionOrdering {
        self.ordering.as_ref()
    }

    /// Best available pack per requested language, in request order.
    ///
    /// Languages without a compatible, built pack are left out.
    pub fn find_latest(&self, query: &LanguagePackQuery) -> Vec<LanguagePackCandidate> {
        let languages: IndexSet<&str> = query
            .languages
            .iter()
            .map(String::as_str)
            .filter(|language| *language != EXCLUDED_LOCALE)
            .collect();

        languages
            .into_iter()
            .filter_map(|language| self.find_for_language(query, language))
            .collect()
    }

    fn find_for_language(
        &self,
        query: &LanguagePackQuery,
        language: &str,
    ) -> Option<LanguagePackCandidate> {
        let candidates = self.candidates(query, language)?;

        let Some(best) = select_best_version(
            &candidates,
            query.version.as_deref(),
            self.ordering.as_ref(),
        ) else {
            debug!(
                "No {} pack for {}/{} compatible with {:?}",
                language, query.project_type, query.domain, query.version
            );
            return None;
        };

        let path = UrlBuilder::build_path(query.project_type, &query.domain, &best.version, language);
        if !self.availability.is_available(&path) {
            debug!("Language pack {} is not built yet", path);
            return None;
        }

        Some(LanguagePackCandidate {
            project_type: query.project_type,
            slug: query.domain.clone(),
            language: language.to_string(),
            version: best.version.clone(),
            updated: best.updated.clone(),
            package: self.urls.secure_prefixed(&path, query.secure),
            autoupdate: true,
        })
    }

    /// Raw candidates for one language, served from the cache when possible.
    /// Returns `None` when the language is known to have no packs.
    fn candidates(&self, query: &LanguagePackQuery, language: &str) -> Option<Vec<VersionCandidate>> {
        let cache_key = format!("{}:{}:{}", query.project_type, language, query.domain);

        match cache::load::<Vec<VersionCandidate>>(
            self.cache.as_ref(),
            CANDIDATE_CACHE_GROUP,
            &cache_key,
        ) {
            CacheLookup::Hit(candidates) => Some(candidates),
            CacheLookup::Empty => None,
            CacheLookup::Miss => {
                let candidates = self
                    .store
                    .language_records(query.project_type, &query.domain, language)
                    .inspect_err(|e| error!("Failed to load {} candidates: {}", cache_key, e))
                    .ok()?;

                cache::store(
                    self.cache.as_ref(),
                    CANDIDATE_CACHE_GROUP,
                    &cache_key,
                    &candidates,
                    self.ttl,
                );
                (!candidates.is_empty()).then_some(candidates)
            }
        }
    }
}
