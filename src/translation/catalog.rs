//! Catalog of the newest compatible translation per language
//!
//! One store query covers every language of a project. Records are sorted
//! newest first and walked once, keeping the first compatible record of each
//! language. Selected records are enriched with locale names and package URLs,
//! deduplicated by ISO code and ordered by it.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::config::{CATALOG_CACHE_GROUP, EXCLUDED_LOCALE};
use crate::request::CatalogRequest;
use crate::translation::cache::{self, CacheLookup, ResultCache};
use crate::translation::locale::{IsoSpecificity, LocaleField, LocaleResolver};
use crate::translation::store::RecordStore;
use crate::translation::types::{ProjectType, ResolvedTranslation, TranslationRecord};
use crate::translation::url::UrlBuilder;
use crate::version::{VersionOrdering, WpVersionOrdering, normalize_target, sort_descending};

pub struct CatalogBuilder {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ResultCache>,
    locales: Arc<dyn LocaleResolver>,
    urls: UrlBuilder,
    ordering: Arc<dyn VersionOrdering>,
    ttl: Duration,
    core_latest_release: String,
}

impl CatalogBuilder {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn ResultCache>,
        locales: Arc<dyn LocaleResolver>,
        urls: UrlBuilder,
        ttl: Duration,
        core_latest_release: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            locales,
            urls,
            ordering: Arc::new(WpVersionOrdering),
            ttl,
            core_latest_release: core_latest_release.into(),
        }
    }

    /// Replace the version ordering strategy
    pub fn with_ordering(mut self, ordering: Arc<dyn VersionOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Catalog for WordPress core
    pub fn build_core_catalog(&self, version: Option<&str>, secure: bool) -> Vec<ResolvedTranslation> {
        self.build_catalog(&CatalogRequest {
            project_type: ProjectType::Core,
            domain: "default".to_string(),
            version: version.map(str::to_string),
            secure,
        })
    }

    /// Newest compatible translation per language, ordered by ISO code
    pub fn build_catalog(&self, request: &CatalogRequest) -> Vec<ResolvedTranslation> {
        let target = self.target_version(request);
        let cache_key = format!(
            "{}:{}:{}",
            request.project_type,
            request.domain,
            target.unwrap_or_default()
        );

        let catalog = match cache::load::<Vec<ResolvedTranslation>>(
            self.cache.as_ref(),
            CATALOG_CACHE_GROUP,
            &cache_key,
        ) {
            CacheLookup::Empty => {
                debug!("Catalog {} is known to be empty", cache_key);
                return Vec::new();
            }
            CacheLookup::Hit(catalog) => catalog,
            CacheLookup::Miss => {
                let records = match self
                    .store
                    .active_records(request.project_type, &request.domain)
                {
                    Ok(records) => records,
                    Err(e) => {
                        error!("Failed to load translations for {}: {}", cache_key, e);
                        return Vec::new();
                    }
                };

                let selected = self.select_per_language(records, target);
                let catalog = self.resolve(request.project_type, &request.domain, selected);

                cache::store(
                    self.cache.as_ref(),
                    CATALOG_CACHE_GROUP,
                    &cache_key,
                    &catalog,
                    self.ttl,
                );
                catalog
            }
        };

        catalog
            .into_iter()
            .map(|mut entry| {
                entry.package = UrlBuilder::with_scheme(&entry.package, request.secure);
                entry
            })
            .collect()
    }

    /// Core defaults to the latest release when no version is requested
    fn target_version<'a>(&'a self, request: &'a CatalogRequest) -> Option<&'a str> {
        match normalize_target(request.version.as_deref()) {
            None if request.project_type == ProjectType::Core => {
                Some(self.core_latest_release.as_str())
            }
            target => target,
        }
    }

    /// First compatible record per language, walking newest first
    fn select_per_language(
        &self,
        mut records: Vec<TranslationRecord>,
        target: Option<&str>,
    ) -> Vec<TranslationRecord> {
        sort_descending(&mut records, self.ordering.as_ref(), |r| r.version.as_str());

        let mut selected: IndexMap<String, TranslationRecord> = IndexMap::new();
        for record in records {
            if record.language == EXCLUDED_LOCALE || selected.contains_key(&record.language) {
                continue;
            }
            let compatible =
                target.is_none_or(|target| self.ordering.is_compatible(&record.version, target));
            if compatible {
                selected.insert(record.language.clone(), record);
            }
        }

        selected.into_values().collect()
    }

    /// Attach locale names and package URLs, deduplicate and order by ISO code.
    ///
    /// When two locales share an ISO code, the one whose code came from the
    /// more specific ISO standard wins; on a tie the smaller locale code wins.
    fn resolve(
        &self,
        project_type: ProjectType,
        domain: &str,
        records: Vec<TranslationRecord>,
    ) -> Vec<ResolvedTranslation> {
        let mut by_iso: BTreeMap<String, (IsoSpecificity, ResolvedTranslation)> = BTreeMap::new();

        for record in records {
            let Some(locale) = self.locales.by_field(LocaleField::WpLocale, &record.language)
            else {
                debug!("No locale metadata for {}, skipping", record.language);
                continue;
            };
            let Some((iso, specificity)) = locale.iso_key() else {
                debug!("No ISO code for {}, skipping", record.language);
                continue;
            };

            let package =
                self.urls
                    .catalog_package(project_type, domain, &record.version, &record.language);
            let resolved = ResolvedTranslation {
                iso: iso.to_string(),
                english_name: locale.english_name.clone(),
                native_name: locale.native_name.clone(),
                package,
                language: record.language,
                version: record.version,
                updated: record.updated,
            };

            match by_iso.entry(resolved.iso.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert((specificity, resolved));
                }
                Entry::Occupied(mut slot) => {
                    let (kept_specificity, kept) = slot.get();
                    let wins = specificity > *kept_specificity
                        || (specificity == *kept_specificity && resolved.language < kept.language);
                    debug!(
                        "ISO collision on {} between {} and {}",
                        resolved.iso, kept.language, resolved.language
                    );
                    if wins {
                        slot.insert((specificity, resolved));
                    }
                }
            }
        }

        by_iso.into_values().map(|(_, resolved)| resolved).collect()
    }
}
