//! Language pack update decisions
//!
//! A site needs a language pack when it has no translation installed for the
//! language, or when its installed translation is stale. Two staleness
//! policies exist:
//!
//! - [`StalenessPolicy::PairedWithUpdate`]: the site is about to update the
//!   software. The installed translation is only current when it is at least
//!   as new as the pack AND the site already runs the pack's version. A pack
//!   built for a newer version becomes the new minimum even when its strings
//!   are older than what the site has.
//! - [`StalenessPolicy::InstalledRefresh`]: periodic check of what is already
//!   installed. Only the revision dates matter.
//!
//! Unparsable dates count as stale.

use std::collections::HashMap;

use tracing::debug;

use crate::request::UpdateCheckRequest;
use crate::translation::finder::LanguagePackFinder;
use crate::translation::timestamp::parse_timestamp;
use crate::translation::types::{InstalledTranslationMeta, LanguagePackCandidate};
use crate::version::VersionOrdering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessPolicy<'a> {
    /// `current_version` is the software version installed on the site
    PairedWithUpdate { current_version: Option<&'a str> },
    InstalledRefresh,
}

/// Decide whether a site should receive a language pack
pub fn needs_update(
    pack: &LanguagePackCandidate,
    installed: Option<&InstalledTranslationMeta>,
    policy: StalenessPolicy<'_>,
    ordering: &dyn VersionOrdering,
) -> bool {
    let Some(installed) = installed else {
        return true;
    };

    let pack_updated = parse_timestamp(&pack.updated);
    let site_updated = installed
        .po_revision_date
        .as_deref()
        .and_then(parse_timestamp);

    let (Some(pack_updated), Some(site_updated)) = (pack_updated, site_updated) else {
        debug!(
            "Unparsable revision dates for {} ({:?} vs {:?}), offering update",
            pack.language, pack.updated, installed.po_revision_date
        );
        return true;
    };

    let site_is_current = pack_updated <= site_updated;

    match policy {
        StalenessPolicy::InstalledRefresh => !site_is_current,
        StalenessPolicy::PairedWithUpdate { current_version } => {
            let runs_pack_version = current_version
                .is_some_and(|current| ordering.compare(current, &pack.version).is_ge());
            !(site_is_current && runs_pack_version)
        }
    }
}

/// Filters language packs down to the ones a site actually needs
pub struct UpdateDecisionEngine {
    finder: LanguagePackFinder,
}

impl UpdateDecisionEngine {
    pub fn new(finder: LanguagePackFinder) -> Self {
        Self { finder }
    }

    /// Packs to install alongside a software update to `query.version`
    pub fn translations_paired_with_update(
        &self,
        request: &UpdateCheckRequest,
    ) -> Vec<LanguagePackCandidate> {
        self.decide(
            request,
            StalenessPolicy::PairedWithUpdate {
                current_version: request.current_version.as_deref(),
            },
        )
    }

    /// Refreshed packs for software already installed at `query.version`
    pub fn translations_for_installed_items(
        &self,
        request: &UpdateCheckRequest,
    ) -> Vec<LanguagePackCandidate> {
        self.decide(request, StalenessPolicy::InstalledRefresh)
    }

    fn decide(
        &self,
        request: &UpdateCheckRequest,
        policy: StalenessPolicy<'_>,
    ) -> Vec<LanguagePackCandidate> {
        let packs = self.finder.find_latest(&request.query);
        filter_stale(packs, &request.language_data, policy, self.finder.ordering())
    }
}

fn filter_stale(
    packs: Vec<LanguagePackCandidate>,
    language_data: &HashMap<String, InstalledTranslationMeta>,
    policy: StalenessPolicy<'_>,
    ordering: &dyn VersionOrdering,
) -> Vec<LanguagePackCandidate> {
    packs
        .into_iter()
        .filter(|pack| {
            let update = needs_update(pack, language_data.get(&pack.language), policy, ordering);
            if !update {
                debug!("{} translation for {} is current", pack.language, pack.slug);
            }
            update
        })
        .collect()
}
