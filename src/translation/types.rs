//! Common types for translation resolution

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Versioned;

/// Kind of component a translation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// WordPress core (domain is usually "default")
    Core,
    /// A plugin, identified by its slug
    Plugin,
    /// A theme, identified by its slug
    Theme,
}

impl ProjectType {
    /// Returns the string representation of the project type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Core => "core",
            ProjectType::Plugin => "plugin",
            ProjectType::Theme => "theme",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(ProjectType::Core),
            "plugin" => Ok(ProjectType::Plugin),
            "theme" => Ok(ProjectType::Theme),
            _ => Err(()),
        }
    }
}

/// A translation row as returned by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Locale code (e.g., "de_DE")
    pub language: String,
    pub version: String,
    /// Last update time, kept exactly as stored
    pub updated: String,
}

impl Versioned for TranslationRecord {
    fn version(&self) -> &str {
        &self.version
    }
}

/// Single-language projection of a translation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCandidate {
    pub version: String,
    pub updated: String,
}

impl Versioned for VersionCandidate {
    fn version(&self) -> &str {
        &self.version
    }
}

/// Catalog entry: a translation record enriched with locale names and a package URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTranslation {
    pub language: String,
    pub version: String,
    pub updated: String,
    pub english_name: String,
    pub native_name: String,
    pub package: String,
    /// ISO 639 code used for ordering and deduplication
    pub iso: String,
}

/// The best language pack for one language and one target version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePackCandidate {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub slug: String,
    pub language: String,
    /// Minimum software version this pack was built for
    pub version: String,
    pub updated: String,
    pub package: String,
    pub autoupdate: bool,
}

/// Headers of a translation file installed on a site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledTranslationMeta {
    #[serde(rename = "PO-Revision-Date", default)]
    pub po_revision_date: Option<String>,
}

impl InstalledTranslationMeta {
    pub fn revised_at(date: &str) -> Self {
        Self {
            po_revision_date: Some(date.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("core", Some(ProjectType::Core))]
    #[case("plugin", Some(ProjectType::Plugin))]
    #[case("theme", Some(ProjectType::Theme))]
    #[case("plugins", None)]
    #[case("", None)]
    fn project_type_from_str_returns_expected(
        #[case] input: &str,
        #[case] expected: Option<ProjectType>,
    ) {
        assert_eq!(input.parse::<ProjectType>().ok(), expected);
    }

    #[test]
    fn language_pack_candidate_serializes_type_field() {
        let candidate = LanguagePackCandidate {
            project_type: ProjectType::Plugin,
            slug: "akismet".to_string(),
            language: "de_DE".to_string(),
            version: "4.1".to_string(),
            updated: "2020-02-01 00:00:00".to_string(),
            package: "https://example.org/plugins/akismet/4.1/de_DE.zip".to_string(),
            autoupdate: true,
        };

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["type"], json!("plugin"));
        assert_eq!(value["slug"], json!("akismet"));
        assert_eq!(value["autoupdate"], json!(true));
    }

    #[test]
    fn installed_meta_reads_po_revision_date_header() {
        let meta: InstalledTranslationMeta = serde_json::from_value(json!({
            "PO-Revision-Date": "2020-01-15 10:30+0000",
            "Language": "de_DE"
        }))
        .unwrap();

        assert_eq!(meta, InstalledTranslationMeta::revised_at("2020-01-15 10:30+0000"));
    }
}
