//! Typed requests accepted by the resolver
//!
//! Requests are plain serde structs so callers can hand over JSON bodies
//! as-is. Call `validate` once at the boundary before passing them on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::translation::types::{InstalledTranslationMeta, ProjectType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("domain must not be empty")]
    BlankDomain,

    #[error("language at position {0} must not be empty")]
    BlankLanguage(usize),
}

fn default_secure() -> bool {
    true
}

/// Request for a project's translation catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(alias = "slug")]
    pub domain: String,
    /// Target software version; core falls back to the latest release
    #[serde(default)]
    pub version: Option<String>,
    /// Whether the incoming request was made over https
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl CatalogRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_domain(&self.domain)
    }
}

/// Which languages of a project to resolve language packs for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePackQuery {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(alias = "slug")]
    pub domain: String,
    /// Target software version; without it the newest pack wins
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl LanguagePackQuery {
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_domain(&self.domain)?;
        match self.languages.iter().position(|l| l.trim().is_empty()) {
            Some(index) => Err(RequestError::BlankLanguage(index)),
            None => Ok(()),
        }
    }
}

/// Update check for one installed project on a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheckRequest {
    #[serde(flatten)]
    pub query: LanguagePackQuery,
    /// Software version currently installed on the site
    #[serde(default)]
    pub current_version: Option<String>,
    /// Installed translation headers, keyed by locale
    #[serde(default)]
    pub language_data: HashMap<String, InstalledTranslationMeta>,
}

impl UpdateCheckRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        self.query.validate()
    }
}

fn validate_domain(domain: &str) -> Result<(), RequestError> {
    if domain.trim().is_empty() {
        Err(RequestError::BlankDomain)
    } else {
        Ok(())
    }
}
