//! Package availability predicate
//!
//! A language pack can win version selection and still not be downloadable
//! yet, e.g. while it is being built. Candidates are only offered once the
//! predicate confirms the package exists.

use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::debug;

#[cfg_attr(test, automock)]
pub trait PackageAvailability: Send + Sync {
    /// `path` is relative to the builds root, e.g. "core/5.2/de_DE.zip"
    fn is_available(&self, path: &str) -> bool;
}

/// Checks packages against a directory of built zip files
#[derive(Debug, Clone)]
pub struct BuildsDirectory {
    root: PathBuf,
}

impl BuildsDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PackageAvailability for BuildsDirectory {
    fn is_available(&self, path: &str) -> bool {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(|part| part == "..") {
            debug!("Rejecting package path outside builds root: {}", path);
            return false;
        }
        self.root.join(relative).is_file()
    }
}
