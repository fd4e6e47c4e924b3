//! Package paths and download URLs

use crate::translation::types::ProjectType;

/// Builds package paths and URLs from configured hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    /// Host and path prefix for catalog packages, without scheme
    translation_host: String,
    /// Host and path prefix for update-check packages, without scheme
    builds_host: String,
}

impl UrlBuilder {
    pub fn new(translation_host: impl Into<String>, builds_host: impl Into<String>) -> Self {
        Self {
            translation_host: trim_slashes(translation_host.into()),
            builds_host: trim_slashes(builds_host.into()),
        }
    }

    /// Catalog package URL, always `https`. Use [`UrlBuilder::with_scheme`]
    /// to serve it to an insecure request.
    pub fn catalog_package(
        &self,
        project_type: ProjectType,
        domain: &str,
        version: &str,
        language: &str,
    ) -> String {
        let project = match project_type {
            ProjectType::Core => "core".to_string(),
            other => format!("{}/{}", other, domain),
        };
        format!(
            "https://{}/{}/{}/{}.zip",
            self.translation_host, project, version, language
        )
    }

    /// Path of a built package relative to the builds root
    pub fn build_path(
        project_type: ProjectType,
        domain: &str,
        version: &str,
        language: &str,
    ) -> String {
        match project_type {
            ProjectType::Core => format!("core/{}/{}.zip", version, language),
            other => format!("{}s/{}/{}/{}.zip", other, domain, version, language),
        }
    }

    /// URL of a built package under the builds host
    pub fn secure_prefixed(&self, path: &str, secure: bool) -> String {
        format!(
            "{}://{}/{}",
            scheme(secure),
            self.builds_host,
            path.trim_start_matches('/')
        )
    }

    /// Rewrite an `https` URL to `http` for insecure requests
    pub fn with_scheme(url: &str, secure: bool) -> String {
        match url.strip_prefix("https://") {
            Some(rest) if !secure => format!("http://{}", rest),
            _ => url.to_string(),
        }
    }
}

fn scheme(secure: bool) -> &'static str {
    if secure { "https" } else { "http" }
}

fn trim_slashes(host: String) -> String {
    host.trim_matches('/').to_string()
}
