use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Cache-related constants
// =============================================================================

/// Lifetime of cached results and empty sentinels (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

/// Cache group for per-project catalogs
pub const CATALOG_CACHE_GROUP: &str = "translations-query";

/// Cache group for per-language candidate lists
pub const CANDIDATE_CACHE_GROUP: &str = "update-check-translations";

// =============================================================================
// Policy constants
// =============================================================================

/// Locale that never gets language packs
pub const EXCLUDED_LOCALE: &str = "en_US";

/// Latest published WordPress release, used when a core request has no version
pub const DEFAULT_CORE_LATEST_RELEASE: &str = "6.6.2";

pub const DEFAULT_TRANSLATION_HOST: &str = "downloads.wordpress.org/translation";

pub const DEFAULT_BUILDS_HOST: &str = "global.wordpress.org/builds";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Resolver configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub cache: CacheConfig,
    pub core: CoreConfig,
    pub packages: PackagesConfig,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Time-to-live of cache entries in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// WordPress core release information
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    pub latest_release: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            latest_release: DEFAULT_CORE_LATEST_RELEASE.to_string(),
        }
    }
}

/// Where packages are served from and where built packages live
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PackagesConfig {
    /// Host and path prefix of catalog packages, without scheme
    pub translation_host: String,
    /// Host and path prefix of built packages, without scheme
    pub builds_host: String,
    /// Directory holding built packages; defaults to `{data_dir}/builds`
    pub builds_dir: Option<PathBuf>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            translation_host: DEFAULT_TRANSLATION_HOST.to_string(),
            builds_host: DEFAULT_BUILDS_HOST.to_string(),
            builds_dir: None,
        }
    }
}

impl PackagesConfig {
    pub fn builds_dir(&self) -> PathBuf {
        self.builds_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("builds"))
    }
}

impl ResolverConfig {
    /// Load configuration from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for langpack-resolver.
/// Uses $XDG_DATA_HOME/langpack-resolver if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/langpack-resolver,
/// or ./langpack-resolver if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the record database.
pub fn db_path() -> PathBuf {
    data_dir().join("language_packs.db")
}

/// Returns the path to the result cache database.
pub fn cache_db_path() -> PathBuf {
    data_dir().join("cache.db")
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("langpack.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("langpack-resolver")
}
