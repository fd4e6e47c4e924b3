//! Version ordering and selection
//!
//! # Modules
//!
//! - [`compare`]: total order over WordPress-style version strings
//! - [`selector`]: picks the best candidate for an optional target version

pub mod compare;
pub mod selector;

pub use compare::{VersionOrdering, WpVersionOrdering, compare_versions, sort_descending};
pub use selector::{Versioned, normalize_target, select_best_version};
