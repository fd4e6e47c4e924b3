//! Best-version selection among translation candidates

use crate::version::compare::VersionOrdering;

/// Anything that carries a version string
pub trait Versioned {
    fn version(&self) -> &str;
}

/// Normalize an optional target version: blank targets count as absent
pub fn normalize_target(target: Option<&str>) -> Option<&str> {
    target.map(str::trim).filter(|t| !t.is_empty())
}

/// Pick the best candidate for a target version
///
/// Without a target, the most recent candidate is returned. With a target, the
/// most recent candidate whose version is `<=` the target is returned, or
/// `None` when every candidate is newer than the target. Candidates with equal
/// versions keep their input order, so the first one listed wins.
pub fn select_best_version<'a, T: Versioned>(
    candidates: &'a [T],
    target: Option<&str>,
    ordering: &dyn VersionOrdering,
) -> Option<&'a T> {
    let mut sorted: Vec<&T> = candidates.iter().collect();
    sorted.sort_by(|a, b| ordering.compare(b.version(), a.version()));

    match normalize_target(target) {
        None => sorted.first().copied(),
        Some(target) => sorted
            .into_iter()
            .find(|candidate| ordering.is_compatible(candidate.version(), target)),
    }
}
