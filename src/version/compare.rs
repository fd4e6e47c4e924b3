//! Version ordering for WordPress-style version strings
//!
//! WordPress, plugin and theme versions are not semver: they are frequently
//! partial ("5.2"), may carry four segments ("4.7.4.1") and use pre-release
//! words glued to numbers ("5.3-RC2", "5.0beta1"). Versions are split into
//! runs of digits and runs of letters; every other character is a separator.
//!
//! Segments are ordered as follows:
//! - numbers compare numerically
//! - words rank `dev < alpha|a < beta|b < RC|rc < (number) < pl|p`, matched
//!   by prefix in that order, so "pre" and "patch" rank as `p` and "bugfix"
//!   as `b`
//! - words matching none of these rank below `dev`
//! - a missing segment is lower than a number, but ranks like a number
//!   against a word, so `5.3-beta < 5.3 < 5.3.0 < 5.3pl1`
//!
//! An empty or blank version is the lowest possible version.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+|[A-Za-z]+").expect("segment pattern is a valid regex")
});

/// Comparator strategy injected into every sort and selection routine
pub trait VersionOrdering: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// `true` when `version` is compatible with `target`, i.e. `version <= target`
    fn is_compatible(&self, version: &str, target: &str) -> bool {
        version == target || self.compare(version, target) != Ordering::Greater
    }
}

/// Default ordering for WordPress core, plugin and theme versions
#[derive(Debug, Clone, Copy, Default)]
pub struct WpVersionOrdering;

impl VersionOrdering for WpVersionOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_versions(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Number(u64),
    Word(i8),
}

// Rank shared by numbers and the end of a version.
const NUMBER_RANK: i8 = 4;

const UNKNOWN_WORD_RANK: i8 = -1;

// Checked in order; the first prefix a word starts with decides its rank.
const WORD_RANKS: &[(&str, i8)] = &[
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("pl", 5),
    ("p", 5),
];

impl Segment {
    fn parse(token: &str) -> Self {
        if token.as_bytes()[0].is_ascii_digit() {
            // Absurdly long digit runs saturate instead of failing
            return Segment::Number(token.parse().unwrap_or(u64::MAX));
        }
        let rank = WORD_RANKS
            .iter()
            .find(|&&(prefix, _)| token.starts_with(prefix))
            .map_or(UNKNOWN_WORD_RANK, |&(_, rank)| rank);
        Segment::Word(rank)
    }

    /// Sort key: (rank, numeric value). `None` marks the end of a version.
    fn key(segment: Option<Segment>) -> (i8, Option<u64>) {
        match segment {
            Some(Segment::Number(n)) => (NUMBER_RANK, Some(n)),
            Some(Segment::Word(rank)) => (rank, None),
            None => (NUMBER_RANK, None),
        }
    }
}

fn segments(version: &str) -> Vec<Segment> {
    SEGMENT
        .find_iter(version)
        .map(|m| Segment::parse(m.as_str()))
        .collect()
}

/// Compare two version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let left = segments(a);
    let right = segments(b);
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            Segment::key(left.get(i).copied()).cmp(&Segment::key(right.get(i).copied()))
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sort items descending by version. The sort is stable, so items with equal
/// versions keep their input order.
pub fn sort_descending<T>(
    items: &mut [T],
    ordering: &dyn VersionOrdering,
    version_of: impl Fn(&T) -> &str,
) {
    items.sort_by(|a, b| ordering.compare(version_of(b), version_of(a)));
}
