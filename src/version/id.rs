//! Metavisor version identifiers
//!
//! A version identifier looks like `metavisor-2-19-49-g617a92b81`: a product
//! name, three numeric components and a build hash suffix.

use std::cmp::Ordering;
use std::fmt;

const DELIMITER: &str = "-";

/// A parsed version identifier.
///
/// Parsing never fails. A numeric component that is missing or not a number
/// degrades to zero, and [`VersionId::is_well_formed`] reports whether that
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId {
    raw: String,
    major: u64,
    minor: u64,
    build: u64,
    suffix: String,
    well_formed: bool,
}

impl VersionId {
    pub fn parse(raw: &str) -> Self {
        let fields: Vec<&str> = raw.split(DELIMITER).collect();

        let numeric = |index: usize| -> Option<u64> { fields.get(index)?.parse().ok() };
        let major = numeric(1);
        let minor = numeric(2);
        let build = numeric(3);
        let well_formed = major.is_some() && minor.is_some() && build.is_some();

        let suffix = fields
            .get(4..)
            .map(|rest| rest.join(DELIMITER))
            .unwrap_or_default();

        Self {
            raw: raw.to_string(),
            major: major.unwrap_or(0),
            minor: minor.unwrap_or(0),
            build: build.unwrap_or(0),
            suffix,
            well_formed,
        }
    }

    /// The identifier exactly as published; used as the lookup key.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn build(&self) -> u64 {
        self.build
    }

    /// Opaque trailing part of the identifier (usually a commit hash)
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// False when any numeric component was coerced to zero
    pub fn is_well_formed(&self) -> bool {
        self.well_formed
    }

    /// Compares only the (major, minor, build) triple.
    ///
    /// Identifiers that differ only in their suffix are `Equal` here.
    pub fn release_cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.build).cmp(&(other.major, other.minor, other.build))
    }
}

impl Ord for VersionId {
    /// Release order first; identical releases fall back to the raw string so
    /// that sorting is deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_cmp(other).then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for VersionId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Sorts versions newest first
pub fn sort_descending(versions: &mut [VersionId]) {
    versions.sort_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_extracts_components_and_suffix() {
        let id = VersionId::parse("metavisor-2-19-49-g617a92b81");

        assert_eq!(id.as_str(), "metavisor-2-19-49-g617a92b81");
        assert_eq!((id.major(), id.minor(), id.build()), (2, 19, 49));
        assert_eq!(id.suffix(), "g617a92b81");
        assert!(id.is_well_formed());
    }

    #[test]
    fn parse_keeps_dashes_inside_suffix() {
        let id = VersionId::parse("metavisor-1-2-3-rc-1");
        assert_eq!(id.suffix(), "rc-1");
    }

    #[rstest]
    #[case("metavisor-x-1-2-abc", (0, 1, 2))]
    #[case("metavisor-2-1", (2, 1, 0))]
    #[case("latest", (0, 0, 0))]
    #[case("", (0, 0, 0))]
    fn parse_degrades_malformed_components_to_zero(
        #[case] raw: &str,
        #[case] expected: (u64, u64, u64),
    ) {
        let id = VersionId::parse(raw);

        assert_eq!((id.major(), id.minor(), id.build()), expected);
        assert!(!id.is_well_formed());
        assert_eq!(id.as_str(), raw);
    }

    #[rstest]
    #[case("metavisor-1-9-9-a", "metavisor-2-0-0-a", Ordering::Less)]
    #[case("metavisor-2-9-0-a", "metavisor-2-10-0-a", Ordering::Less)]
    #[case("metavisor-2-1-10-a", "metavisor-2-1-9-a", Ordering::Greater)]
    #[case("metavisor-3-0-0-a", "metavisor-2-99-99-a", Ordering::Greater)]
    #[case("metavisor-2-1-5-aaa", "metavisor-2-1-5-bbb", Ordering::Equal)]
    fn release_cmp_is_numeric(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let a = VersionId::parse(a);
        let b = VersionId::parse(b);

        assert_eq!(a.release_cmp(&b), expected);
        assert_eq!(b.release_cmp(&a), expected.reverse());
    }

    #[test]
    fn cmp_breaks_release_ties_by_raw_string_in_both_directions() {
        let a = VersionId::parse("metavisor-2-1-5-aaa");
        let b = VersionId::parse("metavisor-2-1-5-bbb");

        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn sort_descending_orders_newest_first() {
        let mut versions: Vec<VersionId> = [
            "metavisor-2-0-1-x",
            "metavisor-2-10-0-z",
            "metavisor-2-1-0-y",
            "metavisor-1-99-0-w",
        ]
        .into_iter()
        .map(VersionId::from)
        .collect();

        sort_descending(&mut versions);

        let sorted: Vec<&str> = versions.iter().map(VersionId::as_str).collect();
        assert_eq!(
            sorted,
            vec![
                "metavisor-2-10-0-z",
                "metavisor-2-1-0-y",
                "metavisor-2-0-1-x",
                "metavisor-1-99-0-w"
            ]
        );
    }
}
