//! Shared semver utilities for release tags and the config schema version

use semver::Version;

use crate::update::error::VersionError;

/// Strip at most one leading non-digit prefix character.
///
/// Release tags are commonly prefixed ("v1.2.3"); everything else passes
/// through unchanged.
pub fn normalize_tag(tag: &str) -> &str {
    match tag.chars().next() {
        Some(c) if !c.is_ascii_digit() => &tag[c.len_utf8()..],
        _ => tag,
    }
}

/// Parse a version string into a `semver::Version`.
///
/// Normalizes the tag first, so "v1.2.3" and "1.2.3" parse to the same
/// value. Partial versions like "1.2" are rejected: every version this
/// software produces carries all three numeric segments.
pub fn parse_version(text: &str) -> Result<Version, VersionError> {
    Version::parse(normalize_tag(text)).map_err(|source| VersionError::Malformed {
        input: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v1.2.3", "1.2.3")]
    #[case("1.2.3", "1.2.3")]
    #[case("r2024.1.0", "2024.1.0")]
    #[case("", "")]
    fn normalize_tag_strips_one_prefix_character(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(normalize_tag(tag), expected);
    }

    #[test]
    fn parse_version_accepts_prefixed_and_bare_tags() {
        assert_eq!(
            parse_version("v1.2.3").unwrap(),
            parse_version("1.2.3").unwrap()
        );
    }

    #[rstest]
    #[case("1.2")]
    #[case("abc")]
    #[case("")]
    #[case("1.2.x")]
    fn parse_version_rejects_incomplete_or_non_numeric_input(#[case] input: &str) {
        let err = parse_version(input).unwrap_err();
        assert!(matches!(err, VersionError::Malformed { .. }));
    }

    #[test]
    fn parse_version_keeps_prerelease_metadata() {
        let version = parse_version("v2.1.0-beta").unwrap();
        assert_eq!(version.to_string(), "2.1.0-beta");
    }

    #[rstest]
    #[case("1.2.3")]
    #[case("0.0.1")]
    #[case("10.20.30")]
    #[case("2.1.0-beta.1")]
    fn parse_version_round_trips_through_display(#[case] input: &str) {
        let version = parse_version(input).unwrap();
        assert_eq!(parse_version(&version.to_string()).unwrap(), version);
    }

    #[test]
    fn versions_order_numerically_per_segment() {
        assert!(parse_version("1.2.3").unwrap() < parse_version("1.2.4").unwrap());
        assert!(parse_version("2.0.0").unwrap() > parse_version("1.9.9").unwrap());
        assert_eq!(parse_version("1.0.0").unwrap(), parse_version("1.0.0").unwrap());
    }
}
