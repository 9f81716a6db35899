use std::fmt;

use semver::{Comparator, Op, Version, VersionReq};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid version range '{range}'")]
    Invalid {
        range: String,
        #[source]
        source: semver::Error,
    },
}

/// How much flexibility a declared range grants the dependency it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeShape {
    /// Exactly one version, e.g. `1.2.3` or `=1.2.3`.
    Pinned,
    /// Patch-level flexibility, e.g. `~1.2.3`.
    Tilde,
    /// Minor and patch flexibility, e.g. `^1.2.3`.
    Caret,
    /// Wildcards, unbounded comparators, unions and anything ambiguous.
    Other,
}

impl RangeShape {
    /// Classifies a declared range string. Unparsable input is [`RangeShape::Other`].
    #[must_use]
    pub fn classify(range: &str) -> Self {
        DeclaredRange::new(range).shape()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pinned => "pinned",
            Self::Tilde => "tilde",
            Self::Caret => "caret",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RangeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version range as written in a dependent's manifest.
///
/// Ranges use the npm grammar: a bare version is an exact pin, a bare partial
/// version (`1.2`) is a wildcard, comparators are separated by whitespace and
/// alternatives by `||`. Each alternative is translated to a [`VersionReq`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredRange {
    raw: String,
    shape: RangeShape,
    // `None` when the range could not be parsed.
    requirements: Option<Vec<VersionReq>>,
}

impl DeclaredRange {
    /// # Errors
    ///
    /// Returns `RangeError::Invalid` if any alternative of the range cannot be parsed.
    pub fn parse(raw: &str) -> Result<Self, RangeError> {
        let requirements = raw_alternatives(raw)
            .map(|alternative| {
                VersionReq::parse(&translate_alternative(alternative)).map_err(|source| {
                    RangeError::Invalid {
                        range: raw.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let shape = match requirements.as_slice() {
            [single] => shape_of(single),
            _ => RangeShape::Other,
        };

        Ok(Self {
            raw: raw.to_string(),
            shape,
            requirements: Some(requirements),
        })
    }

    /// Parses `raw`, keeping unparsable input as an ambiguous range instead of failing.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|_| Self {
            raw: raw.to_string(),
            shape: RangeShape::Other,
            requirements: None,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn shape(&self) -> RangeShape {
        self.shape
    }

    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.requirements.is_none()
    }

    /// Whether `version` satisfies the range. Ambiguous ranges admit every version.
    #[must_use]
    pub fn admits(&self, version: &Version) -> bool {
        self.requirements
            .as_ref()
            .is_none_or(|reqs| reqs.iter().any(|req| req.matches(version)))
    }
}

impl fmt::Display for DeclaredRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn raw_alternatives(raw: &str) -> impl Iterator<Item = &str> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("workspace:").unwrap_or(raw);
    raw.split("||").map(str::trim)
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

fn translate_alternative(alternative: &str) -> String {
    if alternative.is_empty() {
        return String::from("*");
    }

    if let Some((low, high)) = alternative.split_once(" - ") {
        return format!(">={}, <={}", strip_v(low.trim()), strip_v(high.trim()));
    }

    let mut comparators = Vec::new();
    let mut pending_op = String::new();

    for token in alternative.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        // `>= 1.2.3` carries its operator as a separate token.
        if token.chars().all(is_operator_char) {
            pending_op.push_str(token);
            continue;
        }
        let token = format!("{pending_op}{token}");
        pending_op.clear();
        comparators.push(translate_comparator(&token));
    }

    if !pending_op.is_empty() {
        comparators.push(pending_op);
    }

    comparators.join(", ")
}

fn translate_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = strip_v(version);

    if !op.is_empty() {
        return format!("{op}{version}");
    }

    if matches!(version, "*" | "x" | "X") {
        return String::from("*");
    }
    if Version::parse(version).is_ok() {
        return format!("={version}");
    }
    if is_partial(version) {
        return format!("{version}.*");
    }
    version.to_string()
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn is_partial(version: &str) -> bool {
    let parts: Vec<_> = version.split('.').collect();
    parts.len() < 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

fn shape_of(req: &VersionReq) -> RangeShape {
    match req.comparators.as_slice() {
        [comparator] => comparator_shape(comparator),
        _ => RangeShape::Other,
    }
}

fn comparator_shape(comparator: &Comparator) -> RangeShape {
    match (comparator.op, comparator.minor, comparator.patch) {
        (Op::Exact, Some(_), Some(_)) => RangeShape::Pinned,
        (Op::Tilde | Op::Wildcard | Op::Exact, Some(_), None) | (Op::Tilde, Some(_), Some(_)) => {
            RangeShape::Tilde
        }
        (Op::Tilde | Op::Wildcard | Op::Exact, None, _) => RangeShape::Caret,
        (Op::Caret, minor, patch) => caret_shape(comparator.major, minor, patch),
        _ => RangeShape::Other,
    }
}

// A caret only grants as much flexibility as the leftmost non-zero component allows.
fn caret_shape(major: u64, minor: Option<u64>, patch: Option<u64>) -> RangeShape {
    match (major, minor, patch) {
        (0, Some(0), Some(_)) => RangeShape::Pinned,
        (0, Some(_), _) => RangeShape::Tilde,
        _ => RangeShape::Caret,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn classifies_bare_version_as_pinned() {
        assert_eq!(RangeShape::classify("1.0.0"), RangeShape::Pinned);
        assert_eq!(RangeShape::classify("=1.0.0"), RangeShape::Pinned);
        assert_eq!(RangeShape::classify("v1.0.0"), RangeShape::Pinned);
    }

    #[test]
    fn classifies_tilde_and_caret() {
        assert_eq!(RangeShape::classify("~1.0.0"), RangeShape::Tilde);
        assert_eq!(RangeShape::classify("^1.0.0"), RangeShape::Caret);
        assert_eq!(RangeShape::classify("^1.2"), RangeShape::Caret);
    }

    #[test]
    fn caret_on_zero_versions_narrows() {
        assert_eq!(RangeShape::classify("^0.3.1"), RangeShape::Tilde);
        assert_eq!(RangeShape::classify("^0.0.4"), RangeShape::Pinned);
        assert_eq!(RangeShape::classify("^0"), RangeShape::Caret);
    }

    #[test]
    fn classifies_partial_wildcards_by_flexibility() {
        assert_eq!(RangeShape::classify("1.x"), RangeShape::Caret);
        assert_eq!(RangeShape::classify("1"), RangeShape::Caret);
        assert_eq!(RangeShape::classify("1.2.x"), RangeShape::Tilde);
        assert_eq!(RangeShape::classify("1.2"), RangeShape::Tilde);
    }

    #[test]
    fn classifies_wide_ranges_as_other() {
        assert_eq!(RangeShape::classify("*"), RangeShape::Other);
        assert_eq!(RangeShape::classify(""), RangeShape::Other);
        assert_eq!(RangeShape::classify(">=1.0.0"), RangeShape::Other);
        assert_eq!(RangeShape::classify(">=1.0.0 <2.0.0"), RangeShape::Other);
        assert_eq!(RangeShape::classify("^1.0.0 || ^2.0.0"), RangeShape::Other);
    }

    #[test]
    fn pinned_range_admits_only_its_version() {
        let range = DeclaredRange::parse("1.0.0").expect("valid range");

        assert!(range.admits(&version("1.0.0")));
        assert!(!range.admits(&version("1.0.1")));
    }

    #[test]
    fn tilde_range_admits_patches_only() {
        let range = DeclaredRange::parse("~1.0.0").expect("valid range");

        assert!(range.admits(&version("1.0.1")));
        assert!(!range.admits(&version("1.1.0")));
    }

    #[test]
    fn caret_range_admits_minors() {
        let range = DeclaredRange::parse("^1.0.0").expect("valid range");

        assert!(range.admits(&version("1.1.0")));
        assert!(!range.admits(&version("2.0.0")));
    }

    #[test]
    fn space_separated_comparators_are_intersected() {
        let range = DeclaredRange::parse(">= 1.0.0 <1.5.0").expect("valid range");

        assert!(range.admits(&version("1.4.9")));
        assert!(!range.admits(&version("1.5.0")));
    }

    #[test]
    fn hyphen_range_is_inclusive() {
        let range = DeclaredRange::parse("1.0.0 - 1.2.0").expect("valid range");

        assert!(range.admits(&version("1.2.0")));
        assert!(!range.admits(&version("1.2.1")));
    }

    #[test]
    fn alternatives_admit_any_branch() {
        let range = DeclaredRange::parse("^1.0.0 || ^3.0.0").expect("valid range");

        assert!(range.admits(&version("3.1.0")));
        assert!(!range.admits(&version("2.0.0")));
    }

    #[test]
    fn workspace_protocol_prefix_is_ignored() {
        let range = DeclaredRange::parse("workspace:^1.0.0").expect("valid range");

        assert_eq!(range.shape(), RangeShape::Caret);
        assert!(range.admits(&version("1.9.0")));
    }

    #[test]
    fn unparsable_range_is_ambiguous_and_admits_everything() {
        let range = DeclaredRange::new("latest");

        assert!(range.is_ambiguous());
        assert_eq!(range.shape(), RangeShape::Other);
        assert!(range.admits(&version("99.0.0")));
        assert_eq!(range.as_str(), "latest");
    }

    #[test]
    fn parse_reports_unparsable_range() {
        let err = DeclaredRange::parse("not-a-range").expect_err("should fail");

        assert!(matches!(err, RangeError::Invalid { ref range, .. } if range == "not-a-range"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
