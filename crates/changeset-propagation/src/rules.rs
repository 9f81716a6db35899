//! Policy deciding whether a released dependency forces its dependent to release.
//!
//! The policy is a table keyed by the kind of the edge, the severity of the
//! upstream bump and the shape of the range the dependent declared:
//!
//! | edge kind          | upstream bump   | range shape | rule                     |
//! |--------------------|-----------------|-------------|--------------------------|
//! | peer               | minor, major    | any         | force major              |
//! | peer               | patch           | any         | patch when out of range  |
//! | normal, dev        | any             | any         | patch when out of range  |
//!
//! A minor or major release of a peer is presumed breaking for everything that
//! peer-depends on it, whether or not the declared range still admits it.

use changeset_core::{BumpType, DependencyKind};
use changeset_graph::DependencyEdge;
use changeset_version::{DeclaredRange, RangeShape};
use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The dependent is released with this severity regardless of its range.
    Force(BumpType),
    /// The dependent is released with this severity when its range rejects the new version.
    WhenOutOfRange(BumpType),
}

impl Rule {
    #[must_use]
    pub fn required_bump(self, range: &DeclaredRange, new_version: &Version) -> Option<BumpType> {
        match self {
            Self::Force(bump) => Some(bump),
            Self::WhenOutOfRange(bump) => (!range.admits(new_version)).then_some(bump),
        }
    }
}

#[must_use]
pub const fn rule_for(kind: DependencyKind, upstream: BumpType, shape: RangeShape) -> Rule {
    match (kind, upstream, shape) {
        (DependencyKind::Peer, BumpType::Minor | BumpType::Major, _) => {
            Rule::Force(BumpType::Major)
        }
        (
            DependencyKind::Peer,
            BumpType::Patch,
            RangeShape::Pinned | RangeShape::Tilde | RangeShape::Caret | RangeShape::Other,
        )
        | (DependencyKind::Normal | DependencyKind::Dev, _, _) => {
            Rule::WhenOutOfRange(BumpType::Patch)
        }
    }
}

/// Severity `edge.dependent` must be released with once `edge.dependency` is
/// released with `upstream` and moves to `new_version`, if any.
#[must_use]
pub fn required_bump(
    edge: &DependencyEdge,
    upstream: BumpType,
    new_version: &Version,
) -> Option<BumpType> {
    rule_for(edge.kind, upstream, edge.range.shape()).required_bump(&edge.range, new_version)
}
