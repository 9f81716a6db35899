mod range;

use changeset_core::BumpType;
use semver::{BuildMetadata, Prerelease, Version};

pub use range::{DeclaredRange, RangeError, RangeShape};

/// Returns the version `version` moves to when released with `bump_type`.
///
/// A pre-release is finalised rather than skipped past: `1.0.0-rc.1` moves to
/// `1.0.0` at patch, and `0.1.0-beta.1` to `0.1.0` at minor. The bumped
/// component only increments when a lower component is already non-zero.
/// Build metadata is dropped. Components at `u64::MAX` saturate; see
/// [`is_bumpable`].
#[must_use]
pub fn bump_version(version: &Version, bump_type: BumpType) -> Version {
    let mut new_version = version.clone();
    let finalising = !version.pre.is_empty();

    match bump_type {
        BumpType::Major => {
            if !finalising || version.minor != 0 || version.patch != 0 {
                new_version.major = version.major.saturating_add(1);
            }
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            if !finalising || version.patch != 0 {
                new_version.minor = version.minor.saturating_add(1);
            }
            new_version.patch = 0;
        }
        BumpType::Patch => {
            if !finalising {
                new_version.patch = version.patch.saturating_add(1);
            }
        }
    }

    new_version.pre = Prerelease::EMPTY;
    new_version.build = BuildMetadata::EMPTY;
    new_version
}

/// Whether every bump of `version` yields a distinct, larger version.
#[must_use]
pub fn is_bumpable(version: &Version) -> bool {
    [version.major, version.minor, version.patch]
        .iter()
        .all(|component| *component < u64::MAX)
}

#[must_use]
pub fn max_bump_type(bumps: &[BumpType]) -> Option<BumpType> {
    bumps.iter().copied().max()
}
