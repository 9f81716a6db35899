use changeset_core::{BumpType, PackageRelease};
use changeset_graph::{DependencyGraph, GraphSnapshot};
use changeset_version::bump_version;
use semver::Version;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::PropagationConfig;
use crate::error::PlanError;
use crate::session::PropagationSession;

/// Final decision for one package.
///
/// `dependencies` lists the releasing dependencies that caused the release, in
/// the order they were discovered. It is empty for explicit requests unless
/// propagation escalated them past the requested bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDecision {
    pub name: String,
    #[serde(rename = "type")]
    pub bump_type: BumpType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ReleaseDecision {
    #[must_use]
    pub fn is_propagated(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// A package release with its version arithmetic applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub name: String,
    pub current_version: Version,
    pub new_version: Version,
    pub bump_type: BumpType,
}

/// Ordered release decisions: explicit requests first, in request order, then
/// propagated releases in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePlan {
    releases: Vec<ReleaseDecision>,
    explicit_count: usize,
    passes: usize,
}

impl ReleasePlan {
    pub(crate) fn new(
        releases: Vec<ReleaseDecision>,
        explicit_count: usize,
        passes: usize,
    ) -> Self {
        Self {
            releases,
            explicit_count,
            passes,
        }
    }

    #[must_use]
    pub fn releases(&self) -> &[ReleaseDecision] {
        &self.releases
    }

    /// Decisions seeded by explicit requests.
    ///
    /// An explicit release that propagation escalated keeps its place here and
    /// carries the dependencies that escalated it. Writers persisting plain
    /// requests should store only `name` and `bump_type` from these entries.
    #[must_use]
    pub fn explicit(&self) -> &[ReleaseDecision] {
        &self.releases[..self.explicit_count]
    }

    /// Decisions added by propagation.
    #[must_use]
    pub fn dependents(&self) -> &[ReleaseDecision] {
        &self.releases[self.explicit_count..]
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReleaseDecision> {
        self.releases.iter().find(|release| release.name == name)
    }

    #[must_use]
    pub fn bump_type(&self, name: &str) -> Option<BumpType> {
        self.get(name).map(|release| release.bump_type)
    }

    /// Number of propagation passes it took to reach the fixed point.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Current and new version of every released package of `graph`.
    #[must_use]
    pub fn package_versions(&self, graph: &DependencyGraph) -> Vec<PackageVersion> {
        self.releases
            .iter()
            .filter_map(|release| {
                let package = graph.package(&release.name)?;
                Some(PackageVersion {
                    name: release.name.clone(),
                    current_version: package.version.clone(),
                    new_version: bump_version(&package.version, release.bump_type),
                    bump_type: release.bump_type,
                })
            })
            .collect()
    }
}

impl Serialize for ReleasePlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.releases)
    }
}

/// Computes every release required by `explicit` over `graph`.
///
/// # Errors
///
/// Returns `PlanError::UnknownPackage` if an explicit request names a package missing
/// from the graph.
pub fn compute_release_plan(
    graph: &DependencyGraph,
    explicit: &[PackageRelease],
) -> Result<ReleasePlan, PlanError> {
    compute_release_plan_with_config(graph, explicit, &PropagationConfig::default())
}

/// # Errors
///
/// Returns `PlanError::UnknownPackage` if an explicit request names a package missing
/// from the graph.
pub fn compute_release_plan_with_config(
    graph: &DependencyGraph,
    explicit: &[PackageRelease],
    config: &PropagationConfig,
) -> Result<ReleasePlan, PlanError> {
    let mut session = PropagationSession::new(graph, config);
    session.seed(explicit)?;
    Ok(session.run())
}

/// Validates `snapshot` into a graph and computes the plan over it.
///
/// # Errors
///
/// Returns `PlanError::Graph` if the snapshot does not describe a valid graph, or
/// `PlanError::UnknownPackage` for requests naming packages outside it.
pub fn plan_from_snapshot(
    snapshot: GraphSnapshot,
    explicit: &[PackageRelease],
    config: &PropagationConfig,
) -> Result<(DependencyGraph, ReleasePlan), PlanError> {
    let graph = snapshot.into_graph()?;
    let plan = compute_release_plan_with_config(&graph, explicit, config)?;
    Ok((graph, plan))
}
