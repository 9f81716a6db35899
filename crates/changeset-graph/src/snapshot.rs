use changeset_core::DependencyKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{DependencyGraph, GraphBuilder};

/// Serializable description of a repository's packages, as handed over by the
/// collaborator that reads the manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub packages: Vec<PackageManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub peer_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
            peer_dependencies: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_dependency(mut self, kind: DependencyKind, name: &str, range: &str) -> Self {
        self.section_mut(kind).insert(name.to_string(), range.to_string());
        self
    }

    #[must_use]
    pub fn section(&self, kind: DependencyKind) -> &IndexMap<String, String> {
        match kind {
            DependencyKind::Normal => &self.dependencies,
            DependencyKind::Dev => &self.dev_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
        }
    }

    fn section_mut(&mut self, kind: DependencyKind) -> &mut IndexMap<String, String> {
        match kind {
            DependencyKind::Normal => &mut self.dependencies,
            DependencyKind::Dev => &mut self.dev_dependencies,
            DependencyKind::Peer => &mut self.peer_dependencies,
        }
    }
}

impl GraphSnapshot {
    /// Builds the validated graph. Edges are declared per package in section order:
    /// `dependencies`, then `devDependencies`, then `peerDependencies`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError` for invalid versions, duplicate packages, or edges to packages
    /// missing from the snapshot.
    pub fn into_graph(self) -> Result<DependencyGraph, GraphError> {
        let mut builder = GraphBuilder::default();

        for manifest in &self.packages {
            builder.add_package_str(manifest.name.clone(), &manifest.version)?;
        }

        for manifest in &self.packages {
            for kind in DependencyKind::ALL {
                for (dependency, range) in manifest.section(kind) {
                    builder.add_dependency(manifest.name.clone(), dependency.clone(), kind, range)?;
                }
            }
        }

        builder.build()
    }
}

impl TryFrom<GraphSnapshot> for DependencyGraph {
    type Error = GraphError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self, Self::Error> {
        snapshot.into_graph()
    }
}
