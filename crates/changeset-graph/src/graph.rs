use std::collections::HashMap;

use changeset_core::DependencyKind;
use changeset_version::{DeclaredRange, is_bumpable};
use indexmap::{IndexMap, IndexSet};
use semver::Version;

use crate::error::GraphError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
}

/// A directed edge from `dependent` to the `dependency` it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub dependent: String,
    pub dependency: String,
    pub kind: DependencyKind,
    pub range: DeclaredRange,
}

/// Validated, read-only view of the packages in a repository and the edges between them.
///
/// Every edge endpoint is guaranteed to be a package of the graph. Packages and
/// edges keep the order they were declared in.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    packages: IndexMap<String, Package>,
    edges: Vec<DependencyEdge>,
    dependents: HashMap<String, Vec<usize>>,
    dependencies: HashMap<String, Vec<usize>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    #[must_use]
    pub fn package_names(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Edges pointing at `name`, in declaration order.
    #[must_use]
    pub fn dependent_edges(&self, name: &str) -> Vec<&DependencyEdge> {
        self.edges_at(&self.dependents, name)
    }

    /// Edges declared by `name`, in declaration order.
    #[must_use]
    pub fn dependency_edges(&self, name: &str) -> Vec<&DependencyEdge> {
        self.edges_at(&self.dependencies, name)
    }

    /// Packages declaring a dependency on `name`, restricted to `kind` when given.
    ///
    /// A dependent with several matching edges is returned once.
    #[must_use]
    pub fn dependents_of(&self, name: &str, kind: Option<DependencyKind>) -> Vec<&Package> {
        let names: IndexSet<&str> = self
            .dependent_edges(name)
            .into_iter()
            .filter(|edge| kind.is_none_or(|kind| edge.kind == kind))
            .map(|edge| edge.dependent.as_str())
            .collect();

        names
            .into_iter()
            .filter_map(|name| self.packages.get(name))
            .collect()
    }

    /// All edges from `dependent` to `dependency`, at most one per kind.
    #[must_use]
    pub fn edge_between(&self, dependent: &str, dependency: &str) -> Vec<&DependencyEdge> {
        self.dependency_edges(dependent)
            .into_iter()
            .filter(|edge| edge.dependency == dependency)
            .collect()
    }

    fn edges_at(&self, index: &HashMap<String, Vec<usize>>, name: &str) -> Vec<&DependencyEdge> {
        index
            .get(name)
            .map(|positions| positions.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    packages: IndexMap<String, Package>,
    edges: Vec<DependencyEdge>,
}

impl GraphBuilder {
    /// # Errors
    ///
    /// Returns `GraphError::DuplicatePackage` if a package with the same name was already added,
    /// or `GraphError::UnbumpableVersion` if a version component is already at its maximum.
    pub fn add_package(
        &mut self,
        name: impl Into<String>,
        version: Version,
    ) -> Result<&mut Self, GraphError> {
        let name = name.into();
        if self.packages.contains_key(&name) {
            return Err(GraphError::DuplicatePackage { name });
        }
        if !is_bumpable(&version) {
            return Err(GraphError::UnbumpableVersion { name, version });
        }
        self.packages.insert(name.clone(), Package { name, version });
        Ok(self)
    }

    /// Adds a package whose version is still a manifest string.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidVersion` if `version` is not a semantic version, and
    /// otherwise the errors of [`GraphBuilder::add_package`].
    pub fn add_package_str(
        &mut self,
        name: impl Into<String>,
        version: &str,
    ) -> Result<&mut Self, GraphError> {
        let name = name.into();
        let parsed = Version::parse(version).map_err(|source| GraphError::InvalidVersion {
            name: name.clone(),
            version: version.to_string(),
            source,
        })?;
        self.add_package(name, parsed)
    }

    /// Declares that `dependent` depends on `dependency` with the given range.
    ///
    /// Endpoints are checked when the graph is built, so packages may be added in any order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DuplicateEdge` if the same pair was already declared for `kind`.
    pub fn add_dependency(
        &mut self,
        dependent: impl Into<String>,
        dependency: impl Into<String>,
        kind: DependencyKind,
        range: &str,
    ) -> Result<&mut Self, GraphError> {
        let dependent = dependent.into();
        let dependency = dependency.into();

        let duplicate = self.edges.iter().any(|edge| {
            edge.kind == kind && edge.dependent == dependent && edge.dependency == dependency
        });
        if duplicate {
            return Err(GraphError::DuplicateEdge {
                dependent,
                dependency,
                kind,
            });
        }

        self.edges.push(DependencyEdge {
            dependent,
            dependency,
            kind,
            range: DeclaredRange::new(range),
        });
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `GraphError::DanglingEdge` if an edge references a package that was never added.
    pub fn build(self) -> Result<DependencyGraph, GraphError> {
        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dependencies: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, edge) in self.edges.iter().enumerate() {
            let missing = [&edge.dependent, &edge.dependency]
                .into_iter()
                .find(|name| !self.packages.contains_key(name.as_str()));
            if let Some(missing) = missing {
                return Err(GraphError::DanglingEdge {
                    dependent: edge.dependent.clone(),
                    dependency: edge.dependency.clone(),
                    kind: edge.kind,
                    missing: missing.clone(),
                });
            }

            dependents
                .entry(edge.dependency.clone())
                .or_default()
                .push(position);
            dependencies
                .entry(edge.dependent.clone())
                .or_default()
                .push(position);
        }

        Ok(DependencyGraph {
            packages: self.packages,
            edges: self.edges,
            dependents,
            dependencies,
        })
    }
}
