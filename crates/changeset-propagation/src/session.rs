use changeset_core::{BumpType, PackageRelease};
use changeset_graph::DependencyGraph;
use changeset_version::{bump_version, max_bump_type};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};

use crate::config::PropagationConfig;
use crate::error::PlanError;
use crate::plan::{ReleaseDecision, ReleasePlan};
use crate::rules;

#[derive(Debug)]
struct Decision {
    bump_type: BumpType,
    explicit: bool,
    dependencies: IndexSet<String>,
}

impl Decision {
    // Explicit releases only explain themselves once propagation escalated them.
    fn records_triggers(&self) -> bool {
        !self.explicit || !self.dependencies.is_empty()
    }
}

/// Owns the release decisions while they are propagated through one graph.
pub(crate) struct PropagationSession<'a> {
    graph: &'a DependencyGraph,
    config: &'a PropagationConfig,
    decisions: IndexMap<String, Decision>,
    explicit_count: usize,
}

impl<'a> PropagationSession<'a> {
    pub(crate) fn new(graph: &'a DependencyGraph, config: &'a PropagationConfig) -> Self {
        Self {
            graph,
            config,
            decisions: IndexMap::new(),
            explicit_count: 0,
        }
    }

    /// Records the explicit requests. Repeated requests for one package keep the most severe.
    pub(crate) fn seed(&mut self, explicit: &[PackageRelease]) -> Result<(), PlanError> {
        let mut bumps_by_package: IndexMap<&str, Vec<BumpType>> = IndexMap::new();

        for release in explicit {
            if !self.graph.contains(&release.name) {
                return Err(PlanError::UnknownPackage {
                    name: release.name.clone(),
                    available: self.graph.package_names().join(", "),
                });
            }
            bumps_by_package
                .entry(release.name.as_str())
                .or_default()
                .push(release.bump_type);
        }

        for (name, bumps) in bumps_by_package {
            let Some(bump_type) = max_bump_type(&bumps) else {
                continue;
            };
            self.decisions.insert(
                name.to_string(),
                Decision {
                    bump_type,
                    explicit: true,
                    dependencies: IndexSet::new(),
                },
            );
        }

        self.explicit_count = self.decisions.len();
        Ok(())
    }

    /// Runs passes until one neither adds nor escalates a release.
    pub(crate) fn run(mut self) -> ReleasePlan {
        let mut frontier: Vec<String> = self.decisions.keys().cloned().collect();
        let mut passes = 0_usize;

        while !frontier.is_empty() {
            passes += 1;
            debug!(pass = passes, frontier = frontier.len(), "propagation pass");

            let mut next = IndexSet::new();
            for name in &frontier {
                self.propagate_from(name, &mut next);
            }
            frontier = next.into_iter().collect();
        }

        debug!(
            passes,
            releases = self.decisions.len(),
            "release decisions reached a fixed point"
        );
        self.into_plan(passes)
    }

    fn propagate_from(&mut self, name: &str, next: &mut IndexSet<String>) {
        let graph = self.graph;
        let Some(upstream) = self.decisions.get(name).map(|d| d.bump_type) else {
            return;
        };
        let Some(package) = graph.package(name) else {
            return;
        };
        let new_version = bump_version(&package.version, upstream);

        for edge in graph.dependent_edges(name) {
            if edge.range.is_ambiguous() {
                warn!(
                    dependent = %edge.dependent,
                    dependency = %edge.dependency,
                    range = %edge.range,
                    "unrecognized version range, treating it as admitting every version"
                );
            }

            match rules::required_bump(edge, upstream, &new_version) {
                Some(bump) if self.config.is_ignored(&edge.dependent) => {
                    debug!(
                        dependent = %edge.dependent,
                        dependency = name,
                        %bump,
                        "skipping ignored dependent"
                    );
                }
                Some(bump) => {
                    debug!(
                        dependent = %edge.dependent,
                        dependency = name,
                        kind = %edge.kind,
                        %bump,
                        new_version = %new_version,
                        "dependency release triggers dependent"
                    );
                    if self.escalate(&edge.dependent, bump, name) {
                        next.insert(edge.dependent.clone());
                    }
                }
                None => {
                    trace!(
                        dependent = %edge.dependent,
                        dependency = name,
                        kind = %edge.kind,
                        range = %edge.range,
                        "range admits new version"
                    );
                    self.note_dependency(&edge.dependent, name);
                }
            }
        }
    }

    /// Applies `bump` to `dependent`; returns whether its decision is new or more severe.
    fn escalate(&mut self, dependent: &str, bump: BumpType, dependency: &str) -> bool {
        let co_releasing = self.co_releasing_dependencies(dependent, dependency);

        match self.decisions.get_mut(dependent) {
            Some(decision) if bump > decision.bump_type => {
                debug!(
                    package = dependent,
                    from = %decision.bump_type,
                    to = %bump,
                    "escalating release"
                );
                let first_trigger = decision.dependencies.is_empty();
                decision.bump_type = bump;
                decision.dependencies.insert(dependency.to_string());
                if first_trigger {
                    decision.dependencies.extend(co_releasing);
                }
                true
            }
            Some(decision) => {
                if decision.records_triggers() {
                    decision.dependencies.insert(dependency.to_string());
                }
                false
            }
            None => {
                let mut dependencies = IndexSet::new();
                dependencies.insert(dependency.to_string());
                dependencies.extend(co_releasing);
                self.decisions.insert(
                    dependent.to_string(),
                    Decision {
                        bump_type: bump,
                        explicit: false,
                        dependencies,
                    },
                );
                true
            }
        }
    }

    // A released dependent also lists releasing dependencies that did not trigger it.
    fn note_dependency(&mut self, dependent: &str, dependency: &str) {
        if let Some(decision) = self.decisions.get_mut(dependent)
            && decision.records_triggers()
        {
            decision.dependencies.insert(dependency.to_string());
        }
    }

    fn co_releasing_dependencies(&self, dependent: &str, trigger: &str) -> Vec<String> {
        self.graph
            .dependency_edges(dependent)
            .into_iter()
            .map(|edge| edge.dependency.as_str())
            .filter(|name| *name != trigger && self.decisions.contains_key(*name))
            .map(ToString::to_string)
            .collect()
    }

    fn into_plan(self, passes: usize) -> ReleasePlan {
        let releases = self
            .decisions
            .into_iter()
            .map(|(name, decision)| ReleaseDecision {
                name,
                bump_type: decision.bump_type,
                dependencies: decision.dependencies.into_iter().collect(),
            })
            .collect();

        ReleasePlan::new(releases, self.explicit_count, passes)
    }
}
