use changeset_core::DependencyKind;
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("package '{name}' is declared more than once")]
    DuplicatePackage { name: String },

    #[error("invalid version '{version}' for package '{name}'")]
    InvalidVersion {
        name: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("version '{version}' of package '{name}' has a component that cannot be bumped")]
    UnbumpableVersion { name: String, version: Version },

    #[error("'{dependent}' declares '{dependency}' more than once in {kind}")]
    DuplicateEdge {
        dependent: String,
        dependency: String,
        kind: DependencyKind,
    },

    #[error(
        "{kind} edge '{dependent}' -> '{dependency}' references '{missing}', which is not part of the graph"
    )]
    DanglingEdge {
        dependent: String,
        dependency: String,
        kind: DependencyKind,
        missing: String,
    },
}
