use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Graph(#[from] changeset_graph::GraphError),

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest at '{path}'")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML parse error")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid ignore pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
