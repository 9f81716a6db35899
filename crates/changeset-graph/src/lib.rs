mod error;
mod graph;
mod snapshot;

pub use error::GraphError;
pub use graph::{DependencyEdge, DependencyGraph, GraphBuilder, Package};
pub use snapshot::{GraphSnapshot, PackageManifest};

pub type Result<T> = std::result::Result<T, GraphError>;
