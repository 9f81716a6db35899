mod config;
mod error;
mod manifest;
mod plan;
pub mod rules;
mod session;

pub use config::{PropagationConfig, parse_propagation_config};
pub use error::{ConfigError, PlanError};
pub use plan::{
    PackageVersion, ReleaseDecision, ReleasePlan, compute_release_plan,
    compute_release_plan_with_config, plan_from_snapshot,
};

pub type Result<T> = std::result::Result<T, PlanError>;
