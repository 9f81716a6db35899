use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ConfigError;
use crate::manifest::Manifest;

/// Settings read from the `[workspace.metadata.changeset]` table.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    ignore: GlobSet,
    ignore_patterns: Vec<String>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            ignore: GlobSet::empty(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl PropagationConfig {
    /// Reads the configuration from the contents of a `Cargo.toml`-style manifest.
    ///
    /// A missing `changeset` metadata table yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or an ignore pattern is not a valid glob.
    pub fn from_manifest_str(content: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(content)?;
        Self::from_manifest(manifest)
    }

    fn from_manifest(manifest: Manifest) -> Result<Self, ConfigError> {
        let patterns = manifest
            .into_changeset_metadata()
            .map(|cs| cs.ignore)
            .unwrap_or_default();

        Ok(Self {
            ignore: build_glob_set(&patterns)?,
            ignore_patterns: patterns,
        })
    }

    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Whether propagation must leave `package` alone.
    #[must_use]
    pub fn is_ignored(&self, package: &str) -> bool {
        self.ignore.is_match(package)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::GlobPattern` if a pattern is not a valid glob.
    #[cfg(any(test, feature = "testing"))]
    pub fn with_ignore(mut self, patterns: &[&str]) -> Result<Self, ConfigError> {
        self.ignore_patterns = patterns.iter().map(ToString::to_string).collect();
        self.ignore = build_glob_set(&self.ignore_patterns)?;
        Ok(self)
    }
}

/// Parses the propagation configuration of the manifest at `manifest_path`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if glob patterns are invalid.
pub fn parse_propagation_config(manifest_path: &Path) -> Result<PropagationConfig, ConfigError> {
    let content =
        std::fs::read_to_string(manifest_path).map_err(|source| ConfigError::ManifestRead {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    let manifest: Manifest =
        toml::from_str(&content).map_err(|source| ConfigError::ManifestParse {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    PropagationConfig::from_manifest(manifest)
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}
