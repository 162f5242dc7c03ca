//! End-to-end config loading pipeline.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{flatten, unflatten, FlatMap};
use crate::error::ConfigError;
use crate::include::{resolve_includes, INCLUDE_MARKER};
use crate::node::ConfigNode;
use crate::reader::read_config;
use crate::substitute::{resolve_substitutions, SUBSTITUTION_MARKER, SUBSTITUTION_SPLITTER};
use crate::value::Tree;

/// Builder running the full pipeline over one config file:
/// read, flatten, resolve includes, resolve substitutions, unflatten.
///
/// ## Example
///
/// ```no_run
/// use conftree::Config;
///
/// let tree = Config::builder()
///     .with_file("config/app.yaml")
///     .build()?;
/// # Ok::<(), conftree::ConfigError>(())
/// ```
///
/// Use [`build_node`](Config::build_node) instead of
/// [`build`](Config::build) to get a [`ConfigNode`] with its multi-view
/// accessors rather than a plain [`Tree`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    path: Option<PathBuf>,
    include_marker: String,
    splitter: String,
    substitution_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            include_marker: INCLUDE_MARKER.to_string(),
            splitter: SUBSTITUTION_SPLITTER.to_string(),
            substitution_marker: SUBSTITUTION_MARKER.to_string(),
        }
    }
}

impl Config {
    /// Creates a builder with the default markers
    /// (`$include`, `" + "`, `$`).
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the config file to load. Includes referenced from it resolve
    /// relative to its directory.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the include directive marker.
    pub fn include_marker(mut self, marker: impl Into<String>) -> Self {
        self.include_marker = marker.into();
        self
    }

    /// Overrides the substitution splitter and reference marker.
    pub fn substitution(
        mut self,
        splitter: impl Into<String>,
        marker: impl Into<String>,
    ) -> Self {
        self.splitter = splitter.into();
        self.substitution_marker = marker.into();
        self
    }

    /// Runs the pipeline and reconstructs a plain nested [`Tree`].
    pub fn build(self) -> Result<Tree, ConfigError> {
        self.resolve().map(|flat| unflatten(&flat))
    }

    /// Runs the pipeline and reconstructs a [`ConfigNode`].
    pub fn build_node(self) -> Result<ConfigNode, ConfigError> {
        self.resolve().map(|flat| unflatten(&flat))
    }

    fn resolve(self) -> Result<FlatMap, ConfigError> {
        let path = self.path.ok_or(ConfigError::MissingSource)?;
        debug!(path = %path.display(), "loading config");

        let tree = read_config(&path)?;
        let flat = flatten(&tree);
        let flat = resolve_includes(&flat, &path, &self.include_marker)?;
        resolve_substitutions(&flat, &self.splitter, &self.substitution_marker)
    }
}
