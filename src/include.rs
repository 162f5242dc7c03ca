//! `$include` directive resolution.
//!
//! An include directive is a string leaf beginning with the marker; the
//! remainder names another config file whose flattened content is spliced
//! in as a subtree rooted at the including key.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{flatten, FlatMap};
use crate::error::ConfigError;
use crate::reader::read_config;

/// Default marker that opens an include directive.
pub const INCLUDE_MARKER: &str = "$include";

/// Replaces every include directive in `flat` with the flattened,
/// recursively-resolved contents of the referenced file.
///
/// Directive targets are resolved relative to `source_path`'s directory
/// first, then tried as given (absolute or cwd-relative). A target that
/// exists under neither candidate is a hard [`ConfigError::ConfigNotFound`];
/// no partial result is returned. Each included file resolves its own
/// includes against its own directory, so nesting works to arbitrary depth.
/// Re-entering a file that is still being resolved fails with
/// [`ConfigError::CircularInclude`].
pub fn resolve_includes(
    flat: &FlatMap,
    source_path: &Path,
    marker: &str,
) -> Result<FlatMap, ConfigError> {
    let mut in_progress = HashSet::new();
    if let Ok(canonical) = source_path.canonicalize() {
        in_progress.insert(canonical);
    }
    resolve_level(flat, source_path, marker, &mut in_progress)
}

fn resolve_level(
    flat: &FlatMap,
    source_path: &Path,
    marker: &str,
    in_progress: &mut HashSet<PathBuf>,
) -> Result<FlatMap, ConfigError> {
    let base_dir = source_path.parent().unwrap_or_else(|| Path::new(""));
    let mut resolved = FlatMap::new();

    for (chain, value) in flat {
        let directive = match value.as_str().and_then(|s| s.strip_prefix(marker)) {
            Some(rest) => rest,
            None => {
                resolved.insert(chain.clone(), value.clone());
                continue;
            }
        };

        let target = directive.trim();
        let relative = base_dir.join(target);
        let path = if relative.exists() {
            relative
        } else if Path::new(target).exists() {
            PathBuf::from(target)
        } else {
            return Err(ConfigError::ConfigNotFound(target.to_string()));
        };

        let canonical = path.canonicalize().map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        if !in_progress.insert(canonical.clone()) {
            return Err(ConfigError::CircularInclude(path));
        }

        debug!(key = %chain, target = %path.display(), "resolving include");
        let included = read_config(&path)?;
        let included = resolve_level(&flatten(&included), &path, marker, in_progress)?;
        in_progress.remove(&canonical);

        for (inner_chain, inner_value) in included {
            resolved.insert(inner_chain.prefixed_by(chain), inner_value);
        }
    }

    Ok(resolved)
}
