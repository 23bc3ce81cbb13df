//! Project tree discovery: groups matching files by containing directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Mapping from directory path (relative to the project root) to the sorted
/// filenames in it that match the configured extension.
///
/// Built once per run; immutable afterward. Files directly under the root
/// are keyed by `"."`. Directories with no matching files do not appear.
pub type ProjectTree = BTreeMap<PathBuf, Vec<String>>;

/// Errors raised by [`FileDiscovery::discover`].
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The project root is missing or not a directory. Fatal to the run.
    #[error("project root {path} does not exist or is not a directory", path = .path.display())]
    NotFound {
        /// The offending root path.
        path: PathBuf,
    },
}

/// Walks a project root and collects files matching an extension filter.
pub struct FileDiscovery {
    extension: String,
    exclude_patterns: Vec<String>,
}

impl FileDiscovery {
    /// Creates a discovery pass for one file extension (e.g. `".py"`).
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Recursively visits every directory under `root` and groups matching
    /// filenames by containing directory.
    ///
    /// Output is deterministic for a fixed filesystem state: directories are
    /// ordered by path, filenames sorted. Unreadable entries below the root
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotFound`] if `root` does not exist or is
    /// not a directory.
    pub fn discover(&self, root: &Path) -> Result<ProjectTree, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::NotFound {
                path: root.to_path_buf(),
            });
        }

        let mut tree = ProjectTree::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("skipping unreadable entry during discovery: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.ends_with(&self.extension) {
                continue;
            }
            if self.should_exclude(entry.path()) {
                debug!("excluding: {}", entry.path().display());
                continue;
            }

            let dir = entry
                .path()
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let dir = if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir
            };
            tree.entry(dir).or_default().push(name.to_string());
        }

        for files in tree.values_mut() {
            files.sort();
        }
        Ok(tree)
    }

    /// Checks if a path matches any exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/__pycache__/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}
