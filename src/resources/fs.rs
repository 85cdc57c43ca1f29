//! Filesystem-backed resource reader.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::resources::{Resource, ResourceError, ResourceReader};

/// Directories never considered part of the project sources.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "target", ".git"];

/// Reads project files from a directory tree.
#[derive(Debug, Clone)]
pub struct FsResourceReader {
    root: PathBuf,
}

impl FsResourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a matched path lies inside a skipped directory. Only
    /// components below the project root count; the root itself may live
    /// under a directory named like one of them.
    fn is_skipped(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|name| SKIPPED_DIRS.contains(&name))
                .unwrap_or(false)
        })
    }
}

impl ResourceReader for FsResourceReader {
    async fn by_glob(&self, pattern: &str) -> Result<Vec<Resource>, ResourceError> {
        // Escape the root so directory names with glob metacharacters
        // don't alter the pattern.
        let full_pattern = format!(
            "{}/{}",
            Pattern::escape(&self.root.to_string_lossy()),
            pattern
        );

        let paths = glob::glob(&full_pattern).map_err(|source| ResourceError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matches: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|path| path.is_file() && !self.is_skipped(path))
            .collect();
        matches.sort();

        let mut resources = Vec::with_capacity(matches.len());
        for path in matches {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ResourceError::Io {
                    path: path.clone(),
                    source,
                })?;
            resources.push(Resource::new(path, text));
        }

        Ok(resources)
    }
}
