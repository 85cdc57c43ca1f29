//! Project resource access.
//!
//! # Responsibilities
//! - Abstract how project files are located and read (the dispatcher only
//!   ever asks for `**/manifest.json`)
//! - Provide the filesystem-backed production implementation
//!
//! # Design Decisions
//! - Reader is a trait so tests can substitute in-memory fixtures and
//!   observe how often the glob query is issued
//! - Resources carry their content; matches are few and small

pub mod fs;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use fs::FsResourceReader;

/// Error type for resource access.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A project file matched by a glob query.
#[derive(Debug, Clone)]
pub struct Resource {
    path: PathBuf,
    text: String,
}

impl Resource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Collaborator that locates project files by glob pattern.
pub trait ResourceReader {
    /// Return all resources matching `pattern`, in a stable order.
    fn by_glob(
        &self,
        pattern: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Resource>, ResourceError>> + Send;
}
