//! UI5 version resolution.
//!
//! # Data Flow
//! ```text
//! Ui5Config (explicit version?)
//!     → resolve_version
//!     → ManifestStore (one glob query, cached)
//!     → manifest.rs (extract minUI5Version)
//!     → ResolvedVersion { version, source }
//! ```
//!
//! # Design Decisions
//! - Strict precedence: configuration > manifest.json > latest
//! - Resolution runs once, before the server accepts traffic
//! - The manifest is read at most once per dispatcher lifetime
//! - A manifest that exists but is not valid JSON aborts startup; a pinned
//!   version must never silently degrade to "latest"

pub mod manifest;

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::Ui5Config;
use crate::resources::{ResourceError, ResourceReader};

pub use manifest::Manifest;

/// Error type for version resolution.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("manifest {} is not valid JSON: {source}", path.display())]
    ManifestMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to read project resources: {0}")]
    ResourceReader(#[from] ResourceError),
}

/// Where the resolved version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Configuration,
    Manifest,
    Latest,
}

/// Outcome of version resolution. `version: None` means the upstream host
/// serves its latest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: Option<String>,
    pub source: VersionSource,
}

/// Caches the project's manifest behind a one-time-init guard.
///
/// `load` may be called any number of times; the glob query is issued at
/// most once per store lifetime, even under concurrent callers.
pub struct ManifestStore<R> {
    reader: R,
    cell: OnceCell<Option<Manifest>>,
}

impl<R: ResourceReader> ManifestStore<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cell: OnceCell::new(),
        }
    }

    /// The project manifest, if one exists. A missing manifest is not an
    /// error; an unreadable or malformed one is.
    pub async fn load(&self) -> Result<Option<&Manifest>, VersionError> {
        let cached = self
            .cell
            .get_or_try_init(|| async {
                let files = self.reader.by_glob("**/manifest.json").await?;

                match files.first() {
                    Some(file) => {
                        let manifest = Manifest::parse(file.text()).map_err(|source| {
                            VersionError::ManifestMalformed {
                                path: file.path().to_path_buf(),
                                source,
                            }
                        })?;
                        Ok::<_, VersionError>(Some(manifest))
                    }
                    None => Ok(None),
                }
            })
            .await?;

        Ok(cached.as_ref())
    }
}

/// Resolve the UI5 version to pin the upstream target to.
///
/// Precedence, short-circuiting: explicit configuration, then the project
/// manifest's `minUI5Version`, then none (latest).
pub async fn resolve_version<R: ResourceReader>(
    config: &Ui5Config,
    manifests: &ManifestStore<R>,
) -> Result<ResolvedVersion, VersionError> {
    if let Some(version) = config.version.as_deref().filter(|v| !v.is_empty()) {
        tracing::info!(version = %version, "Using UI5 version from proxy configuration");
        return Ok(ResolvedVersion {
            version: Some(version.to_string()),
            source: VersionSource::Configuration,
        });
    }

    if let Some(manifest) = manifests.load().await? {
        if let Some(version) = manifest.min_ui5_version() {
            tracing::info!(version = %version, "Using minUI5Version from manifest.json");
            return Ok(ResolvedVersion {
                version: Some(version.to_string()),
                source: VersionSource::Manifest,
            });
        }
    }

    tracing::info!("No UI5 version configured or declared, proxying latest");
    Ok(ResolvedVersion {
        version: None,
        source: VersionSource::Latest,
    })
}
