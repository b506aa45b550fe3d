//! Versioned on-disk tool cache.

use crate::archive::{copy_dir_all, extract_tar_gz, file_sha256};
use crate::download::Downloader;
use crate::error::ToolCacheError;
use crate::spec::{host_arch, ToolSpec};
use crate::{Result, ToolProvisioner};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// How a provisioned tool was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionSource {
    /// A complete cache entry already existed.
    Cached,
    /// The archive was downloaded and cached during this call.
    Downloaded,
}

/// A tool directory ready to be put on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    /// Directory containing the executable.
    pub path: PathBuf,
    /// Whether the directory came from the cache or a fresh download.
    pub source: ProvisionSource,
}

/// Tool cache rooted at a directory, keyed by (name, version, arch).
pub struct ToolCache {
    root: PathBuf,
    temp_dir: PathBuf,
    arch: String,
    downloader: Arc<dyn Downloader>,
}

impl ToolCache {
    /// Create a cache at `root` that stages downloads under `temp_dir`.
    pub fn new(
        root: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        ToolCache {
            root: root.into(),
            temp_dir: temp_dir.into(),
            arch: host_arch().to_string(),
            downloader,
        }
    }

    /// Override the architecture segment of the layout.
    pub fn with_arch(mut self, arch: &str) -> Self {
        self.arch = arch.to_string();
        self
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version).join(&self.arch)
    }

    fn marker_path(&self, name: &str, version: &str) -> PathBuf {
        self.root
            .join(name)
            .join(version)
            .join(format!("{}.complete", self.arch))
    }

    /// Look up a complete entry for (name, version).
    ///
    /// A directory without its `.complete` marker is a partial write from
    /// an interrupted run and counts as a miss.
    pub fn find(&self, name: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(name, version);
        if dir.is_dir() && self.marker_path(name, version).is_file() {
            Some(dir)
        } else {
            None
        }
    }

    /// Copy `source` into the cache under (name, version) and mark it complete.
    pub fn cache_dir(&self, source: &Path, name: &str, version: &str) -> Result<PathBuf> {
        let dest = self.entry_dir(name, version);
        let marker = self.marker_path(name, version);

        if marker.exists() {
            std::fs::remove_file(&marker)?;
        }
        if dest.exists() {
            std::fs::remove_dir_all(&dest)?;
        }

        copy_dir_all(source, &dest)?;
        std::fs::write(&marker, b"")?;

        debug!(dest = %dest.display(), "Registered cache entry");
        Ok(dest)
    }

    async fn download_and_cache(&self, spec: &ToolSpec) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.temp_dir)?;
        let staging = tempfile::Builder::new()
            .prefix(&format!("{}-", spec.name))
            .tempdir_in(&self.temp_dir)?;

        let archive = staging.path().join("archive.tar.gz");
        self.downloader.download(spec.url, &archive).await?;

        let digest = file_sha256(&archive)?;
        debug!(tool = %spec.label(), sha256 = %digest, "Archive digest");
        if let Some(expected) = spec.sha256 {
            if !expected.eq_ignore_ascii_case(&digest) {
                return Err(ToolCacheError::ChecksumMismatch {
                    tool: spec.label(),
                    expected: expected.to_string(),
                    actual: digest,
                });
            }
        }

        let extracted = staging.path().join("extracted");
        extract_tar_gz(&archive, &extracted)?;

        self.cache_dir(&extracted, spec.name, spec.version)
    }
}

#[async_trait]
impl ToolProvisioner for ToolCache {
    async fn ensure(&self, spec: &ToolSpec) -> Result<Provisioned> {
        if let Some(path) = self.find(spec.name, spec.version) {
            info!(tool = %spec.label(), path = %path.display(), "Tool found in cache");
            return Ok(Provisioned {
                path,
                source: ProvisionSource::Cached,
            });
        }

        info!(tool = %spec.label(), "Tool not cached, fetching");
        let path = self.download_and_cache(spec).await?;
        info!(tool = %spec.label(), path = %path.display(), "Tool cached");

        Ok(Provisioned {
            path,
            source: ProvisionSource::Downloaded,
        })
    }
}
