//! Tool-Cache: versioned tool provisioning for kustomize-bump
//!
//! Ensures a pinned release of an external tool is present on disk,
//! downloading and unpacking its tarball only when the cache has no
//! complete entry for the requested (name, version) pair.
//!
//! ## Layout
//!
//! ```text
//! <root>/<name>/<version>/<arch>/          extracted tool
//! <root>/<name>/<version>/<arch>.complete  marker written last
//! ```

pub mod archive;
pub mod cache;
pub mod download;
pub mod error;
pub mod fakes;
pub mod spec;

use async_trait::async_trait;

pub use archive::{copy_dir_all, extract_tar_gz, file_sha256};
pub use cache::{ProvisionSource, Provisioned, ToolCache};
pub use download::{Downloader, HttpDownloader};
pub use error::ToolCacheError;
pub use spec::{host_arch, ToolSpec, KUSTOMIZE};

/// Result type for tool cache operations
pub type Result<T> = std::result::Result<T, ToolCacheError>;

/// Anything that can make a tool resolvable on disk.
///
/// Implemented by [`ToolCache`]; the orchestrator only sees this trait so
/// tests can swap in a cache rooted in a temp directory.
#[async_trait]
pub trait ToolProvisioner: Send + Sync {
    /// Ensure `spec` is available and return the directory holding it.
    async fn ensure(&self, spec: &ToolSpec) -> Result<Provisioned>;
}
