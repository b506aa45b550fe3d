//! Pinned tool descriptions.

use serde::Serialize;

/// A tool release pinned to one version and one download location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    /// Executable and cache key name.
    pub name: &'static str,

    /// Exact version string used as the second cache key.
    pub version: &'static str,

    /// Tarball (gzip tar) holding the executable at its root.
    pub url: &'static str,

    /// Lowercase hex SHA-256 of the tarball, when known.
    pub sha256: Option<&'static str>,
}

/// The kustomize release used to edit overlays.
pub const KUSTOMIZE: ToolSpec = ToolSpec {
    name: "kustomize",
    version: "3.5.4",
    url: "https://github.com/kubernetes-sigs/kustomize/releases/download/kustomize%2Fv3.5.4/kustomize_v3.5.4_linux_amd64.tar.gz",
    sha256: None,
};

impl ToolSpec {
    /// `name@version`, used in log lines.
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Architecture segment of the cache layout for the running host.
///
/// Uses the runner naming (`x64`, `arm64`) so entries line up with caches
/// populated by other tooling on the same machine.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x32",
        other => other,
    }
}
