//! Archive extraction and directory helpers.

use crate::error::ToolCacheError;
use crate::Result;
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// Extract a gzip-compressed tar archive into `target_dir`.
///
/// The target directory is created if missing. Entry permissions from the
/// archive are kept so executables stay executable.
pub fn extract_tar_gz(archive_path: &Path, target_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(target_dir)?;

    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .unpack(target_dir)
        .map_err(|e| ToolCacheError::Extraction {
            archive: archive_path.display().to_string(),
            reason: e.to_string(),
        })?;

    tracing::debug!(
        archive = %archive_path.display(),
        target = %target_dir.display(),
        "Extracted tool archive"
    );

    Ok(())
}

/// Recursively copy the contents of `src` into `dst`.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            std::fs::copy(&from, &to)?;
        }
    }

    Ok(())
}

/// SHA-256 of a file as lowercase hex.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
