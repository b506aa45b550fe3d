//! In-memory fakes for the download seam (testing only)
//!
//! `StaticDownloader` serves a fixed payload for every URL and records what
//! was requested, so callers can assert that a cache hit never touches the
//! network.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::download::Downloader;
use crate::error::ToolCacheError;
use crate::Result;

/// Downloader that writes canned bytes instead of hitting the network.
#[derive(Debug, Default)]
pub struct StaticDownloader {
    payload: Option<Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StaticDownloader {
    /// Serve `payload` for every request.
    pub fn new(payload: Vec<u8>) -> Self {
        StaticDownloader {
            payload: Some(payload),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with HTTP 404.
    pub fn failing() -> Self {
        Self::default()
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of download calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Downloader for StaticDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.requests.lock().unwrap().push(url.to_string());
        match &self.payload {
            Some(bytes) => {
                std::fs::write(dest, bytes)?;
                Ok(())
            }
            None => Err(ToolCacheError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Build an in-memory `.tar.gz` from `(path, content, mode)` entries.
pub fn tar_gz(files: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *content)
            .expect("append to in-memory tar");
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .expect("finish in-memory tar.gz")
}
