//! Integration tests for ToolCache provisioning with StaticDownloader.

use std::sync::Arc;

use tempfile::TempDir;
use tool_cache::fakes::{tar_gz, StaticDownloader};
use tool_cache::{ProvisionSource, ToolCache, ToolCacheError, ToolProvisioner, ToolSpec, KUSTOMIZE};

fn kustomize_archive() -> Vec<u8> {
    tar_gz(&[("kustomize", b"#!/bin/sh\nexit 0\n", 0o755)])
}

fn cache(dir: &TempDir, downloader: Arc<StaticDownloader>) -> ToolCache {
    ToolCache::new(dir.path().join("tool-cache"), dir.path().join("tmp"), downloader)
        .with_arch("x64")
}

/// Test: a miss downloads once, extracts, and registers the entry
#[tokio::test]
async fn test_miss_downloads_and_caches() {
    let dir = TempDir::new().unwrap();
    let downloader = Arc::new(StaticDownloader::new(kustomize_archive()));
    let cache = cache(&dir, downloader.clone());

    let provisioned = cache.ensure(&KUSTOMIZE).await.expect("ensure failed");

    assert_eq!(provisioned.source, ProvisionSource::Downloaded);
    assert!(provisioned.path.join("kustomize").is_file());
    assert_eq!(downloader.requests(), vec![KUSTOMIZE.url.to_string()]);
    assert_eq!(
        cache.find("kustomize", "3.5.4"),
        Some(provisioned.path.clone()),
        "entry must be registered under the pinned version"
    );
}

/// Test: a hit never touches the downloader
#[tokio::test]
async fn test_hit_skips_download() {
    let dir = TempDir::new().unwrap();
    let downloader = Arc::new(StaticDownloader::new(kustomize_archive()));
    let cache = cache(&dir, downloader.clone());

    let first = cache.ensure(&KUSTOMIZE).await.unwrap();
    let second = cache.ensure(&KUSTOMIZE).await.unwrap();

    assert_eq!(second.source, ProvisionSource::Cached);
    assert_eq!(first.path, second.path);
    assert_eq!(downloader.call_count(), 1, "second ensure must not download");
}

/// Test: a pre-populated cache is used even when the network is down
#[tokio::test]
async fn test_prepopulated_cache_with_failing_network() {
    let dir = TempDir::new().unwrap();
    let downloader = Arc::new(StaticDownloader::failing());
    let cache = cache(&dir, downloader.clone());

    let entry = cache.root().join("kustomize/3.5.4/x64");
    std::fs::create_dir_all(&entry).unwrap();
    std::fs::write(entry.join("kustomize"), "bin").unwrap();
    std::fs::write(cache.root().join("kustomize/3.5.4/x64.complete"), "").unwrap();

    let provisioned = cache.ensure(&KUSTOMIZE).await.unwrap();
    assert_eq!(provisioned.path, entry);
    assert_eq!(downloader.call_count(), 0);
}

/// Test: download failure is fatal and leaves no entry behind
#[tokio::test]
async fn test_download_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let cache = cache(&dir, Arc::new(StaticDownloader::failing()));

    let err = cache.ensure(&KUSTOMIZE).await.unwrap_err();
    assert!(matches!(err, ToolCacheError::DownloadFailed { status: 404, .. }));
    assert!(cache.find("kustomize", "3.5.4").is_none());
}

/// Test: a pinned digest that does not match aborts before caching
#[tokio::test]
async fn test_checksum_mismatch_is_fatal() {
    let dir = TempDir::new().unwrap();
    let cache = cache(&dir, Arc::new(StaticDownloader::new(kustomize_archive())));

    let pinned = ToolSpec {
        sha256: Some("0000000000000000000000000000000000000000000000000000000000000000"),
        ..KUSTOMIZE
    };

    let err = cache.ensure(&pinned).await.unwrap_err();
    assert!(matches!(err, ToolCacheError::ChecksumMismatch { .. }));
    assert!(cache.find("kustomize", "3.5.4").is_none());
}

/// Test: a matching pinned digest is accepted
#[tokio::test]
async fn test_checksum_match_is_accepted() {
    let dir = TempDir::new().unwrap();
    let archive = kustomize_archive();

    let staged = dir.path().join("archive.tar.gz");
    std::fs::write(&staged, &archive).unwrap();
    let digest = tool_cache::file_sha256(&staged).unwrap();
    let digest: &'static str = Box::leak(digest.into_boxed_str());

    let cache = cache(&dir, Arc::new(StaticDownloader::new(archive)));
    let pinned = ToolSpec {
        sha256: Some(digest),
        ..KUSTOMIZE
    };

    let provisioned = cache.ensure(&pinned).await.unwrap();
    assert_eq!(provisioned.source, ProvisionSource::Downloaded);
}

/// Test: a corrupt archive surfaces as an extraction error
#[tokio::test]
async fn test_corrupt_archive_is_fatal() {
    let dir = TempDir::new().unwrap();
    let cache = cache(&dir, Arc::new(StaticDownloader::new(b"<html>oops</html>".to_vec())));

    let err = cache.ensure(&KUSTOMIZE).await.unwrap_err();
    assert!(matches!(err, ToolCacheError::Extraction { .. }));
}
