mod blocking;
pub mod interrupt;
pub mod progress;
pub mod utils;

use std::path::{Path, PathBuf};
use url::Url;

pub use blocking::HttpDownloader;
pub use interrupt::InterruptGuard;

/// Outcome of a finished transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-1 of the bytes written to `path`.
    pub sha1: String,
}

impl DownloadResult {
    pub fn sha1_matches(&self, expected: &str) -> bool {
        self.sha1.eq_ignore_ascii_case(expected.trim())
    }
}

/// Fetches a resource of known size and reports the digest of what it wrote.
pub trait Downloader {
    fn fetch(&self, size: u64, url: &Url, dest: &Path) -> anyhow::Result<DownloadResult>;
}
