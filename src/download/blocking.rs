use anyhow::{Context, bail};
use sha1::{Digest, Sha1};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use crate::download::interrupt::InterruptGuard;
use crate::download::progress::{ProgressTracker, TransferBar};
use crate::download::{DownloadResult, Downloader};

/// Blocking HTTP transfer with a progress bar. Must run off the async
/// runtime's worker threads.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
    chunk_size: usize,
    interrupt: InterruptGuard,
}

impl HttpDownloader {
    pub fn new(chunk_size: usize, interrupt: InterruptGuard) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            chunk_size,
            interrupt,
        }
    }
}

impl Downloader for HttpDownloader {
    fn fetch(&self, size: u64, url: &Url, dest: &Path) -> anyhow::Result<DownloadResult> {
        info!(%url, dest = %dest.display(), size, "starting stemcell download");
        let _transfer = self.interrupt.begin_transfer();
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("request {}", url))?;
        if !response.status().is_success() {
            bail!("Received HTTP {} from {}.", response.status().as_u16(), url);
        }
        if let Some(len) = response.content_length()
            && len != size
        {
            warn!(expected = size, announced = len, "content length differs from index");
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }

        let label = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        let bar = TransferBar::new(&label, size, self.interrupt.clone());
        let (bytes, sha1) = copy_with_progress(&mut response, dest, self.chunk_size, &bar)?;
        Ok(DownloadResult {
            path: dest.to_path_buf(),
            bytes,
            sha1,
        })
    }
}

/// Streams `source` into `dest`, hashing as it goes. Returns the byte count
/// and the hex SHA-1 of what was written.
pub(crate) fn copy_with_progress<R: Read, P: ProgressTracker>(
    source: &mut R,
    dest: &Path,
    chunk_size: usize,
    bar: &P,
) -> anyhow::Result<(u64, String)> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .with_context(|| format!("open {}", dest.display()))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0; chunk_size.max(1)];
    let mut downloaded: u64 = 0;
    loop {
        if bar.interrupted() {
            file.sync_all()?;
            bar.abandon(downloaded);
            bail!("Download cancelled by user.");
        }
        let data = source.read(&mut buffer[..])?;
        if data == 0 {
            break;
        }
        hasher.update(&buffer[..data]);
        file.write_all(&buffer[..data])
            .with_context(|| format!("write {}", dest.display()))?;
        downloaded += data as u64;
        bar.update_progress(downloaded);
    }
    file.sync_all()?;
    let written = fs::metadata(dest)?.len();
    if written != downloaded {
        bail!(
            "Wrote {} bytes to {} but received {}.",
            written,
            dest.display(),
            downloaded
        );
    }
    bar.finish(downloaded);
    let sha1 = hex::encode(hasher.finalize());
    debug!(bytes = downloaded, %sha1, "transfer complete");
    Ok((downloaded, sha1))
}
