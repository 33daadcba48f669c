use std::{
    fmt,
    path::{Path, PathBuf},
};

use reqwest::Client;
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};

use crate::{types::Track, utils};

#[derive(Debug)]
pub enum DownloadError {
    MissingUrl,
    Network(reqwest::Error),
    Status(u16),
    IoError(std::io::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::MissingUrl => write!(f, "track has no source URL"),
            DownloadError::Network(e) => write!(f, "download failed: {}", e),
            DownloadError::Status(status) => write!(f, "download returned HTTP {}", status),
            DownloadError::IoError(e) => write!(f, "cannot write track: {}", e),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DownloadError::Status(status.as_u16()),
            None => DownloadError::Network(err),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::IoError(err)
    }
}

pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_client(Client::new(), output_dir)
    }

    pub fn with_client(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    /// Final location of `track` inside the output directory.
    pub fn target_path(&self, track: &Track) -> PathBuf {
        self.output_dir
            .join(utils::track_file_name(track.ordinal, &track.id))
    }

    /// Streams the track to `<ordinal>_<id>.mp3` in the output directory.
    ///
    /// Bytes go to a `.part` sibling first which is renamed once the body has
    /// been fully written, so the final name never refers to a truncated file.
    /// On failure the partial file is removed and the track stays missing.
    pub async fn fetch_track(&self, track: &Track) -> Result<PathBuf, DownloadError> {
        if track.url.is_empty() {
            return Err(DownloadError::MissingUrl);
        }

        let target = self.target_path(track);
        let partial = self
            .output_dir
            .join(utils::partial_file_name(&utils::track_file_name(
                track.ordinal,
                &track.id,
            )));

        let result = self.stream_to(&track.url, &partial).await;
        if let Err(e) = result {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        fs::rename(&partial, &target).await?;
        Ok(target)
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let mut resp = self.client.get(url).send().await?.error_for_status()?;

        let file = fs::File::create(path).await?;
        let mut out_file = BufWriter::new(file);
        while let Some(chunk) = resp.chunk().await? {
            out_file.write_all(&chunk).await?;
        }
        out_file.flush().await?;

        Ok(())
    }
}
