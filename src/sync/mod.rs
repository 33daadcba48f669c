//! # Synchronization Module
//!
//! Mirrors the remote catalog into the output directory.
//!
//! ## Flow
//!
//! ```text
//! catalog entries ──► reconcile ──► SyncPlan { to_download, to_delete }
//!                                        │
//!                    execute ◄───────────┘
//!                      1. delete local files of every id in to_delete
//!                      2. download phase  (worker pool, join barrier)
//!                      3. tagging phase   (worker pool, join barrier)
//! ```
//!
//! Ordinals are assigned oldest-first and the on-disk name is
//! `<ordinal:04>_<id>.mp3`, so a second run with an unchanged catalog finds
//! every identifier locally and does nothing.
//!
//! ## Concurrency
//!
//! Each phase pushes its per-track tasks through [`run_pool`], which keeps at
//! most `workers` of them in flight and returns once all have finished. Tasks
//! write to distinct paths and share no mutable state. A failing task is
//! recorded in the [`SyncReport`] and does not stop its siblings.

pub mod download;
pub mod plan;
pub mod tagger;

use std::{future::Future, path::PathBuf, time::Duration};

use futures::{StreamExt, stream};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    info,
    management::LocalInventory,
    success,
    types::{SyncPlan, SyncReport, Track},
    warning,
};

pub use download::{DownloadError, Downloader};
pub use plan::{assign_ordinals, reconcile};
pub use tagger::{TagError, TrackTags, rewrite_tags};

/// Runs `task` over `items` with at most `workers` tasks in flight and waits
/// for all of them. Results come back in completion order.
pub async fn run_pool<T, R, F, Fut>(items: Vec<T>, workers: usize, task: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(workers.max(1))
        .collect()
        .await
}

pub struct Synchronizer<'a> {
    config: &'a Config,
    downloader: Downloader,
}

impl<'a> Synchronizer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            downloader: Downloader::new(config.output_dir.clone()),
        }
    }

    pub fn with_downloader(config: &'a Config, downloader: Downloader) -> Self {
        Self { config, downloader }
    }

    /// Applies `plan` to the output directory and keeps `inventory` in step
    /// with what is on disk.
    ///
    /// Deletion always happens. When nothing is missing the run stops there
    /// and reports the collection as up to date; otherwise the missing tracks
    /// are downloaded and then tagged, one phase after the other.
    pub async fn execute(&self, plan: &SyncPlan, inventory: &mut LocalInventory) -> SyncReport {
        let mut report = SyncReport::default();

        self.delete_obsolete(plan, inventory, &mut report).await;

        if plan.is_up_to_date() {
            info!("Your collection is up to date.");
            return report;
        }

        let downloaded = self.download_missing(plan, inventory, &mut report).await;
        self.tag_downloaded(downloaded, &mut report).await;

        report
    }

    async fn delete_obsolete(
        &self,
        plan: &SyncPlan,
        inventory: &mut LocalInventory,
        report: &mut SyncReport,
    ) {
        for id in &plan.to_delete {
            match inventory.remove(id).await {
                Ok(removed) => {
                    for path in &removed {
                        success!("Removed {}", path.display());
                    }
                    report.deleted.extend(removed);
                }
                Err(e) => warning!("Cannot remove files of track {}: {}", id, e),
            }
        }
    }

    async fn download_missing(
        &self,
        plan: &SyncPlan,
        inventory: &mut LocalInventory,
        report: &mut SyncReport,
    ) -> Vec<(Track, PathBuf)> {
        let pb = phase_progress(plan.to_download.len(), "Downloading new songs");

        let results = run_pool(plan.to_download.clone(), self.config.workers, |track| {
            let pb = pb.clone();
            async move {
                let result = self.downloader.fetch_track(&track).await;
                pb.suspend(|| match &result {
                    Ok(path) => success!(
                        "{} - {} --> {}",
                        track.artist,
                        track.title,
                        path.display()
                    ),
                    Err(e) => warning!("{} - {}: {}", track.artist, track.title, e),
                });
                pb.inc(1);
                (track, result)
            }
        })
        .await;
        pb.finish_and_clear();

        let mut downloaded = Vec::new();
        for (track, result) in results {
            match result {
                Ok(path) => {
                    inventory.insert(track.id.clone(), path.clone());
                    report.downloaded.push(path.clone());
                    downloaded.push((track, path));
                }
                Err(e) => report.failed_downloads.push((track.id, e.to_string())),
            }
        }

        report.downloaded.sort();
        downloaded.sort_by_key(|(track, _)| track.ordinal);
        downloaded
    }

    async fn tag_downloaded(&self, downloaded: Vec<(Track, PathBuf)>, report: &mut SyncReport) {
        if downloaded.is_empty() {
            return;
        }

        let pb = phase_progress(downloaded.len(), "Updating song tags");
        let album = self.config.album.as_str();

        let results = run_pool(downloaded, self.config.workers, |(track, path)| {
            let pb = pb.clone();
            let tags = TrackTags::for_track(&track, album);
            async move {
                let task_path = path.clone();
                let task_tags = tags.clone();
                let result =
                    tokio::task::spawn_blocking(move || rewrite_tags(&task_path, &task_tags))
                        .await
                        .unwrap_or_else(|e| Err(TagError::Aborted(e.to_string())));

                pb.suspend(|| match &result {
                    Ok(()) => success!(
                        "{} --> {} - {} - {}",
                        path.display(),
                        tags.album,
                        tags.artist,
                        tags.title
                    ),
                    Err(e) => warning!("{}: {}", path.display(), e),
                });
                pb.inc(1);
                (path, result)
            }
        })
        .await;
        pb.finish_and_clear();

        for (path, result) in results {
            match result {
                Ok(()) => report.tagged.push(path),
                Err(e) => report.failed_tags.push((path, e.to_string())),
            }
        }
        report.tagged.sort();
    }
}

fn phase_progress(len: usize, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue}] {pos}/{len}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏").progress_chars("=> "));
    }
    pb
}
