use std::{collections::BTreeSet, path::PathBuf};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub user_id: String,
    pub expires_in: String,
    #[serde(default)]
    pub obtained_at: u64,
}

/// One entry of the remote catalog, in the order the API returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub url: String,
}

/// A remote track with its stable on-disk ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub url: String,
    pub ordinal: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Every remote track in ordinal order.
    pub tracks: Vec<Track>,
    /// Remote tracks missing locally, in ordinal order.
    pub to_download: Vec<Track>,
    /// Local identifiers no longer present remotely.
    pub to_delete: BTreeSet<String>,
}

impl SyncPlan {
    pub fn is_up_to_date(&self) -> bool {
        self.to_download.is_empty()
    }

    pub fn download_ids(&self) -> BTreeSet<String> {
        self.to_download.iter().map(|t| t.id.clone()).collect()
    }
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub deleted: Vec<PathBuf>,
    pub downloaded: Vec<PathBuf>,
    pub failed_downloads: Vec<(String, String)>,
    pub tagged: Vec<PathBuf>,
    pub failed_tags: Vec<(PathBuf, String)>,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub step: String,
    pub count: String,
}
