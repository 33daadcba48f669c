use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use futures::StreamExt;

use crate::utils;

#[derive(Debug)]
pub enum InventoryError {
    IoError(PathBuf, std::io::Error),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::IoError(path, e) => {
                write!(f, "cannot read {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Tracks already present in the output directory, keyed by identifier.
///
/// The identifier is recovered from the file name
/// (`<ordinal>_<identifier>.mp3`); files that do not follow the convention are
/// not part of the inventory.
#[derive(Debug, Clone, Default)]
pub struct LocalInventory {
    files: BTreeMap<String, Vec<PathBuf>>,
}

impl LocalInventory {
    /// Lists `dir` and collects every track file in it. The directory is
    /// created when missing. Leftover `.part` files from interrupted
    /// downloads are removed.
    pub async fn scan(dir: &Path) -> Result<Self, InventoryError> {
        let io_err = |e: std::io::Error| InventoryError::IoError(dir.to_path_buf(), e);

        async_fs::create_dir_all(dir).await.map_err(io_err)?;

        let mut inventory = Self::default();
        let mut entries = async_fs::read_dir(dir).await.map_err(io_err)?;
        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().await.map_err(io_err)?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if utils::is_partial_file_name(file_name) {
                // a stale partial download is not a track, drop it
                let _ = async_fs::remove_file(entry.path()).await;
                continue;
            }

            if let Some((_, id)) = utils::parse_track_file_name(file_name) {
                inventory.insert(id, entry.path());
            }
        }

        Ok(inventory)
    }

    pub fn from_files(files: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        let mut inventory = Self::default();
        for (id, path) in files {
            inventory.insert(id, path);
        }
        inventory
    }

    pub fn insert(&mut self, id: String, path: PathBuf) {
        self.files.entry(id).or_default().push(path);
    }

    /// Drops `id` from the inventory, returning the paths it was known under.
    pub fn forget(&mut self, id: &str) -> Vec<PathBuf> {
        self.files.remove(id).unwrap_or_default()
    }

    pub fn ids(&self) -> BTreeSet<String> {
        self.files.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.files.contains_key(id)
    }

    pub fn files_for(&self, id: &str) -> &[PathBuf] {
        self.files.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Deletes every file known under `id`, whatever its ordinal, and drops
    /// `id` from the inventory. Files already gone from disk are skipped.
    ///
    /// When a removal fails the paths not yet removed stay in the inventory.
    pub async fn remove(&mut self, id: &str) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut paths = self.forget(id);
        paths.sort();

        let mut removed = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            match async_fs::remove_file(path).await {
                Ok(()) => removed.push(path.clone()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    self.files.insert(id.to_string(), paths[i..].to_vec());
                    return Err(e);
                }
            }
        }

        Ok(removed)
    }
}
