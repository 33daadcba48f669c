use std::collections::BTreeSet;

use crate::types::{CatalogEntry, SyncPlan, Track};

/// Turns the API's newest-first list into tracks numbered oldest-first.
///
/// The last entry returned by the API gets ordinal `0`, so ordinals of
/// existing tracks do not move when new tracks are added on top.
pub fn assign_ordinals(entries: Vec<CatalogEntry>) -> Vec<Track> {
    entries
        .into_iter()
        .rev()
        .enumerate()
        .map(|(ordinal, entry)| Track {
            id: entry.id,
            artist: entry.artist,
            title: entry.title,
            url: entry.url,
            ordinal,
        })
        .collect()
}

/// Computes what has to change on disk for the local set to mirror the
/// remote catalog.
///
/// `to_download` is remote minus local and `to_delete` is local minus remote,
/// so no identifier can ever be in both.
///
/// # Example
///
/// ```
/// // local {5, 9}, remote {9, 12}
/// let plan = reconcile(entries, &local);
/// assert_eq!(plan.download_ids(), BTreeSet::from(["12".to_string()]));
/// assert_eq!(plan.to_delete, BTreeSet::from(["5".to_string()]));
/// ```
pub fn reconcile(entries: Vec<CatalogEntry>, local: &BTreeSet<String>) -> SyncPlan {
    let tracks = assign_ordinals(entries);
    let remote: BTreeSet<String> = tracks.iter().map(|t| t.id.clone()).collect();

    let to_delete: BTreeSet<String> = local.difference(&remote).cloned().collect();
    let to_download: Vec<Track> = tracks
        .iter()
        .filter(|t| !local.contains(&t.id))
        .cloned()
        .collect();

    SyncPlan {
        tracks,
        to_download,
        to_delete,
    }
}
