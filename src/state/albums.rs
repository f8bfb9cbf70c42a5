//! Album list, selected album pointer and loading status.

use crate::model::{Album, LoadingStatus};
use log::debug;
use std::sync::Arc;

/// What a publish changed, so the caller can emit matching events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub album_count: usize,
    /// New selected album id, if the pointer moved.
    pub selected_changed: Option<Option<String>>,
    /// New loading status, if it moved.
    pub loading_changed: Option<LoadingStatus>,
}

/// Cached albums and the currently selected one.
///
/// The selected album is held by id and re-resolved against every published
/// list, since album snapshots are replaced rather than mutated.
#[derive(Debug, Default)]
pub struct AlbumState {
    albums: Arc<[Album]>,
    selected_album_id: Option<String>,
    loading: LoadingStatus,
}

impl AlbumState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Loading` when nothing is cached yet. Returns true if the
    /// status changed.
    pub fn begin_load(&mut self) -> bool {
        if self.albums.is_empty() && self.loading != LoadingStatus::Loading {
            self.loading = LoadingStatus::Loading;
            return true;
        }
        false
    }

    /// Atomically replaces the album list and re-resolves the selection.
    ///
    /// Keeps the selected album if its id is still present, otherwise falls
    /// back to the first album (the library lists "Recents" first).
    pub fn publish(&mut self, albums: Vec<Album>) -> PublishOutcome {
        let previous_selection = self.selected_album_id.clone();

        let resolved = match &previous_selection {
            Some(id) if albums.iter().any(|album| &album.id == id) => Some(id.clone()),
            Some(id) => {
                debug!("Selected album {} disappeared, falling back to first", id);
                albums.first().map(|album| album.id.clone())
            }
            None => albums.first().map(|album| album.id.clone()),
        };

        self.albums = Arc::from(albums);
        self.selected_album_id = resolved;

        let loading_changed = if self.loading == LoadingStatus::Loading {
            self.loading = LoadingStatus::Complete;
            Some(LoadingStatus::Complete)
        } else {
            None
        };

        PublishOutcome {
            album_count: self.albums.len(),
            selected_changed: (self.selected_album_id != previous_selection)
                .then(|| self.selected_album_id.clone()),
            loading_changed,
        }
    }

    /// Points the selection at another published album. Returns false if
    /// the id is not in the current list.
    pub fn select_album(&mut self, id: &str) -> bool {
        if !self.albums.iter().any(|album| album.id == id) {
            return false;
        }
        self.selected_album_id = Some(id.to_string());
        true
    }

    /// Shared handle to the current album list.
    pub fn albums(&self) -> Arc<[Album]> {
        self.albums.clone()
    }

    pub fn selected_album_id(&self) -> Option<&str> {
        self.selected_album_id.as_deref()
    }

    pub fn selected_album(&self) -> Option<&Album> {
        let id = self.selected_album_id.as_deref()?;
        self.albums.iter().find(|album| album.id == id)
    }

    pub fn loading_status(&self) -> LoadingStatus {
        self.loading
    }
}
