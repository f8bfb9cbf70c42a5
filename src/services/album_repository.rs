//! Service for loading albums from the media library.
//!
//! Provides the asynchronous reload that fetches every album with its
//! thumbnail, assets and count, then publishes the whole list into
//! [`AlbumState`] in one step.

use crate::error::Result;
use crate::library::MediaLibrary;
use crate::model::{Album, AlbumDescriptor, LoadingStatus, MediaTypeFilter};
use crate::state::{AlbumState, EventBus, PickerEvent, lock};
use futures::future::try_join_all;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Service for managing the album list and the selected album.
#[derive(Clone)]
pub struct AlbumRepository {
    library: Arc<dyn MediaLibrary>,
    filter: MediaTypeFilter,
    state: Arc<Mutex<AlbumState>>,
    events: EventBus,
    issued: Arc<AtomicU64>,
    last_published: Arc<AtomicU64>,
    detached: Arc<AtomicBool>,
}

impl AlbumRepository {
    pub fn new(library: Arc<dyn MediaLibrary>, filter: MediaTypeFilter, events: EventBus) -> Self {
        Self {
            library,
            filter,
            state: Arc::new(Mutex::new(AlbumState::new())),
            events,
            issued: Arc::new(AtomicU64::new(0)),
            last_published: Arc::new(AtomicU64::new(0)),
            detached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Re-fetches every album and publishes the result atomically.
    ///
    /// Overlapping reloads are not coordinated: whichever completes last
    /// publishes last, even if it was issued first. Any fetch error aborts
    /// this reload and leaves the published state untouched.
    pub async fn reload(&self) {
        if self.is_detached() {
            return;
        }

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let entered_loading = lock(&self.state).begin_load();
        if entered_loading {
            self.events
                .emit(PickerEvent::LoadingStatusChanged(LoadingStatus::Loading));
        }

        let start = std::time::Instant::now();
        let albums = match self.fetch_albums().await {
            Ok(albums) => albums,
            Err(e) => {
                warn!("Album reload #{} failed, keeping previous albums: {}", generation, e);
                return;
            }
        };

        if self.is_detached() {
            debug!("Discarding album reload #{} after teardown", generation);
            return;
        }

        let previous = self.last_published.swap(generation, Ordering::SeqCst);
        if previous > generation {
            warn!(
                "Album reload #{} finished after #{} and overwrites its result",
                generation, previous
            );
        }

        let outcome = lock(&self.state).publish(albums);
        info!(
            "Published {} albums (reload #{}) in {:?}",
            outcome.album_count,
            generation,
            start.elapsed()
        );

        self.events.emit(PickerEvent::AlbumsPublished {
            count: outcome.album_count,
        });
        if let Some(selected) = outcome.selected_changed {
            self.events.emit(PickerEvent::SelectedAlbumChanged(selected));
        }
        if let Some(loading) = outcome.loading_changed {
            self.events.emit(PickerEvent::LoadingStatusChanged(loading));
        }
    }

    async fn fetch_albums(&self) -> Result<Vec<Album>> {
        let descriptors = self.library.list_albums(self.filter).await?;
        debug!("Library listed {} albums", descriptors.len());
        try_join_all(
            descriptors
                .into_iter()
                .map(|descriptor| self.fetch_album(descriptor)),
        )
        .await
    }

    async fn fetch_album(&self, descriptor: AlbumDescriptor) -> Result<Album> {
        let (thumbnail, assets, asset_count) = futures::try_join!(
            self.library.thumbnail(&descriptor),
            self.library.assets(&descriptor, self.filter),
            self.library.asset_count(&descriptor, self.filter),
        )?;

        Ok(Album::from_parts(
            descriptor,
            self.filter,
            thumbnail,
            assets,
            asset_count,
        ))
    }

    /// Selects another published album. Returns false if the id is unknown.
    pub fn select_album(&self, id: &str) -> bool {
        let (selected, changed) = {
            let mut state = lock(&self.state);
            let previous = state.selected_album_id().map(str::to_string);
            let selected = state.select_album(id);
            (selected, selected && previous.as_deref() != Some(id))
        };

        if !selected {
            warn!("Cannot select unknown album {}", id);
        }
        if changed {
            self.events
                .emit(PickerEvent::SelectedAlbumChanged(Some(id.to_string())));
        }
        selected
    }

    /// Stops publishing: reloads that complete from now on are dropped.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    pub fn albums(&self) -> Arc<[Album]> {
        lock(&self.state).albums()
    }

    pub fn selected_album(&self) -> Option<Album> {
        lock(&self.state).selected_album().cloned()
    }

    pub fn selected_album_id(&self) -> Option<String> {
        lock(&self.state).selected_album_id().map(str::to_string)
    }

    pub fn loading_status(&self) -> LoadingStatus {
        lock(&self.state).loading_status()
    }
}
