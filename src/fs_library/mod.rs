//! A directory tree exposed as a media library.
//!
//! The root becomes the "Recents" album holding every media file below it,
//! newest first. Each visible subdirectory with media directly inside becomes
//! a folder album with the id `folder/<name>`. Item ids are `/`-separated
//! paths relative to the root.
//!
//! `list_albums` walks the tree once and keeps the result; the per-album
//! calls of the same reload read from that snapshot.
//!
//! Threading model:
//! - `async_std::task::spawn_blocking`: directory scans and metadata reads
//! - `rayon::spawn`: thumbnail decoding (CPU intensive)

use crate::config::{THUMBNAIL_CACHE_CAPACITY, THUMBNAIL_EDGE};
use crate::error::Result;
use crate::library::{ChangeCallback, LibrarySubscription, MediaLibrary};
use crate::model::{AlbumDescriptor, AlbumKind, MediaItem, MediaTypeFilter, Thumbnail};
use crate::state::lock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub mod permission;
pub mod scan;
pub mod thumbnail;
pub mod watch;

pub use permission::FsPermission;
use scan::MediaEntry;
use thumbnail::ThumbnailCache;

/// Id of the album that holds every item in the library.
pub const RECENTS_ALBUM_ID: &str = "recents";

const RECENTS_ALBUM_NAME: &str = "Recents";

/// Prefix of folder album ids. Keeps them apart from [`RECENTS_ALBUM_ID`].
pub const FOLDER_ALBUM_PREFIX: &str = "folder/";

/// Unfiltered entries per album id, as found by the last `list_albums`.
struct Listing {
    filter: MediaTypeFilter,
    albums: HashMap<String, Arc<[MediaEntry]>>,
}

/// Media library backed by a directory.
#[derive(Clone)]
pub struct FsMediaLibrary {
    root: Arc<PathBuf>,
    thumbnails: Arc<Mutex<ThumbnailCache>>,
    listing: Arc<Mutex<Option<Listing>>>,
}

impl FsMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(THUMBNAIL_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            root: Arc::new(root.into()),
            thumbnails: Arc::new(Mutex::new(ThumbnailCache::new(capacity))),
            listing: Arc::new(Mutex::new(None)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn album_dir(&self, album: &AlbumDescriptor) -> Option<PathBuf> {
        match album.kind {
            AlbumKind::Recents => Some(self.root.to_path_buf()),
            AlbumKind::Folder => {
                let name = album.id.strip_prefix(FOLDER_ALBUM_PREFIX)?;
                scan::path_for_id(&self.root, name)
            }
        }
    }

    /// Entries recorded for the album by the last listing.
    fn listed_entries(
        &self,
        album: &AlbumDescriptor,
    ) -> Option<(MediaTypeFilter, Arc<[MediaEntry]>)> {
        let listing = lock(&self.listing);
        let listing = listing.as_ref()?;
        let entries = listing.albums.get(&album.id)?;
        Some((listing.filter, entries.clone()))
    }

    /// An album's files, from the last listing or else a fresh scan on a
    /// blocking thread.
    async fn entries(
        &self,
        album: &AlbumDescriptor,
        filter: MediaTypeFilter,
    ) -> Result<Vec<MediaEntry>> {
        let entries: Arc<[MediaEntry]> = match self.listed_entries(album) {
            Some((_, entries)) => entries,
            None => {
                let Some(dir) = self.album_dir(album) else {
                    return Ok(Vec::new());
                };
                let kind = album.kind;
                async_std::task::spawn_blocking(move || match kind {
                    AlbumKind::Recents => scan::scan_tree(&dir),
                    AlbumKind::Folder => scan::scan_directory(&dir),
                })
                .await?
                .into()
            }
        };

        Ok(entries
            .iter()
            .filter(|entry| filter.matches(entry.media_type))
            .cloned()
            .collect())
    }

    fn to_item(&self, entry: &MediaEntry) -> Option<MediaItem> {
        Some(MediaItem {
            id: scan::relative_id(&self.root, &entry.path)?,
            uri: format!("file://{}", entry.path.display()),
            media_type: entry.media_type,
            modified: entry.modified,
        })
    }
}

fn newest(entries: &[MediaEntry]) -> DateTime<Utc> {
    entries
        .iter()
        .map(|entry| entry.modified)
        .max()
        .unwrap_or_else(|| DateTime::<Utc>::from(SystemTime::UNIX_EPOCH))
}

/// Folder albums hold the media directly inside an immediate subdirectory.
fn folder_album_id(root: &Path, dir: &Path) -> Option<String> {
    scan::relative_id(root, dir).map(|name| format!("{}{}", FOLDER_ALBUM_PREFIX, name))
}

/// Walks the tree once and groups the entries into albums.
fn scan_listing(root: &Path, filter: MediaTypeFilter) -> Result<(Vec<AlbumDescriptor>, Listing)> {
    let everything: Arc<[MediaEntry]> = scan::scan_tree(root)?.into();
    let matching = |entries: &[MediaEntry]| -> Vec<MediaEntry> {
        entries
            .iter()
            .filter(|entry| filter.matches(entry.media_type))
            .cloned()
            .collect()
    };

    let mut albums = vec![AlbumDescriptor {
        id: RECENTS_ALBUM_ID.to_string(),
        name: RECENTS_ALBUM_NAME.to_string(),
        kind: AlbumKind::Recents,
        last_modified: newest(&matching(&everything)),
    }];
    let mut listing = Listing {
        filter,
        albums: HashMap::from([(RECENTS_ALBUM_ID.to_string(), everything.clone())]),
    };

    for dir in scan::list_subdirectories(root)? {
        let Some(id) = folder_album_id(root, &dir) else {
            continue;
        };
        let mut entries: Vec<MediaEntry> = everything
            .iter()
            .filter(|entry| entry.path.parent() == Some(dir.as_path()))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let visible = matching(&entries);
        if visible.is_empty() {
            continue;
        }
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        albums.push(AlbumDescriptor {
            id: id.clone(),
            name,
            kind: AlbumKind::Folder,
            last_modified: newest(&visible),
        });
        listing.albums.insert(id, entries.into());
    }

    Ok((albums, listing))
}

#[async_trait]
impl MediaLibrary for FsMediaLibrary {
    async fn list_albums(&self, filter: MediaTypeFilter) -> Result<Vec<AlbumDescriptor>> {
        let root = self.root.clone();
        let (albums, listing) =
            async_std::task::spawn_blocking(move || scan_listing(&root, filter)).await?;
        debug!("Listed {} albums under {}", albums.len(), self.root.display());

        *lock(&self.listing) = Some(listing);
        Ok(albums)
    }

    async fn thumbnail(&self, album: &AlbumDescriptor) -> Result<Option<Thumbnail>> {
        // Only still images are decoded, and only ones the album's grid shows.
        let listed_filter = self.listed_entries(album).map(|(filter, _)| filter);
        let cover = self
            .entries(album, MediaTypeFilter::Photos)
            .await?
            .into_iter()
            .find(|entry| listed_filter.is_none_or(|filter| filter.matches(entry.media_type)));
        let Some(cover) = cover else {
            return Ok(None);
        };

        let cached = lock(&self.thumbnails).get(&cover.path, cover.modified);
        if let Some(cached) = cached {
            return Ok(Some(cached));
        }

        match thumbnail::load_thumbnail(cover.path.clone(), THUMBNAIL_EDGE).await {
            Ok(decoded) => {
                lock(&self.thumbnails).put(cover.path, cover.modified, decoded.clone());
                Ok(Some(decoded))
            }
            Err(e) => {
                // An unreadable cover must not take the whole album list down.
                warn!("No thumbnail for album {}: {}", album.id, e);
                Ok(None)
            }
        }
    }

    async fn assets(
        &self,
        album: &AlbumDescriptor,
        filter: MediaTypeFilter,
    ) -> Result<Vec<MediaItem>> {
        let entries = self.entries(album, filter).await?;
        Ok(entries.iter().filter_map(|entry| self.to_item(entry)).collect())
    }

    async fn asset_count(&self, album: &AlbumDescriptor, filter: MediaTypeFilter) -> Result<usize> {
        Ok(self.entries(album, filter).await?.len())
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<MediaItem>> {
        let Some(path) = scan::path_for_id(&self.root, id) else {
            debug!("Rejecting malformed item id {}", id);
            return Ok(None);
        };

        let entry = async_std::task::spawn_blocking(move || scan::media_entry(&path)).await;
        Ok(entry.and_then(|entry| self.to_item(&entry)))
    }

    async fn exists(&self, item: &MediaItem) -> Result<bool> {
        let Some(path) = scan::path_for_id(&self.root, &item.id) else {
            return Ok(false);
        };
        Ok(async_std::task::spawn_blocking(move || path.is_file()).await)
    }

    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> Result<LibrarySubscription> {
        watch::watch_library(&self.root, on_change)
    }
}
