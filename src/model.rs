//! Domain types shared by the picker state and the media library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Authorization level the user has granted for media access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Authorized,
    /// Access to a curated subset of the library.
    Limited,
    Denied,
    Restricted,
}

impl PermissionStatus {
    /// Whether media can be read at all.
    pub fn has_access(self) -> bool {
        matches!(self, Self::Authorized | Self::Limited)
    }

    /// Whether the status is one of the terminal refusals.
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }
}

/// Kind of a single media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Photo,
    Video,
}

/// Media types the picker is configured to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaTypeFilter {
    #[default]
    All,
    Photos,
    Videos,
}

impl MediaTypeFilter {
    /// Returns true if items of `media_type` pass this filter.
    pub fn matches(self, media_type: MediaType) -> bool {
        match self {
            Self::All => true,
            Self::Photos => media_type == MediaType::Photo,
            Self::Videos => media_type == MediaType::Video,
        }
    }
}

/// Where an album comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlbumKind {
    /// Every item in the library, newest first.
    Recents,
    /// A user-visible folder of items.
    Folder,
}

/// Album as listed by the media library, before its contents are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDescriptor {
    pub id: String,
    pub name: String,
    pub kind: AlbumKind,
    pub last_modified: DateTime<Utc>,
}

/// A photo or video the user can pick.
///
/// Identity is the `id`; two items with the same id are the same item even if
/// the rest of the snapshot differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub uri: String,
    pub media_type: MediaType,
    pub modified: DateTime<Utc>,
}

impl PartialEq for MediaItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaItem {}

/// Opaque, cheaply clonable thumbnail handle.
#[derive(Clone)]
pub struct Thumbnail {
    pub uri: String,
    pub width: u32,
    pub height: u32,
    pixels: Arc<[u8]>,
}

impl Thumbnail {
    /// Wraps RGB8 pixel data for the item at `uri`.
    pub fn new(uri: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// RGB8 pixel rows.
    pub fn rgb8(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("uri", &self.uri)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Immutable album snapshot, replaced wholesale on every reload.
#[derive(Debug, Clone)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub kind: AlbumKind,
    pub last_modified: DateTime<Utc>,
    pub media_type: MediaTypeFilter,
    pub thumbnail: Option<Thumbnail>,
    pub assets: Vec<MediaItem>,
    pub asset_count: usize,
}

impl Album {
    /// Assembles an album from its descriptor and fetched contents.
    pub fn from_parts(
        descriptor: AlbumDescriptor,
        media_type: MediaTypeFilter,
        thumbnail: Option<Thumbnail>,
        assets: Vec<MediaItem>,
        asset_count: usize,
    ) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            kind: descriptor.kind,
            last_modified: descriptor.last_modified,
            media_type,
            thumbnail,
            assets,
            asset_count,
        }
    }
}

/// Progress of the album list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadingStatus {
    #[default]
    Indeterminate,
    Loading,
    Complete,
}
