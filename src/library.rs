//! Collaborator interfaces: the permission subsystem, the media library and
//! the host navigation stack.

use crate::error::Result;
use crate::model::{AlbumDescriptor, MediaItem, MediaTypeFilter, PermissionStatus, Thumbnail};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Callback invoked whenever the library reports a change.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Asks the platform for media access.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request_access(&self) -> Result<PermissionStatus>;
}

/// Read access to albums and their media.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Lists albums containing media that passes `filter`. The "Recents"
    /// album, when the library has one, comes first.
    async fn list_albums(&self, filter: MediaTypeFilter) -> Result<Vec<AlbumDescriptor>>;

    /// Cover image for an album, if it has one.
    async fn thumbnail(&self, album: &AlbumDescriptor) -> Result<Option<Thumbnail>>;

    /// Items of an album in display order.
    async fn assets(&self, album: &AlbumDescriptor, filter: MediaTypeFilter)
    -> Result<Vec<MediaItem>>;

    /// Number of items in an album.
    async fn asset_count(&self, album: &AlbumDescriptor, filter: MediaTypeFilter) -> Result<usize>;

    /// Resolves a previously handed out id, `None` if it is unknown.
    async fn lookup_by_id(&self, id: &str) -> Result<Option<MediaItem>>;

    /// Whether the item still exists in the library.
    async fn exists(&self, item: &MediaItem) -> Result<bool>;

    /// Registers `on_change` for library change notifications until the
    /// returned subscription is released or dropped.
    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> Result<LibrarySubscription>;
}

/// Host navigation action that returns from the picker.
pub trait Navigator: Send + Sync {
    fn pop(&self);
}

/// Registration with the library's change source.
///
/// Unsubscribes exactly once, either through [`LibrarySubscription::release`]
/// or when dropped.
pub struct LibrarySubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl LibrarySubscription {
    /// Creates a subscription whose release runs `unsubscribe`.
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Stops receiving notifications.
    pub fn release(mut self) {
        self.run_unsubscribe();
    }

    fn run_unsubscribe(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for LibrarySubscription {
    fn drop(&mut self) {
        self.run_unsubscribe();
    }
}

impl fmt::Debug for LibrarySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibrarySubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
