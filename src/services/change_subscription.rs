//! Service for reloading albums when the media library changes.
//!
//! Holds the library change subscription while access is granted and turns
//! every notification into an [`AlbumRepository::reload`].

use crate::library::{ChangeCallback, LibrarySubscription, MediaLibrary};
use crate::services::AlbumRepository;
use crate::state::lock;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

/// Service for managing the library change subscription.
pub struct ChangeSubscription {
    library: Arc<dyn MediaLibrary>,
    repository: AlbumRepository,
    active: Mutex<Option<LibrarySubscription>>,
}

impl ChangeSubscription {
    pub fn new(library: Arc<dyn MediaLibrary>, repository: AlbumRepository) -> Self {
        Self {
            library,
            repository,
            active: Mutex::new(None),
        }
    }

    /// Subscribes while `has_access` holds and unsubscribes once it does not.
    ///
    /// A failed subscription is logged and leaves the picker without live
    /// updates; the next call tries again.
    pub fn sync(&self, has_access: bool) {
        let mut active = lock(&self.active);

        if has_access && active.is_none() {
            match self.library.subscribe_to_changes(self.reload_on_change()) {
                Ok(subscription) => {
                    info!("Subscribed to media library changes");
                    *active = Some(subscription);
                }
                Err(e) => warn!("Failed to subscribe to media library changes: {}", e),
            }
        } else if !has_access {
            if let Some(subscription) = active.take() {
                subscription.release();
                info!("Unsubscribed from media library changes");
            }
        }
    }

    /// Releases the subscription, if any.
    pub fn release(&self) {
        self.sync(false);
    }

    pub fn is_active(&self) -> bool {
        lock(&self.active).is_some()
    }

    fn reload_on_change(&self) -> ChangeCallback {
        let repository = self.repository.clone();
        Arc::new(move || {
            if repository.is_detached() {
                return;
            }
            debug!("Media library changed, reloading albums");
            let repository = repository.clone();
            async_std::task::spawn(async move {
                repository.reload().await;
            });
        })
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
