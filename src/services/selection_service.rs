//! Service for selection changes and restoring a previous selection.

use crate::library::MediaLibrary;
use crate::model::MediaItem;
use crate::state::{EventBus, PickerEvent, SelectionState, lock};
use futures::future::join_all;
use log::{debug, info};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Service wrapping the shared [`SelectionState`].
#[derive(Clone)]
pub struct SelectionService {
    library: Arc<dyn MediaLibrary>,
    selection: Arc<Mutex<SelectionState>>,
    events: EventBus,
    detached: Arc<AtomicBool>,
}

impl SelectionService {
    pub fn new(
        library: Arc<dyn MediaLibrary>,
        max_selection: NonZeroUsize,
        events: EventBus,
    ) -> Self {
        Self {
            library,
            selection: Arc::new(Mutex::new(SelectionState::new(max_selection))),
            events,
            detached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolves `ids` into live items and adds them to the selection.
    ///
    /// Every id is looked up and checked for existence independently; ids
    /// that fail either step are dropped. Survivors keep their input order.
    /// Returns the number of items restored.
    pub async fn restore(&self, ids: &[String]) -> usize {
        if ids.is_empty() {
            return 0;
        }

        let resolved: Vec<MediaItem> = join_all(ids.iter().map(|id| self.resolve(id)))
            .await
            .into_iter()
            .flatten()
            .collect();

        if self.detached.load(Ordering::SeqCst) {
            debug!("Discarding restored selection after teardown");
            return 0;
        }

        let restored = resolved.len();
        let count = {
            let mut selection = lock(&self.selection);
            selection.apply_restored(resolved);
            selection.len()
        };
        info!("Restored {} of {} previously selected items", restored, ids.len());
        self.events.emit(PickerEvent::SelectionChanged { count });
        restored
    }

    async fn resolve(&self, id: &str) -> Option<MediaItem> {
        let item = match self.library.lookup_by_id(id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                debug!("Previously selected item {} no longer resolves", id);
                return None;
            }
            Err(e) => {
                debug!("Lookup of {} failed: {}", id, e);
                return None;
            }
        };

        match self.library.exists(&item).await {
            Ok(true) => Some(item),
            Ok(false) => {
                debug!("Previously selected item {} no longer exists", id);
                None
            }
            Err(e) => {
                debug!("Existence check of {} failed: {}", id, e);
                None
            }
        }
    }

    /// Adds or removes `item`. Returns false if the selection is full.
    pub fn toggle(&self, item: MediaItem) -> bool {
        let (accepted, count) = {
            let mut selection = lock(&self.selection);
            let accepted = selection.toggle(item);
            (accepted, selection.len())
        };
        if accepted {
            self.events.emit(PickerEvent::SelectionChanged { count });
        }
        accepted
    }

    /// Replaces the selection with just `item`.
    pub fn select_only(&self, item: MediaItem) {
        {
            let mut selection = lock(&self.selection);
            selection.clear();
            selection.toggle(item);
        }
        self.events.emit(PickerEvent::SelectionChanged { count: 1 });
    }

    pub fn clear(&self) {
        let was_empty = {
            let mut selection = lock(&self.selection);
            let was_empty = selection.is_empty();
            selection.clear();
            was_empty
        };
        if !was_empty {
            self.events.emit(PickerEvent::SelectionChanged { count: 0 });
        }
    }

    /// Moves the selection out for the caller.
    pub fn finalize(&self) -> Vec<MediaItem> {
        lock(&self.selection).finalize()
    }

    /// Drops restore results that arrive from now on.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.selection).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.selection).is_empty()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        lock(&self.selection).items().to_vec()
    }

    /// Reads the selection under its lock.
    pub fn with_state<R>(&self, read: impl FnOnce(&SelectionState) -> R) -> R {
        read(&lock(&self.selection))
    }
}
