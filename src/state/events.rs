//! Field-level change notifications for picker state.

use crate::model::{LoadingStatus, PermissionStatus};
use crate::state::{MultiSelectPhase, lock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A piece of picker state that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    PermissionChanged(PermissionStatus),
    BannersChanged,
    LoadingStatusChanged(LoadingStatus),
    AlbumsPublished { count: usize },
    SelectedAlbumChanged(Option<String>),
    SelectionChanged { count: usize },
    MultiSelectChanged(MultiSelectPhase),
    Completed { count: usize },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&PickerEvent) + Send + Sync>;

/// Fan-out of [`PickerEvent`]s to registered listeners.
///
/// Listeners are called outside the bus lock and must not assume any picker
/// lock is held, so they are free to read state back.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<Vec<(ListenerId, Listener)>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PickerEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: PickerEvent) {
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }
}
