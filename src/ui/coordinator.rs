//! Composition of the picker stores and services into one view surface.
//!
//! Owns the picker lifecycle: mount resolves permission, loads albums while
//! restoring the previous selection, then subscribes to library changes;
//! exit hands the selection to the caller and returns through the host
//! navigator.

use crate::config::PickerConfig;
use crate::library::{MediaLibrary, Navigator, PermissionProvider};
use crate::model::{Album, LoadingStatus, MediaItem, PermissionStatus};
use crate::services::{
    AlbumRepository, ChangeSubscription, PermissionCoordinator, SelectionService,
};
use crate::state::{
    Completion, EventBus, ListenerId, MultiSelectMode, MultiSelectPhase, PickerEvent, lock,
};
use crate::ui::view_model::PickerView;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Receives the finalized selection when the picker exits.
pub type CompletionCallback = Box<dyn FnOnce(Vec<MediaItem>) + Send>;

/// Where the picker is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Exited,
    TornDown,
}

/// What a tap on a grid item did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPress {
    /// Multi-select is on; the item was toggled unless the selection was full.
    Toggled { accepted: bool },
    /// Multi-select is off; the item was picked and the picker exited.
    Completed,
    /// The picker is not mounted, or multi-select is still animating out.
    Ignored,
}

pub struct ViewCoordinator {
    config: PickerConfig,
    permission: PermissionCoordinator,
    albums: AlbumRepository,
    selection: SelectionService,
    multi_select: Mutex<MultiSelectMode>,
    changes: ChangeSubscription,
    navigator: Arc<dyn Navigator>,
    on_complete: Mutex<Option<CompletionCallback>>,
    lifecycle: Mutex<Lifecycle>,
    initial_load_started: AtomicBool,
    events: EventBus,
}

impl ViewCoordinator {
    pub fn new(
        config: PickerConfig,
        library: Arc<dyn MediaLibrary>,
        permissions: Arc<dyn PermissionProvider>,
        navigator: Arc<dyn Navigator>,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        let events = EventBus::new();
        let transitions = config.transitions();

        let permission =
            PermissionCoordinator::new(permissions, transitions.banner, events.clone());
        let albums =
            AlbumRepository::new(library.clone(), config.media_type_filter(), events.clone());
        let selection =
            SelectionService::new(library.clone(), config.max_selection(), events.clone());
        let changes = ChangeSubscription::new(library, albums.clone());

        let clear_selection = {
            let selection = selection.clone();
            Arc::new(move || selection.clear())
        };
        let multi_select = MultiSelectMode::new(
            !config.selected_asset_ids().is_empty(),
            transitions.multi_select_enter,
            transitions.multi_select_exit,
            clear_selection,
        );

        Self {
            config,
            permission,
            albums,
            selection,
            multi_select: Mutex::new(multi_select),
            changes,
            navigator,
            on_complete: Mutex::new(on_complete),
            lifecycle: Mutex::new(Lifecycle::Created),
            initial_load_started: AtomicBool::new(false),
            events,
        }
    }

    /// Mounts the picker. Only the first call has an effect.
    pub async fn mount(&self) {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if *lifecycle != Lifecycle::Created {
                warn!("Ignoring mount in lifecycle state {:?}", *lifecycle);
                return;
            }
            *lifecycle = Lifecycle::Mounted;
        }

        let status = self.permission.request_access().await;
        if !self.is_mounted() {
            debug!("Picker torn down while permission was requested");
            return;
        }

        if status.has_access() {
            self.on_access_granted().await;
        }
    }

    /// Applies a permission status reported after mount, e.g. when the user
    /// returns from the system settings.
    pub async fn permission_changed(&self, status: PermissionStatus) {
        if !self.is_mounted() {
            return;
        }

        self.permission.apply_status(status);
        if status.has_access() {
            self.on_access_granted().await;
        } else {
            self.sync_subscription();
        }
    }

    async fn on_access_granted(&self) {
        if !self.initial_load_started.swap(true, Ordering::SeqCst) {
            let ids = self.config.selected_asset_ids();
            futures::join!(self.albums.reload(), self.selection.restore(ids));
        }
        self.sync_subscription();
    }

    /// Subscribes or unsubscribes to match the current access, unless the
    /// picker is no longer mounted.
    fn sync_subscription(&self) {
        let lifecycle = lock(&self.lifecycle);
        if *lifecycle != Lifecycle::Mounted {
            debug!("Skipping change subscription in lifecycle state {:?}", *lifecycle);
            return;
        }
        self.changes.sync(self.permission.has_access());
    }

    /// Switches the grid to another album.
    pub fn select_album(&self, id: &str) -> bool {
        self.albums.select_album(id)
    }

    /// Adds or removes an item. Returns false if the selection is full or
    /// the picker is not mounted.
    pub fn toggle(&self, item: MediaItem) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.selection.toggle(item)
    }

    /// Handles a tap on a grid item.
    pub fn press_item(&self, item: MediaItem) -> ItemPress {
        if !self.is_mounted() {
            return ItemPress::Ignored;
        }

        let (toggles, phase) = {
            let mode = lock(&self.multi_select);
            (mode.accepts_toggles(), mode.phase())
        };
        if toggles {
            return ItemPress::Toggled {
                accepted: self.selection.toggle(item),
            };
        }
        if phase == MultiSelectPhase::Deactivating {
            debug!("Ignoring tap on {} while leaving multi-select", item.id);
            return ItemPress::Ignored;
        }

        self.selection.select_only(item);
        self.exit();
        ItemPress::Completed
    }

    /// Handles a long press: enters multi-select with the item selected.
    /// Returns false if the item could not be added.
    pub fn long_press_item(&self, item: MediaItem) -> bool {
        if !self.is_mounted() {
            return false;
        }

        self.activate_multi_select();
        if self.selection.with_state(|selection| selection.contains(&item.id)) {
            return true;
        }
        self.selection.toggle(item)
    }

    pub fn activate_multi_select(&self) -> bool {
        let (started, phase) = {
            let mut mode = lock(&self.multi_select);
            (mode.activate(), mode.phase())
        };
        if started {
            self.events.emit(PickerEvent::MultiSelectChanged(phase));
        }
        started
    }

    /// Starts leaving multi-select. The selection is cleared only once the
    /// exit transition completes.
    pub fn deactivate_multi_select(&self) -> bool {
        let (started, phase) = {
            let mut mode = lock(&self.multi_select);
            (mode.deactivate(), mode.phase())
        };
        if started {
            self.events.emit(PickerEvent::MultiSelectChanged(phase));
        }
        started
    }

    /// Moves every running transition along by `elapsed`.
    pub fn advance_transitions(&self, elapsed: Duration) {
        let (completion, phase) = {
            let mut mode = lock(&self.multi_select);
            (mode.advance(elapsed), mode.phase())
        };
        self.complete_multi_select(completion, phase);
        self.permission.advance_banners(elapsed);
    }

    /// Completes every running transition immediately.
    pub fn finish_transitions(&self) {
        let (completion, phase) = {
            let mut mode = lock(&self.multi_select);
            (mode.finish(), mode.phase())
        };
        self.complete_multi_select(completion, phase);
        self.permission.finish_banners();
    }

    fn complete_multi_select(&self, completion: Option<Completion>, phase: MultiSelectPhase) {
        if let Some(completion) = completion {
            completion.run();
            self.events.emit(PickerEvent::MultiSelectChanged(phase));
        }
    }

    /// Closes the picker: hands the selection to the completion callback,
    /// then pops the host navigation. Returns false if already exited.
    pub fn exit(&self) -> bool {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if matches!(*lifecycle, Lifecycle::Exited | Lifecycle::TornDown) {
                return false;
            }
            *lifecycle = Lifecycle::Exited;
        }

        let selection = self.selection.finalize();
        let count = selection.len();
        info!("Picker exiting with {} selected items", count);

        let on_complete = lock(&self.on_complete).take();
        if let Some(on_complete) = on_complete {
            on_complete(selection);
        }
        self.navigator.pop();

        self.events.emit(PickerEvent::Completed { count });
        self.release_resources();
        true
    }

    /// Tears the picker down. Safe to call more than once and at any point,
    /// including while mount is still in flight.
    pub fn unmount(&self) {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if *lifecycle == Lifecycle::TornDown {
                return;
            }
            *lifecycle = Lifecycle::TornDown;
        }
        self.release_resources();
    }

    fn release_resources(&self) {
        self.changes.release();
        self.albums.detach();
        self.selection.detach();
    }

    /// Snapshot of everything the UI renders.
    pub fn view(&self) -> PickerView {
        let albums = self.albums.albums();
        let selected_album_id = self.albums.selected_album_id();
        let loading = self.albums.loading_status();
        let multi_select = self.multi_select_phase();

        self.permission.with_state(|permission| {
            self.selection.with_state(|selection| {
                PickerView::build(
                    permission,
                    &albums,
                    selected_album_id.as_deref(),
                    loading,
                    selection,
                    multi_select,
                )
            })
        })
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PickerEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *lock(&self.lifecycle)
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle() == Lifecycle::Mounted
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.permission.status()
    }

    pub fn has_access(&self) -> bool {
        self.permission.has_access()
    }

    pub fn loading_status(&self) -> LoadingStatus {
        self.albums.loading_status()
    }

    pub fn albums(&self) -> Arc<[Album]> {
        self.albums.albums()
    }

    pub fn selected_album(&self) -> Option<Album> {
        self.albums.selected_album()
    }

    pub fn selected_items(&self) -> Vec<MediaItem> {
        self.selection.items()
    }

    pub fn multi_select_phase(&self) -> MultiSelectPhase {
        lock(&self.multi_select).phase()
    }

    pub fn is_subscribed_to_changes(&self) -> bool {
        self.changes.is_active()
    }

    /// Handle to the album repository, for hosts that trigger reloads
    /// themselves (pull to refresh).
    pub fn album_repository(&self) -> &AlbumRepository {
        &self.albums
    }
}
