//! Scripted in-memory collaborators for driving the picker in tests.

#![allow(dead_code)]

use async_std::channel::Receiver;
use async_trait::async_trait;
use chrono::Utc;
use media_picker::{
    AlbumDescriptor, AlbumKind, ChangeCallback, LibrarySubscription, MediaItem, MediaLibrary,
    MediaType, MediaTypeFilter, Navigator, PermissionProvider, PermissionStatus, PickerError,
    Result, Thumbnail,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn item(id: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        uri: format!("mock://{}", id),
        media_type: MediaType::Photo,
        modified: Utc::now(),
    }
}

pub fn descriptor(id: &str) -> AlbumDescriptor {
    AlbumDescriptor {
        id: id.to_string(),
        name: id.to_string(),
        kind: if id == "recents" {
            AlbumKind::Recents
        } else {
            AlbumKind::Folder
        },
        last_modified: Utc::now(),
    }
}

pub fn ids(items: &[MediaItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

type Subscribers = Arc<Mutex<Vec<(u64, ChangeCallback)>>>;

#[derive(Default)]
struct LibraryContents {
    listing: Vec<AlbumDescriptor>,
    album_items: HashMap<String, Vec<MediaItem>>,
    items: HashMap<String, MediaItem>,
    missing: HashSet<String>,
    failing_album: Option<String>,
    scripted: VecDeque<(Vec<AlbumDescriptor>, Option<Receiver<()>>)>,
}

/// Media library whose contents and timing are set up by the test.
#[derive(Default)]
pub struct MockLibrary {
    contents: Mutex<LibraryContents>,
    subscribers: Subscribers,
    next_subscriber: AtomicU64,
    list_calls: AtomicUsize,
    refuse_subscriptions: AtomicBool,
}

impl MockLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds an album listing `item_ids`, registering the items for lookup.
    pub fn add_album(&self, id: &str, item_ids: &[&str]) {
        let mut contents = self.contents.lock().unwrap();
        let items: Vec<MediaItem> = item_ids.iter().map(|id| item(id)).collect();
        for item in &items {
            contents.items.insert(item.id.clone(), item.clone());
        }
        contents.listing.push(descriptor(id));
        contents.album_items.insert(id.to_string(), items);
    }

    pub fn remove_album(&self, id: &str) {
        let mut contents = self.contents.lock().unwrap();
        contents.listing.retain(|album| album.id != id);
        contents.album_items.remove(id);
    }

    /// Keeps the item resolvable but reports it as no longer existing.
    pub fn mark_missing(&self, id: &str) {
        self.contents.lock().unwrap().missing.insert(id.to_string());
    }

    /// Makes `assets` fail for the album.
    pub fn fail_assets_for(&self, album_id: Option<&str>) {
        self.contents.lock().unwrap().failing_album = album_id.map(str::to_string);
    }

    /// Queues the answer of one upcoming `list_albums` call. With a gate,
    /// the call does not return until the gate receives a message.
    pub fn script_listing(&self, album_ids: &[&str], gate: Option<Receiver<()>>) {
        let albums = album_ids.iter().map(|id| descriptor(id)).collect();
        self.contents
            .lock()
            .unwrap()
            .scripted
            .push_back((albums, gate));
    }

    /// Makes `subscribe_to_changes` fail while `refuse` holds.
    pub fn refuse_subscriptions(&self, refuse: bool) {
        self.refuse_subscriptions.store(refuse, Ordering::SeqCst);
    }

    pub fn fire_change(&self) {
        let callbacks: Vec<ChangeCallback> = self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaLibrary for MockLibrary {
    async fn list_albums(&self, _filter: MediaTypeFilter) -> Result<Vec<AlbumDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let (albums, gate) = {
            let mut contents = self.contents.lock().unwrap();
            match contents.scripted.pop_front() {
                Some(scripted) => scripted,
                None => (contents.listing.clone(), None),
            }
        };

        if let Some(gate) = gate {
            let _ = gate.recv().await;
        }
        Ok(albums)
    }

    async fn thumbnail(&self, _album: &AlbumDescriptor) -> Result<Option<Thumbnail>> {
        Ok(None)
    }

    async fn assets(
        &self,
        album: &AlbumDescriptor,
        _filter: MediaTypeFilter,
    ) -> Result<Vec<MediaItem>> {
        let contents = self.contents.lock().unwrap();
        if contents.failing_album.as_deref() == Some(album.id.as_str()) {
            return Err(PickerError::Library(format!("cannot read {}", album.id)));
        }
        Ok(contents
            .album_items
            .get(&album.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn asset_count(
        &self,
        album: &AlbumDescriptor,
        _filter: MediaTypeFilter,
    ) -> Result<usize> {
        let contents = self.contents.lock().unwrap();
        Ok(contents.album_items.get(&album.id).map_or(0, Vec::len))
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<MediaItem>> {
        Ok(self.contents.lock().unwrap().items.get(id).cloned())
    }

    async fn exists(&self, item: &MediaItem) -> Result<bool> {
        Ok(!self.contents.lock().unwrap().missing.contains(&item.id))
    }

    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> Result<LibrarySubscription> {
        if self.refuse_subscriptions.load(Ordering::SeqCst) {
            return Err(PickerError::Watch("change source unavailable".to_string()));
        }
        let id = self.next_subscriber.fetch_add(1, Ordering::SeqCst);
        self.subscribers.lock().unwrap().push((id, on_change));

        let subscribers = self.subscribers.clone();
        Ok(LibrarySubscription::new(move || {
            subscribers
                .lock()
                .unwrap()
                .retain(|(subscriber, _)| *subscriber != id);
        }))
    }
}

/// Permission provider answering with a fixed status, optionally only after
/// a gate opens. Without a status the request fails.
pub struct ScriptedPermission {
    status: Option<PermissionStatus>,
    gate: Mutex<Option<Receiver<()>>>,
    calls: AtomicUsize,
}

impl ScriptedPermission {
    pub fn new(status: PermissionStatus) -> Arc<Self> {
        Arc::new(Self {
            status: Some(status),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            status: None,
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn gated(status: PermissionStatus, gate: Receiver<()>) -> Arc<Self> {
        Arc::new(Self {
            status: Some(status),
            gate: Mutex::new(Some(gate)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionProvider for ScriptedPermission {
    async fn request_access(&self) -> Result<PermissionStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv().await;
        }
        self.status
            .ok_or_else(|| PickerError::Permission("media access service unavailable".to_string()))
    }
}

/// Records host-visible effects in order: completions and pops.
#[derive(Default)]
pub struct Host {
    pub log: Arc<Mutex<Vec<String>>>,
    pub delivered: Arc<Mutex<Option<Vec<MediaItem>>>>,
}

impl Host {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn completion(&self) -> media_picker::CompletionCallback {
        let log = self.log.clone();
        let delivered = self.delivered.clone();
        Box::new(move |items: Vec<MediaItem>| {
            log.lock().unwrap().push("complete".to_string());
            *delivered.lock().unwrap() = Some(items);
        })
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn delivered_ids(&self) -> Option<Vec<String>> {
        self.delivered
            .lock()
            .unwrap()
            .as_ref()
            .map(|items| items.iter().map(|item| item.id.clone()).collect())
    }
}

impl Navigator for Host {
    fn pop(&self) {
        self.log.lock().unwrap().push("pop".to_string());
    }
}
