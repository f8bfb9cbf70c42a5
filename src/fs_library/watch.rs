//! Change notifications for the filesystem library.
//!
//! Watches the library root with a debounced poll watcher and reports bursts
//! of changes that touch media files or directories.

use crate::config::{WATCH_DEBOUNCE, WATCH_POLL_INTERVAL};
use crate::error::Result;
use crate::fs_library::scan::media_type_of;
use crate::library::{ChangeCallback, LibrarySubscription};
use log::{debug, warn};
use notify_debouncer_mini::notify::{self, PollWatcher, RecursiveMode};
use notify_debouncer_mini::{Config, DebounceEventResult, DebouncedEvent, new_debouncer_opt};
use std::path::Path;

/// Whether an event path can change the album list.
fn is_relevant(path: &Path) -> bool {
    media_type_of(path).is_some() || path.extension().is_none()
}

/// Handles debounced file system events.
fn handle_debounced_events(events: Vec<DebouncedEvent>, on_change: &ChangeCallback) {
    let relevant: Vec<_> = events
        .into_iter()
        .filter(|event| is_relevant(&event.path))
        .collect();

    if relevant.is_empty() {
        return;
    }

    debug!("Debounced library events: {} events", relevant.len());
    for event in &relevant {
        debug!("  - {:?} for {}", event.kind, event.path.display());
    }

    on_change();
}

/// Starts watching `root` recursively. Watching stops when the returned
/// subscription is released or dropped.
pub fn watch_library(root: &Path, on_change: ChangeCallback) -> Result<LibrarySubscription> {
    let notify_config = notify::Config::default().with_poll_interval(WATCH_POLL_INTERVAL);
    let debouncer_config = Config::default()
        .with_timeout(WATCH_DEBOUNCE)
        .with_notify_config(notify_config);

    let mut debouncer = new_debouncer_opt::<_, PollWatcher>(
        debouncer_config,
        move |res: DebounceEventResult| match res {
            Ok(events) => handle_debounced_events(events, &on_change),
            Err(error) => {
                let error_msg = error.to_string();
                if !error_msg.contains(".tmp") {
                    warn!("Library watcher error: {}", error);
                }
            }
        },
    )?;

    debouncer.watcher().watch(root, RecursiveMode::Recursive)?;
    debug!("Watching {} for changes", root.display());

    Ok(LibrarySubscription::new(move || drop(debouncer)))
}
