//! Service for acquiring media access.
//!
//! Asks the permission provider once per picker lifetime and keeps the
//! banners in [`PermissionState`] in step with the answer.

use crate::library::PermissionProvider;
use crate::model::PermissionStatus;
use crate::state::{EventBus, PermissionState, PickerEvent, lock};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Service for requesting and tracking media permission.
#[derive(Clone)]
pub struct PermissionCoordinator {
    provider: Arc<dyn PermissionProvider>,
    state: Arc<Mutex<PermissionState>>,
    /// Held across the provider call so concurrent callers share one request.
    requested: Arc<async_std::sync::Mutex<bool>>,
    events: EventBus,
}

impl PermissionCoordinator {
    pub fn new(
        provider: Arc<dyn PermissionProvider>,
        banner_duration: Duration,
        events: EventBus,
    ) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(PermissionState::new(banner_duration))),
            requested: Arc::new(async_std::sync::Mutex::new(false)),
            events,
        }
    }

    /// Requests access on the first call and returns the cached status on
    /// every later call.
    ///
    /// A failed request counts as `Denied` for the rest of the session.
    pub async fn request_access(&self) -> PermissionStatus {
        let mut requested = self.requested.lock().await;
        if *requested {
            return self.status();
        }

        let status = match self.provider.request_access().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Permission request failed, treating as denied: {}", e);
                PermissionStatus::Denied
            }
        };
        *requested = true;
        drop(requested);

        info!("Media permission resolved: {:?}", status);
        self.apply_status(status);
        status
    }

    /// Applies a status reported outside of the initial request, e.g. after
    /// the user changed it in the system settings. Returns true if it changed.
    pub fn apply_status(&self, status: PermissionStatus) -> bool {
        let changed = lock(&self.state).apply(status);
        if changed {
            self.events.emit(PickerEvent::PermissionChanged(status));
            self.events.emit(PickerEvent::BannersChanged);
        }
        changed
    }

    /// Moves the banner transitions along by `elapsed`.
    pub fn advance_banners(&self, elapsed: Duration) {
        let moved = lock(&self.state).advance(elapsed);
        if moved {
            self.events.emit(PickerEvent::BannersChanged);
        }
    }

    /// Snaps the banner transitions to their targets.
    pub fn finish_banners(&self) {
        let moved = lock(&self.state).finish();
        if moved {
            self.events.emit(PickerEvent::BannersChanged);
        }
    }

    pub fn status(&self) -> PermissionStatus {
        lock(&self.state).status()
    }

    pub fn has_access(&self) -> bool {
        lock(&self.state).has_access()
    }

    /// Reads the permission state under its lock.
    pub fn with_state<R>(&self, read: impl FnOnce(&PermissionState) -> R) -> R {
        read(&lock(&self.state))
    }
}
