//! State management for the media picker.
//!
//! Each store is a plain synchronous state machine. Services share them
//! through `Arc<Mutex<_>>` and never hold a lock across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod albums;
pub mod events;
pub mod multi_select;
pub mod permission;
pub mod selection;
pub mod transition;

pub use albums::{AlbumState, PublishOutcome};
pub use events::{EventBus, ListenerId, PickerEvent};
pub use multi_select::{MultiSelectMode, MultiSelectPhase};
pub use permission::PermissionState;
pub use selection::SelectionState;
pub use transition::{Completion, CompletionAction, Transition, TransitionEdge, TransitionPhase};

/// Locks a store, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
