//! State coordination for a photo and video album picker.
//!
//! Reconciles permission acquisition, asynchronous album loading, restoring
//! a previous selection and library change notifications into one view
//! state, exposed through [`ViewCoordinator`].
//!
//! Layers:
//! - `state`: synchronous stores and transition state machines
//! - `services`: async work against the [`MediaLibrary`] and
//!   [`PermissionProvider`] collaborators
//! - `ui`: the coordinator and the [`PickerView`] snapshot
//! - `fs_library`: a directory tree as a media library

pub mod config;
pub mod error;
pub mod fs_library;
pub mod library;
pub mod model;
pub mod services;
pub mod state;
pub mod ui;

pub use config::{PickerConfig, TransitionDurations};
pub use error::{PickerError, Result};
pub use fs_library::{FsMediaLibrary, FsPermission};
pub use library::{
    ChangeCallback, LibrarySubscription, MediaLibrary, Navigator, PermissionProvider,
};
pub use model::{
    Album, AlbumDescriptor, AlbumKind, LoadingStatus, MediaItem, MediaType, MediaTypeFilter,
    PermissionStatus, Thumbnail,
};
pub use state::{ListenerId, MultiSelectPhase, PickerEvent};
pub use ui::{CompletionCallback, ItemPress, Lifecycle, PickerView, ViewCoordinator};
