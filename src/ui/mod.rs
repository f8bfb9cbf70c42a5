//! View surface of the picker.
//!
//! Threading model:
//! - async entry points (`mount`, `permission_changed`) run on whatever
//!   executor the host drives; library change notifications spawn reloads on
//!   the async-std executor
//! - everything else is synchronous and returns once the stores are updated

pub mod coordinator;
pub mod view_model;

pub use coordinator::{CompletionCallback, ItemPress, Lifecycle, ViewCoordinator};
pub use view_model::{AlbumSummary, BannerView, GridCell, PickerView, ToolbarView};
