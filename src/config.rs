//! Picker configuration and constants.

use crate::error::{PickerError, Result};
use crate::model::MediaTypeFilter;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Supported image file extensions for the filesystem library.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Supported video file extensions for the filesystem library.
pub const SUPPORTED_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "m4v", "webm", "mkv"];

/// Longest edge of generated album thumbnails, in pixels.
pub const THUMBNAIL_EDGE: u32 = 160;

/// Number of decoded thumbnails kept in memory.
pub const THUMBNAIL_CACHE_CAPACITY: usize = 64;

/// Poll interval of the filesystem change watcher.
pub const WATCH_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Quiet period before a burst of filesystem events is reported.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Durations of the animated transitions the picker drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDurations {
    /// Multi-select entry (forward) duration.
    pub multi_select_enter: Duration,
    /// Multi-select exit (reverse) duration.
    pub multi_select_exit: Duration,
    /// Permission banner show/hide duration.
    pub banner: Duration,
}

impl Default for TransitionDurations {
    fn default() -> Self {
        Self {
            multi_select_enter: Duration::from_millis(250),
            multi_select_exit: Duration::from_millis(250),
            banner: Duration::from_millis(300),
        }
    }
}

/// Caller-supplied configuration, fixed for the picker's lifetime.
#[derive(Debug, Clone)]
pub struct PickerConfig {
    max_selection: NonZeroUsize,
    selected_asset_ids: Vec<String>,
    media_type_filter: MediaTypeFilter,
    transitions: TransitionDurations,
}

impl PickerConfig {
    /// Creates a configuration allowing up to `max_selection` items.
    ///
    /// Fails with [`PickerError::InvalidMaxSelection`] when `max_selection` is 0.
    pub fn new(max_selection: usize) -> Result<Self> {
        let max_selection = NonZeroUsize::new(max_selection)
            .ok_or(PickerError::InvalidMaxSelection(max_selection))?;

        Ok(Self {
            max_selection,
            selected_asset_ids: Vec::new(),
            media_type_filter: MediaTypeFilter::default(),
            transitions: TransitionDurations::default(),
        })
    }

    /// Ids of items selected in a previous session of the picker.
    pub fn with_selected_asset_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_asset_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_media_type_filter(mut self, filter: MediaTypeFilter) -> Self {
        self.media_type_filter = filter;
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionDurations) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn max_selection(&self) -> NonZeroUsize {
        self.max_selection
    }

    pub fn selected_asset_ids(&self) -> &[String] {
        &self.selected_asset_ids
    }

    pub fn media_type_filter(&self) -> MediaTypeFilter {
        self.media_type_filter
    }

    pub fn transitions(&self) -> TransitionDurations {
        self.transitions
    }
}
