//! Unified error types for the media picker.

use std::fmt;

/// Picker-specific errors.
#[derive(Debug)]
pub enum PickerError {
    /// `max_selection` must be at least one
    InvalidMaxSelection(usize),
    /// Error enumerating albums or resolving assets
    Library(String),
    /// Error while asking for media access
    Permission(String),
    /// Error decoding an album thumbnail
    Thumbnail(String),
    /// Error subscribing to library change notifications
    Watch(String),
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::InvalidMaxSelection(value) => {
                write!(f, "max selection must be at least 1, got {}", value)
            }
            PickerError::Library(msg) => write!(f, "Media library error: {}", msg),
            PickerError::Permission(msg) => write!(f, "Permission error: {}", msg),
            PickerError::Thumbnail(msg) => write!(f, "Thumbnail error: {}", msg),
            PickerError::Watch(msg) => write!(f, "Change watcher error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

impl From<image::ImageError> for PickerError {
    fn from(err: image::ImageError) -> Self {
        PickerError::Thumbnail(err.to_string())
    }
}

impl From<std::io::Error> for PickerError {
    fn from(err: std::io::Error) -> Self {
        PickerError::Library(err.to_string())
    }
}

impl From<notify::Error> for PickerError {
    fn from(err: notify::Error) -> Self {
        PickerError::Watch(err.to_string())
    }
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, PickerError>;
