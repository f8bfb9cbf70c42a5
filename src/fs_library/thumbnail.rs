//! Album thumbnails for the filesystem library.
//!
//! Decodes and downscales covers on the rayon pool and keeps the results in
//! an LRU cache keyed by path and modification time, so an edited file is
//! decoded again.

use crate::error::{PickerError, Result};
use crate::model::Thumbnail;
use chrono::{DateTime, Utc};
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

type CacheKey = (PathBuf, DateTime<Utc>);

/// LRU cache for decoded thumbnails.
pub struct ThumbnailCache {
    cache: LruCache<CacheKey, Thumbnail>,
}

impl ThumbnailCache {
    /// Creates a new thumbnail cache with the specified capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Retrieves a thumbnail if one was decoded for this file version.
    pub fn get(&mut self, path: &Path, modified: DateTime<Utc>) -> Option<Thumbnail> {
        let result = self.cache.get(&(path.to_path_buf(), modified)).cloned();
        if result.is_some() {
            debug!("Thumbnail cache HIT: {}", path.display());
        } else {
            debug!("Thumbnail cache MISS: {}", path.display());
        }
        result
    }

    pub fn put(&mut self, path: PathBuf, modified: DateTime<Utc>, thumbnail: Thumbnail) {
        debug!(
            "Thumbnail cache PUT: {} ({}x{})",
            path.display(),
            thumbnail.width,
            thumbnail.height
        );
        self.cache.put((path, modified), thumbnail);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Decodes `path` and scales it to fit in an `edge` x `edge` box. Blocking.
pub fn decode_thumbnail(path: &Path, edge: u32) -> Result<Thumbnail> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .thumbnail(edge, edge)
        .to_rgb8();

    let (width, height) = image.dimensions();
    Ok(Thumbnail::new(
        format!("file://{}", path.display()),
        width,
        height,
        image.into_raw(),
    ))
}

/// Runs [`decode_thumbnail`] on the rayon pool and awaits the result.
pub async fn load_thumbnail(path: PathBuf, edge: u32) -> Result<Thumbnail> {
    let (tx, rx) = async_std::channel::bounded(1);
    rayon::spawn(move || {
        let result = decode_thumbnail(&path, edge);
        let _ = tx.try_send(result);
    });

    rx.recv()
        .await
        .map_err(|e| PickerError::Thumbnail(format!("Decode task dropped: {}", e)))?
}
