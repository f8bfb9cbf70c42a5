//! Directory scanning for the filesystem media library.

use crate::config::{SUPPORTED_IMAGE_EXTENSIONS, SUPPORTED_VIDEO_EXTENSIONS};
use crate::error::Result;
use crate::model::MediaType;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// A media file found on disk.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub modified: DateTime<Utc>,
}

/// Classifies a path by its extension.
pub fn media_type_of(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Photo)
    } else if SUPPORTED_VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Video)
    } else {
        None
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Reads a single media file's entry, `None` if it is not supported media.
pub fn media_entry(path: &Path) -> Option<MediaEntry> {
    let media_type = media_type_of(path)?;
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    Some(MediaEntry {
        path: path.to_path_buf(),
        media_type,
        modified: DateTime::<Utc>::from(modified),
    })
}

/// Media files directly inside `dir`, sorted by path.
pub fn scan_directory(dir: &Path) -> Result<Vec<MediaEntry>> {
    let mut entries: Vec<MediaEntry> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| !is_hidden(path))
        .filter_map(|path| media_entry(&path))
        .collect();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Every media file under `root`, newest first.
pub fn scan_tree(root: &Path) -> Result<Vec<MediaEntry>> {
    let mut entries = scan_directory(root)?;
    for dir in list_subdirectories(root)? {
        entries.extend(scan_tree(&dir)?);
    }

    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
    Ok(entries)
}

/// Visible subdirectories of `dir`, sorted by path.
///
/// Symlinked directories are skipped so a link back into the tree cannot
/// make [`scan_tree`] loop.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .map(|entry| entry.path())
        .filter(|path| !is_hidden(path))
        .collect();

    dirs.sort();
    Ok(dirs)
}

/// Root-relative, `/`-separated id of a path under `root`.
pub fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    let parts = parts?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Maps an id back to a path under `root`, rejecting ids that would escape it.
pub fn path_for_id(root: &Path, id: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for part in id.split('/') {
        if part.is_empty() || part == "." || part == ".." {
            return None;
        }
        path.push(part);
    }
    Some(path)
}
