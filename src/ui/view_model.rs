//! Read-only snapshot of everything the picker UI renders.
//!
//! Groups the banner, album list, toolbar and grid properties so the
//! rendering layer can refresh from one value instead of querying each store.

use crate::model::{Album, AlbumKind, LoadingStatus, MediaItem, PermissionStatus, Thumbnail};
use crate::state::{MultiSelectPhase, PermissionState, SelectionState, TransitionPhase};

/// Visibility of one permission banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerView {
    pub visible: bool,
    pub phase: TransitionPhase,
}

/// One row of the album switcher.
#[derive(Debug, Clone)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub kind: AlbumKind,
    pub asset_count: usize,
    pub thumbnail: Option<Thumbnail>,
    pub is_selected: bool,
}

/// Groups: title, selected-count, max-selection, multi-select, can-complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarView {
    pub title: Option<String>,
    pub selected_count: usize,
    pub max_selection: usize,
    pub multi_select: MultiSelectPhase,
    pub can_complete: bool,
}

/// One tile of the media grid.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub item: MediaItem,
    /// 1-based badge number when selected.
    pub selection_index: Option<usize>,
    /// False when the selection is full and this item is not part of it.
    pub selectable: bool,
}

#[derive(Debug, Clone)]
pub struct PickerView {
    pub permission: PermissionStatus,
    pub limited_banner: BannerView,
    pub blocked_banner: BannerView,
    pub loading: LoadingStatus,
    pub albums: Vec<AlbumSummary>,
    pub toolbar: ToolbarView,
    pub grid: Vec<GridCell>,
}

impl PickerView {
    pub fn build(
        permission: &PermissionState,
        albums: &[Album],
        selected_album_id: Option<&str>,
        loading: LoadingStatus,
        selection: &SelectionState,
        multi_select: MultiSelectPhase,
    ) -> Self {
        let selected_album = selected_album_id
            .and_then(|id| albums.iter().find(|album| album.id == id));

        let summaries = albums
            .iter()
            .map(|album| AlbumSummary {
                id: album.id.clone(),
                name: album.name.clone(),
                kind: album.kind,
                asset_count: album.asset_count,
                thumbnail: album.thumbnail.clone(),
                is_selected: Some(album.id.as_str()) == selected_album_id,
            })
            .collect();

        let grid = if permission.has_access() {
            selected_album
                .map(|album| grid_cells(&album.assets, selection))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Self {
            permission: permission.status(),
            limited_banner: BannerView {
                visible: permission.limited_banner_visible(),
                phase: permission.limited_banner_phase(),
            },
            blocked_banner: BannerView {
                visible: permission.blocked_banner_visible(),
                phase: permission.blocked_banner_phase(),
            },
            loading,
            albums: summaries,
            toolbar: ToolbarView {
                title: selected_album.map(|album| album.name.clone()),
                selected_count: selection.len(),
                max_selection: selection.max_selection().get(),
                multi_select,
                can_complete: !selection.is_empty(),
            },
            grid,
        }
    }
}

fn grid_cells(assets: &[MediaItem], selection: &SelectionState) -> Vec<GridCell> {
    let full = selection.is_full();
    assets
        .iter()
        .map(|item| {
            let selection_index = selection.position(&item.id);
            GridCell {
                item: item.clone(),
                selection_index,
                selectable: selection_index.is_some() || !full,
            }
        })
        .collect()
}
