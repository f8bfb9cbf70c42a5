//! Capacity-bounded, ordered selection of media items.

use crate::model::MediaItem;
use log::debug;
use std::num::NonZeroUsize;

/// Items the user has picked, in the order they were picked.
///
/// Never holds more than `max_selection` items or two items with the same id.
#[derive(Debug, Clone)]
pub struct SelectionState {
    items: Vec<MediaItem>,
    max_selection: NonZeroUsize,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new(max_selection: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            max_selection,
        }
    }

    /// Adds `item` if absent, removes it if present.
    ///
    /// Returns false, leaving the selection untouched, when the item is absent
    /// and the selection is already full.
    pub fn toggle(&mut self, item: MediaItem) -> bool {
        if let Some(index) = self.index_of(&item.id) {
            self.items.remove(index);
            return true;
        }

        if self.is_full() {
            debug!(
                "Selection full ({}), rejecting {}",
                self.max_selection, item.id
            );
            return false;
        }

        self.items.push(item);
        true
    }

    /// Merges items resolved from a previous session.
    ///
    /// Restored items go first in their given order, followed by whatever was
    /// selected in the meantime. Duplicates keep their first position and the
    /// result is cut at `max_selection`.
    pub fn apply_restored(&mut self, restored: Vec<MediaItem>) {
        let picked_meanwhile = std::mem::take(&mut self.items);
        for item in restored.into_iter().chain(picked_meanwhile) {
            if self.is_full() {
                break;
            }
            if !self.contains(&item.id) {
                self.items.push(item);
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands the selection to the caller, leaving this state empty.
    pub fn finalize(&mut self) -> Vec<MediaItem> {
        std::mem::take(&mut self.items)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    /// 1-based position of the item, as shown on its selection badge.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index_of(id).map(|index| index + 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_selection.get()
    }

    pub fn max_selection(&self) -> NonZeroUsize {
        self.max_selection
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
