//! Multi-item selection over an ordered listing.
//!
//! [`SelectionModel`] reconciles point clicks, checkbox toggles, drag ranges and
//! context-menu pre-selection into one selected set of indices. It never fails:
//! indices outside the current listing are ignored.

pub mod gesture;

use std::collections::BTreeSet;

use tracing::debug;

pub use gesture::{ClickIntent, ClickModifiers, ClickSettings};

/// Selected indices over a listing of `len` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    /// Number of entries in the current listing.
    len: usize,
    /// Selected indices, kept sorted.
    selected: BTreeSet<usize>,
    /// First index touched by the current range or drag gesture.
    anchor: Option<usize>,
    /// Index of the most recent toggle.
    last_toggled: Option<usize>,
    /// Whether a drag gesture is in progress.
    dragging: bool,
}

impl SelectionModel {
    /// Create an empty selection over a listing of `len` entries.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Default::default()
        }
    }

    /// Replace the listing: clears every selection and gesture state.
    pub fn reset(&mut self, len: usize) {
        debug!(len, previous = self.selected.len(), "Resetting selection");
        *self = Self::new(len);
    }

    /// Number of entries in the listing this selection covers.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Toggle an entry.
    ///
    /// * `exclusive` - selection becomes exactly `{index}`, whatever was selected before
    ///   (right-click and per-row action buttons).
    /// * `extend` - flip membership of `index`, leaving the rest untouched (checkboxes).
    /// * neither - collapse to `{index}` (plain click). Repeating it is a no-op.
    pub fn toggle(&mut self, index: usize, extend: bool, exclusive: bool) {
        if index >= self.len {
            return;
        }

        if exclusive || !extend {
            self.select_only(index);
        } else if !self.selected.remove(&index) {
            self.selected.insert(index);
        }

        self.anchor = Some(index);
        self.last_toggled = Some(index);
    }

    /// Select the inclusive span between `anchor` and `target`, replacing the
    /// current selection. The order of the two indices does not matter.
    pub fn select_range(&mut self, anchor: usize, target: usize) {
        if self.len == 0 {
            return;
        }
        let lo = anchor.min(target);
        if lo >= self.len {
            return;
        }
        let hi = anchor.max(target).min(self.len - 1);

        self.selected = (lo..=hi).collect();
        self.anchor = Some(anchor.min(self.len - 1));
    }

    /// Start a drag gesture at `index`. The anchor is held until [`end_drag`](Self::end_drag).
    pub fn begin_drag(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.dragging = true;
        self.anchor = Some(index);
        self.select_range(index, index);
    }

    /// Extend the current drag gesture to `index`.
    ///
    /// Without a gesture in progress this starts one at `index`.
    pub fn update_drag(&mut self, index: usize) {
        match self.anchor {
            Some(anchor) if self.dragging => self.select_range(anchor, index),
            _ => self.begin_drag(index),
        }
    }

    /// Finish the current drag gesture, keeping its selection.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Select every entry.
    pub fn select_all(&mut self) {
        self.selected = (0..self.len).collect();
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.last_toggled = None;
        self.dragging = false;
    }

    /// Whether `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Number of selected entries.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether every entry of a non-empty listing is selected.
    pub fn is_all_selected(&self) -> bool {
        self.len > 0 && self.selected.len() == self.len
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Anchor of the current range or drag gesture.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Index of the most recent toggle.
    pub fn last_toggled(&self) -> Option<usize> {
        self.last_toggled
    }

    /// The selected items of `items`, in ascending index order.
    ///
    /// Indices past the end of `items` are skipped.
    pub fn selected_entries<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.selected.iter().filter_map(|&i| items.get(i)).collect()
    }

    fn select_only(&mut self, index: usize) {
        if self.selected.len() == 1 && self.selected.contains(&index) {
            return;
        }
        self.selected.clear();
        self.selected.insert(index);
    }
}
