//! Listed queries of one folder view

use crate::models::{Folder, QueryId, QueryItem};

/// Enabled state of the bulk toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkButtons {
    pub delete_enabled: bool,
    pub archive_enabled: bool,
}

/// Items listed in the active folder, in display order
///
/// Only items the folder admits are ever kept. Anything that stops being
/// admitted after an action is dropped from the list.
#[derive(Debug, Clone, Default)]
pub struct QueryList {
    view: Folder,
    items: Vec<QueryItem>,
    /// Badge count on the archive folder
    archive_count: usize,
}

impl QueryList {
    /// List for `view`, keeping only the items it admits
    pub fn new(view: Folder, items: impl IntoIterator<Item = QueryItem>) -> Self {
        let mut list = Self {
            view,
            items: Vec::new(),
            archive_count: 0,
        };
        list.replace(view, items);
        list
    }

    pub fn view(&self) -> Folder {
        self.view
    }

    pub fn items(&self) -> &[QueryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: QueryId) -> Option<&QueryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: QueryId) -> Option<&mut QueryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: QueryId) -> bool {
        self.get(id).is_some()
    }

    /// Swap in the server-rendered items of another folder
    ///
    /// Selection and loading flags never carry over between views.
    pub fn replace(&mut self, view: Folder, items: impl IntoIterator<Item = QueryItem>) {
        self.view = view;
        self.items = items
            .into_iter()
            .filter(|item| view.admits(item))
            .map(|mut item| {
                item.selected = false;
                item.loading = false;
                item
            })
            .collect();
    }

    /// Remove an item; `None` if it was not listed
    pub fn remove(&mut self, id: QueryId) -> Option<QueryItem> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Drop the item if the active folder no longer admits it.
    /// Returns true when it was dropped.
    pub fn retain_admitted(&mut self, id: QueryId) -> bool {
        let view = self.view;
        match self.get(id) {
            Some(item) if !view.admits(item) => self.remove(id).is_some(),
            _ => false,
        }
    }

    pub fn set_loading(&mut self, id: QueryId, loading: bool) {
        if let Some(item) = self.get_mut(id) {
            item.loading = loading;
        }
    }

    /// Set every checkbox in the view (the select-all box)
    pub fn set_select_all(&mut self, selected: bool) {
        for item in &mut self.items {
            item.selected = selected;
        }
    }

    pub fn select(&mut self, id: QueryId, selected: bool) {
        if let Some(item) = self.get_mut(id) {
            item.selected = selected;
        }
    }

    pub fn toggle_selected(&mut self, id: QueryId) {
        if let Some(item) = self.get_mut(id) {
            item.selected = !item.selected;
        }
    }

    /// Derived select-all state: checked when the view is non-empty and
    /// every item is selected
    pub fn select_all_state(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.selected)
    }

    /// Selected ids in display order
    pub fn selected_ids(&self) -> Vec<QueryId> {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.id)
            .collect()
    }

    pub fn bulk_buttons(&self) -> BulkButtons {
        let any = self.items.iter().any(|item| item.selected);
        BulkButtons {
            delete_enabled: any,
            archive_enabled: any,
        }
    }

    pub fn archive_count(&self) -> usize {
        self.archive_count
    }

    pub fn set_archive_count(&mut self, count: usize) {
        self.archive_count = count;
    }

    pub(crate) fn bump_archive_count(&mut self) {
        self.archive_count += 1;
    }
}
