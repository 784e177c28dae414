//! Per-item query actions
//!
//! Each action goes to the server first and only touches the listed item
//! once the server confirms. Failures become danger notifications and leave
//! the list as it was.

use log::{error, info};
use std::sync::Arc;

use super::QueryList;
use crate::api::PortalApi;
use crate::error::{RequestError, RequestResult};
use crate::models::QueryId;
use crate::ui::{Notification, PageSurface};

/// Route of a query's detail page
pub fn view_route(id: QueryId) -> String {
    format!("/support_tickets/{}", id)
}

/// Handler for star, archive, delete and restore on single queries
///
/// Holds the two outside collaborators; the list itself is passed in so
/// the caller keeps ownership of its view model.
#[derive(Clone)]
pub struct QueryActions {
    api: Arc<dyn PortalApi>,
    surface: Arc<dyn PageSurface>,
}

impl QueryActions {
    pub fn new(api: Arc<dyn PortalApi>, surface: Arc<dyn PageSurface>) -> Self {
        Self { api, surface }
    }

    pub fn api(&self) -> &Arc<dyn PortalApi> {
        &self.api
    }

    pub fn surface(&self) -> &Arc<dyn PageSurface> {
        &self.surface
    }

    /// Flip the star on a query
    ///
    /// The item shows as loading for the duration of the request. Returns
    /// true when the server accepted the change.
    pub fn toggle_star(&self, list: &mut QueryList, id: QueryId) -> bool {
        list.set_loading(id, true);
        let result = self.api.toggle_star(id);
        list.set_loading(id, false);

        match result {
            Ok(()) => {
                if let Some(item) = list.get_mut(id) {
                    item.starred = !item.starred;
                }
                list.retain_admitted(id);
                info!("Toggled star on query {}", id);
                self.surface
                    .notify(Notification::success("Query star status updated"));
                true
            }
            Err(e) => self.fail(id, "toggle star", &e, "Failed to update star status"),
        }
    }

    /// Archive or unarchive a query, as decided by the server
    pub fn toggle_archive(&self, list: &mut QueryList, id: QueryId) -> bool {
        let result = self.api.toggle_archive(id);
        match self.apply_archive_toggle(list, id, result) {
            Ok(archived) => {
                self.surface.notify(Notification::success(if archived {
                    "Query Archived"
                } else {
                    "Query Unarchived"
                }));
                true
            }
            Err(e) => self.fail(id, "toggle archive", &e, "Failed to archive query"),
        }
    }

    /// Delete a query after confirmation
    ///
    /// `permanent` removes it for good (trash view); otherwise it moves to
    /// trash. Declining the confirmation sends nothing.
    pub fn delete_query(&self, list: &mut QueryList, id: QueryId, permanent: bool) -> bool {
        let prompt = if permanent {
            "Permanently delete this query?"
        } else {
            "Move this query to trash?"
        };
        if !self.surface.confirm(prompt) {
            return false;
        }

        match self.delete_query_silent(list, id, permanent) {
            Ok(()) => {
                self.surface.notify(Notification::success("Query Deleted"));
                true
            }
            Err(e) => self.fail(id, "delete", &e, "Failed to delete query"),
        }
    }

    /// Delete without confirmation or notification (bulk use)
    pub fn delete_query_silent(
        &self,
        list: &mut QueryList,
        id: QueryId,
        permanent: bool,
    ) -> RequestResult<()> {
        let result = self.api.delete_query(id, permanent);
        self.apply_delete(list, id, permanent, result)
    }

    /// Move a query out of trash after confirmation
    pub fn restore_query(&self, list: &mut QueryList, id: QueryId) -> bool {
        if !self.surface.confirm("Restore this query?") {
            return false;
        }

        match self.api.restore_query(id) {
            Ok(()) => {
                if let Some(item) = list.get_mut(id) {
                    item.trashed = false;
                }
                list.retain_admitted(id);
                info!("Restored query {}", id);
                self.surface.notify(Notification::success("Query Restored"));
                true
            }
            Err(e) => self.fail(id, "restore", &e, "Failed to restore query"),
        }
    }

    /// One-way archive after confirmation; bumps the archive badge
    pub fn archive_query(&self, list: &mut QueryList, id: QueryId) -> bool {
        if !self.surface.confirm("Archive this query?") {
            return false;
        }

        match self.api.archive_query(id) {
            Ok(()) => {
                if let Some(item) = list.get_mut(id) {
                    item.archived = true;
                }
                list.retain_admitted(id);
                list.bump_archive_count();
                info!("Archived query {}", id);
                self.surface.notify(Notification::success("Query Archived"));
                true
            }
            Err(e) => self.fail(id, "archive", &e, "Failed to archive query"),
        }
    }

    /// Open the detail page of a query
    pub fn view_query(&self, id: QueryId) {
        self.surface.navigate(&view_route(id));
    }

    /// Apply a finished delete request to the list
    pub(crate) fn apply_delete(
        &self,
        list: &mut QueryList,
        id: QueryId,
        permanent: bool,
        result: RequestResult<()>,
    ) -> RequestResult<()> {
        result?;
        if permanent {
            list.remove(id);
        } else {
            if let Some(item) = list.get_mut(id) {
                item.trashed = true;
            }
            list.retain_admitted(id);
        }
        info!(
            "Deleted query {} ({})",
            id,
            if permanent { "permanent" } else { "trash" }
        );
        Ok(())
    }

    /// Apply a finished archive toggle to the list; yields the new flag
    pub(crate) fn apply_archive_toggle(
        &self,
        list: &mut QueryList,
        id: QueryId,
        result: RequestResult<bool>,
    ) -> RequestResult<bool> {
        let archived = result?;
        if let Some(item) = list.get_mut(id) {
            item.archived = archived;
        }
        list.retain_admitted(id);
        info!(
            "Query {} {}",
            id,
            if archived { "archived" } else { "unarchived" }
        );
        Ok(archived)
    }

    fn fail(&self, id: QueryId, action: &str, err: &RequestError, fallback: &str) -> bool {
        error!("Failed to {} query {}: {}", action, id, err);
        self.surface.notify(Notification::danger(err.notice(fallback)));
        false
    }
}
