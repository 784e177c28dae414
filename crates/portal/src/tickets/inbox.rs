//! Folder view and bulk-action controller

use log::{info, warn};
use rayon::prelude::*;
use std::sync::Arc;

use super::{BulkButtons, QueryActions, QueryList};
use crate::api::PortalApi;
use crate::error::RequestError;
use crate::models::{Folder, QueryId, QueryItem};
use crate::ui::{Notification, PageSurface};

/// Part of a listed item that received a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Anywhere outside the action buttons
    Body,
    StarButton,
    ArchiveButton,
    DeleteButton,
    RestoreButton,
    Checkbox,
}

/// Outcome of a bulk action, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: Vec<QueryId>,
    pub failed: Vec<(QueryId, RequestError)>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The support-tickets page: one active folder, its items and the toolbar
pub struct TicketInbox {
    list: QueryList,
    actions: QueryActions,
}

impl TicketInbox {
    /// Inbox showing `view` with the server-rendered `items`
    pub fn new(
        api: Arc<dyn PortalApi>,
        surface: Arc<dyn PageSurface>,
        view: Folder,
        items: impl IntoIterator<Item = QueryItem>,
    ) -> Self {
        Self {
            list: QueryList::new(view, items),
            actions: QueryActions::new(api, surface),
        }
    }

    pub fn current_view(&self) -> Folder {
        self.list.view()
    }

    pub fn list(&self) -> &QueryList {
        &self.list
    }

    pub fn items(&self) -> &[QueryItem] {
        self.list.items()
    }

    pub fn actions(&self) -> &QueryActions {
        &self.actions
    }

    /// Switch to another folder with its server-rendered items
    pub fn switch_view(&mut self, view: Folder, items: impl IntoIterator<Item = QueryItem>) {
        self.list.replace(view, items);
        info!("Showing {} ({} queries)", view, self.list.len());
    }

    /// Route a click on a listed item
    ///
    /// Only a click on the body opens the query; buttons run their action
    /// and nothing else.
    pub fn click(&mut self, id: QueryId, target: ClickTarget) {
        match target {
            ClickTarget::Body => self.view_query(id),
            ClickTarget::StarButton => {
                self.toggle_star(id);
            }
            ClickTarget::ArchiveButton => {
                self.toggle_archive(id);
            }
            ClickTarget::DeleteButton => {
                self.delete_query(id);
            }
            ClickTarget::RestoreButton => {
                self.restore_query(id);
            }
            ClickTarget::Checkbox => self.toggle_selected(id),
        }
    }

    pub fn toggle_star(&mut self, id: QueryId) -> bool {
        self.actions.toggle_star(&mut self.list, id)
    }

    pub fn toggle_archive(&mut self, id: QueryId) -> bool {
        self.actions.toggle_archive(&mut self.list, id)
    }

    /// Delete one query; permanent when viewing trash
    pub fn delete_query(&mut self, id: QueryId) -> bool {
        let permanent = self.permanent_delete();
        self.actions.delete_query(&mut self.list, id, permanent)
    }

    pub fn restore_query(&mut self, id: QueryId) -> bool {
        self.actions.restore_query(&mut self.list, id)
    }

    pub fn archive_query(&mut self, id: QueryId) -> bool {
        self.actions.archive_query(&mut self.list, id)
    }

    pub fn view_query(&self, id: QueryId) {
        self.actions.view_query(id);
    }

    pub fn set_select_all(&mut self, selected: bool) {
        self.list.set_select_all(selected);
    }

    pub fn toggle_selected(&mut self, id: QueryId) {
        self.list.toggle_selected(id);
    }

    pub fn select(&mut self, id: QueryId, selected: bool) {
        self.list.select(id, selected);
    }

    pub fn select_all_state(&self) -> bool {
        self.list.select_all_state()
    }

    pub fn bulk_buttons(&self) -> BulkButtons {
        self.list.bulk_buttons()
    }

    /// Delete every selected query after one confirmation
    ///
    /// Requests run concurrently; results are applied in selection order.
    /// Returns `None` when nothing was selected or the user declined.
    pub fn delete_selected(&mut self) -> Option<BulkReport> {
        let ids = self.list.selected_ids();
        if ids.is_empty() {
            return None;
        }

        let permanent = self.permanent_delete();
        let prompt = format!(
            "{} {} selected queries?",
            if permanent {
                "Permanently Delete All Selected Queries"
            } else {
                "Move all selected queries to trash"
            },
            ids.len()
        );
        if !self.actions.surface().confirm(&prompt) {
            return None;
        }

        info!("Bulk delete of {} queries (permanent: {})", ids.len(), permanent);
        let api = self.actions.api().clone();
        let results: Vec<_> = ids
            .par_iter()
            .map(|&id| (id, api.delete_query(id, permanent)))
            .collect();

        let mut report = BulkReport::default();
        for (id, result) in results {
            match self.actions.apply_delete(&mut self.list, id, permanent, result) {
                Ok(()) => report.succeeded.push(id),
                Err(e) => {
                    warn!("Bulk delete of query {} failed: {}", id, e);
                    report.failed.push((id, e));
                }
            }
        }

        let done = if permanent { "deleted" } else { "moved to trash" };
        self.report(&report, done, "delete");
        Some(report)
    }

    /// Toggle archive on every selected query after one confirmation
    pub fn archive_selected(&mut self) -> Option<BulkReport> {
        let ids = self.list.selected_ids();
        if ids.is_empty() {
            return None;
        }
        let prompt = format!("Archive {} selected queries?", ids.len());
        if !self.actions.surface().confirm(&prompt) {
            return None;
        }

        info!("Bulk archive of {} queries", ids.len());
        let api = self.actions.api().clone();
        let results: Vec<_> = ids
            .par_iter()
            .map(|&id| (id, api.toggle_archive(id)))
            .collect();

        let mut report = BulkReport::default();
        for (id, result) in results {
            match self.actions.apply_archive_toggle(&mut self.list, id, result) {
                Ok(_) => report.succeeded.push(id),
                Err(e) => {
                    warn!("Bulk archive of query {} failed: {}", id, e);
                    report.failed.push((id, e));
                }
            }
        }

        self.report(&report, "updated", "archive");
        Some(report)
    }

    /// Full resync with the server
    pub fn refresh(&self) {
        self.actions.surface().reload();
    }

    fn permanent_delete(&self) -> bool {
        self.list.view() == Folder::Trash
    }

    fn report(&self, report: &BulkReport, done: &str, verb: &str) {
        let notification = if report.is_success() {
            Notification::success(format!("{} queries {}", report.succeeded.len(), done))
        } else {
            Notification::danger(format!(
                "Failed to {} {} of {} selected queries",
                verb,
                report.failed.len(),
                report.total()
            ))
        };
        self.actions.surface().notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InMemoryPortal, RecordedRequest};
    use crate::ui::{NotificationKind, RecordingSurface, SurfaceEvent};

    fn inbox_with(
        view: Folder,
        items: Vec<QueryItem>,
    ) -> (Arc<InMemoryPortal>, Arc<RecordingSurface>, TicketInbox) {
        let api = Arc::new(InMemoryPortal::with_tickets(items.clone()));
        let surface = Arc::new(RecordingSurface::new(true));
        let inbox = TicketInbox::new(api.clone(), surface.clone(), view, items);
        (api, surface, inbox)
    }

    fn three() -> Vec<QueryItem> {
        vec![
            QueryItem::new(1, "Fees"),
            QueryItem::new(2, "Hostel"),
            QueryItem::new(3, "Library"),
        ]
    }

    #[test]
    fn test_body_click_navigates_buttons_do_not() {
        let (_, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        inbox.click(QueryId(2), ClickTarget::StarButton);
        inbox.click(QueryId(2), ClickTarget::Checkbox);
        assert!(
            !surface
                .events()
                .iter()
                .any(|e| matches!(e, SurfaceEvent::Navigate(_)))
        );
        assert_eq!(inbox.list().selected_ids(), vec![QueryId(2)]);

        inbox.click(QueryId(2), ClickTarget::Body);
        assert_eq!(
            surface.events().last(),
            Some(&SurfaceEvent::Navigate("/support_tickets/2".into()))
        );
    }

    #[test]
    fn test_delete_selected_nothing_selected() {
        let (api, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        assert!(inbox.delete_selected().is_none());
        assert!(inbox.archive_selected().is_none());
        assert!(api.requests().is_empty());
        assert!(surface.events().is_empty());
    }

    #[test]
    fn test_delete_selected_declined() {
        let (api, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        surface.set_answer(false);
        inbox.select(QueryId(1), true);
        assert!(inbox.delete_selected().is_none());
        assert!(api.requests().is_empty());
        assert_eq!(
            surface.confirmations(),
            vec!["Move all selected queries to trash 1 selected queries?"]
        );
    }

    #[test]
    fn test_delete_selected_in_trash_is_permanent() {
        let trashed: Vec<_> = three().into_iter().map(|q| q.trashed(true)).collect();
        let (api, surface, mut inbox) = inbox_with(Folder::Trash, trashed);
        inbox.set_select_all(true);

        let report = inbox.delete_selected().unwrap();
        assert_eq!(report.succeeded, vec![QueryId(1), QueryId(2), QueryId(3)]);
        assert!(inbox.items().is_empty());
        assert!(api.requests().iter().all(|r| matches!(
            r,
            RecordedRequest::Delete {
                permanent: true,
                ..
            }
        )));
        assert!(surface.confirmations()[0].starts_with("Permanently Delete All Selected Queries 3"));
    }

    #[test]
    fn test_partial_bulk_failure_reported_once() {
        let (api, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        api.fail_ticket(QueryId(2), RequestError::Timeout);
        inbox.set_select_all(true);

        let report = inbox.delete_selected().unwrap();
        assert_eq!(report.succeeded, vec![QueryId(1), QueryId(3)]);
        assert_eq!(report.failed, vec![(QueryId(2), RequestError::Timeout)]);
        assert_eq!(inbox.items().len(), 1);
        assert!(inbox.items()[0].selected);

        let notes = surface.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Danger);
        assert_eq!(notes[0].message, "Failed to delete 1 of 3 selected queries");
    }

    #[test]
    fn test_archive_selected() {
        let (api, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        inbox.select(QueryId(1), true);
        inbox.select(QueryId(3), true);

        let report = inbox.archive_selected().unwrap();
        assert!(report.is_success());
        assert_eq!(inbox.items().len(), 1);
        assert!(api.ticket(QueryId(3)).unwrap().archived);
        assert_eq!(surface.confirmations(), vec!["Archive 2 selected queries?"]);
        assert!(!inbox.bulk_buttons().archive_enabled);
    }

    #[test]
    fn test_delete_in_trash_view_is_permanent() {
        let (api, _, mut inbox) =
            inbox_with(Folder::Trash, vec![QueryItem::new(5, "Old").trashed(true)]);
        inbox.click(QueryId(5), ClickTarget::DeleteButton);
        assert_eq!(
            api.requests(),
            vec![RecordedRequest::Delete {
                id: QueryId(5),
                permanent: true
            }]
        );
        assert!(api.ticket(QueryId(5)).is_none());
    }

    #[test]
    fn test_switch_view_and_refresh() {
        let (api, surface, mut inbox) = inbox_with(Folder::Inbox, three());
        inbox.set_select_all(true);
        inbox.switch_view(Folder::Archive, api.list(Folder::Archive));
        assert_eq!(inbox.current_view(), Folder::Archive);
        assert!(inbox.items().is_empty());
        assert!(!inbox.bulk_buttons().delete_enabled);

        inbox.refresh();
        assert_eq!(surface.events(), vec![SurfaceEvent::Reload]);
    }
}
