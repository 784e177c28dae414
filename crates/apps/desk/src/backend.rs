//! Where the desk gets its tickets from

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use portal::{Folder, HttpPortal, InMemoryPortal, PortalApi, PortalSettings, QueryId, QueryItem};

/// A server-confirmed change to one ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketChange {
    StarToggled,
    ArchiveToggled,
    Trashed,
    Deleted,
    Restored,
}

/// Backend the controllers talk to
///
/// The portal renders ticket lists into its pages rather than serving them
/// as JSON, so the online backend lists from a snapshot file while every
/// action still goes to the server.
pub enum Backend {
    Offline(Arc<InMemoryPortal>),
    Online {
        portal: Arc<HttpPortal>,
        snapshot: Vec<QueryItem>,
    },
}

impl Backend {
    /// In-memory backend seeded with `tickets`
    pub fn offline(tickets: Vec<QueryItem>) -> Self {
        info!("Running offline with {} tickets", tickets.len());
        Backend::Offline(Arc::new(InMemoryPortal::with_tickets(tickets)))
    }

    /// HTTP backend; fetches a CSRF token when none is configured
    pub fn online(settings: &PortalSettings, snapshot: Vec<QueryItem>) -> Result<Self> {
        let portal = HttpPortal::new(settings)?;
        if portal.csrf_token().is_none() {
            match portal.fetch_csrf_token("/support_tickets") {
                Ok(_) => info!("Fetched CSRF token from {}", settings.base_url),
                Err(e) => warn!("Could not fetch CSRF token: {}", e),
            }
        }
        Ok(Backend::Online {
            portal: Arc::new(portal),
            snapshot,
        })
    }

    pub fn api(&self) -> Arc<dyn PortalApi> {
        match self {
            Backend::Offline(memory) => memory.clone(),
            Backend::Online { portal, .. } => portal.clone(),
        }
    }

    /// Items for a folder page
    pub fn list(&self, folder: Folder) -> Vec<QueryItem> {
        match self {
            Backend::Offline(memory) => memory.list(folder),
            Backend::Online { snapshot, .. } => snapshot
                .iter()
                .filter(|item| folder.admits(item))
                .cloned()
                .collect(),
        }
    }

    /// Fold a successful action into the listing
    ///
    /// The in-memory portal already applied it; the snapshot has to follow
    /// the server or a relist would bring back stale folders.
    pub fn record(&mut self, id: QueryId, change: TicketChange) {
        let Backend::Online { snapshot, .. } = self else {
            return;
        };
        if change == TicketChange::Deleted {
            snapshot.retain(|item| item.id != id);
            return;
        }
        let Some(item) = snapshot.iter_mut().find(|item| item.id == id) else {
            debug!("Query {} is not in the snapshot", id);
            return;
        };
        match change {
            TicketChange::StarToggled => item.starred = !item.starred,
            TicketChange::ArchiveToggled => item.archived = !item.archived,
            TicketChange::Trashed => item.trashed = true,
            TicketChange::Restored => item.trashed = false,
            TicketChange::Deleted => {}
        }
    }
}

/// Read a JSON array of tickets
pub fn load_tickets(path: &Path) -> Result<Vec<QueryItem>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tickets from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tickets in {}", path.display()))
}

/// Tickets for a first run without a snapshot
pub fn demo_tickets() -> Vec<QueryItem> {
    vec![
        QueryItem::new(1, "Hostel fee receipt not generated"),
        QueryItem::new(2, "Library card renewal").starred(true),
        QueryItem::new(3, "Exam form correction"),
        QueryItem::new(4, "Bus pass for winter term").archived(true),
        QueryItem::new(5, "Duplicate ID card request").trashed(true),
    ]
}
