//! Portal crate - Client-side logic for the campus portal
//!
//! This crate provides the behaviour behind the portal's pages:
//! - Domain models (QueryItem, Folder, ChatMessage, ChatHistoryEntry)
//! - Request wrapper for the portal endpoints (CSRF, JSON, error taxonomy)
//! - Support-ticket inbox controller (star, archive, delete, restore, bulk)
//! - Chat controller with speech input, history grouping and live support
//! - Ancillary page widgets (navbar, stats counter, profile form, photo upload)
//!
//! Nothing here touches a real page. Controllers own explicit view models and
//! reach the outside world through [`PortalApi`] and [`PageSurface`], so the
//! whole crate can be driven from tests or a terminal front-end.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod tickets;
pub mod ui;
pub mod widgets;

pub use api::{HttpPortal, InMemoryPortal, PortalApi, RecordedRequest, extract_csrf_token};
pub use chat::{
    ChatController, ChatState, HistoryGroup, HistoryRow, SpeechSession, SupportForm, format_date,
    format_date_on, group_by_date, group_by_date_on,
};
pub use crate::config::PortalSettings;
pub use error::{RequestError, RequestResult};
pub use models::{
    ChatHistoryEntry, ChatMessage, Folder, PhotoUpload, QueryId, QueryItem, Sender,
    SupportRequest,
};
pub use tickets::{BulkButtons, BulkReport, ClickTarget, QueryActions, QueryList, TicketInbox};
pub use ui::{
    Notification, NotificationCenter, NotificationKind, PageSurface, RecordingSurface, SurfaceEvent,
};
