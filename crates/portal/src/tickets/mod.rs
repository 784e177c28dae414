//! Support-ticket inbox
//!
//! `QueryList` is the listed view model, `QueryActions` runs the per-item
//! requests against it, and `TicketInbox` ties both to the active folder
//! and its bulk toolbar.

mod actions;
mod inbox;
mod list;

pub use actions::{QueryActions, view_route};
pub use inbox::{BulkReport, ClickTarget, TicketInbox};
pub use list::{BulkButtons, QueryList};
