//! Portal API trait definition

use crate::error::RequestResult;
use crate::models::{ChatHistoryEntry, PhotoUpload, QueryId, SupportRequest};

/// Operations the portal backend exposes to its pages
///
/// Each method is one endpoint. Implementations attach the CSRF token to
/// every state-changing call and never retry.
pub trait PortalApi: Send + Sync {
    /// `POST /toggle_star`
    fn toggle_star(&self, id: QueryId) -> RequestResult<()>;

    /// `POST /toggle_archive`; returns the new archived flag
    fn toggle_archive(&self, id: QueryId) -> RequestResult<bool>;

    /// `POST /delete_query`; `permanent` removes instead of trashing
    fn delete_query(&self, id: QueryId, permanent: bool) -> RequestResult<()>;

    /// `POST /restore_query`
    fn restore_query(&self, id: QueryId) -> RequestResult<()>;

    /// `POST /archive_query`
    fn archive_query(&self, id: QueryId) -> RequestResult<()>;

    /// `POST /chat`; returns the bot's reply
    fn send_chat(&self, message: &str) -> RequestResult<String>;

    /// `GET /get_chat_history`, oldest first
    fn chat_history(&self) -> RequestResult<Vec<ChatHistoryEntry>>;

    /// `GET /clear_chat_history`
    fn clear_chat_history(&self) -> RequestResult<()>;

    /// `POST /upload_profile_photo`; returns the new photo URL
    fn upload_profile_photo(&self, upload: &PhotoUpload) -> RequestResult<String>;

    /// `POST` to the live-support URL; returns the server's message if any
    fn send_support_email(&self, request: &SupportRequest) -> RequestResult<Option<String>>;
}
