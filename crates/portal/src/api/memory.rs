//! In-memory portal implementation
//!
//! Applies the same rules the portal server applies to tickets, chat
//! history, photo uploads and support mail, without any network. Used by
//! tests and by the desk app's offline mode. Every call is recorded so
//! callers can assert on exactly which requests were issued.

use chrono::Local;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::PortalApi;
use crate::error::{RequestError, RequestResult};
use crate::models::{
    ChatHistoryEntry, Folder, PhotoUpload, QueryId, QueryItem, SupportRequest,
};

/// A request received by [`InMemoryPortal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    ToggleStar(QueryId),
    ToggleArchive(QueryId),
    Delete { id: QueryId, permanent: bool },
    Restore(QueryId),
    Archive(QueryId),
    Chat(String),
    History,
    ClearHistory,
    UploadPhoto(String),
    SupportEmail(SupportRequest),
}

/// In-memory implementation of PortalApi
///
/// Uses maps protected by RwLocks so bulk actions can hit it from rayon
/// worker threads.
pub struct InMemoryPortal {
    tickets: RwLock<HashMap<QueryId, QueryItem>>,
    history: RwLock<Vec<ChatHistoryEntry>>,
    replies: RwLock<HashMap<String, String>>,
    requests: RwLock<Vec<RecordedRequest>>,
    /// Errors returned for any ticket request on these ids
    ticket_failures: RwLock<HashMap<QueryId, RequestError>>,
    /// Error returned by the next chat, history, upload or support call
    next_failure: RwLock<Option<RequestError>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn not_found() -> RequestError {
    RequestError::Http {
        status: 404,
        message: "Query not found".to_string(),
    }
}

impl InMemoryPortal {
    /// Create an empty portal
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
            replies: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            ticket_failures: RwLock::new(HashMap::new()),
            next_failure: RwLock::new(None),
        }
    }

    /// Create a portal holding the given tickets
    pub fn with_tickets(tickets: impl IntoIterator<Item = QueryItem>) -> Self {
        let portal = Self::new();
        for ticket in tickets {
            portal.insert_ticket(ticket);
        }
        portal
    }

    /// Insert or replace a ticket
    pub fn insert_ticket(&self, ticket: QueryItem) {
        write(&self.tickets).insert(ticket.id, ticket);
    }

    /// Server-side state of a ticket
    pub fn ticket(&self, id: QueryId) -> Option<QueryItem> {
        read(&self.tickets).get(&id).cloned()
    }

    /// Tickets the server would render for a folder, newest id first
    pub fn list(&self, folder: Folder) -> Vec<QueryItem> {
        let mut items: Vec<QueryItem> = read(&self.tickets)
            .values()
            .filter(|t| folder.admits(t))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }

    /// Reply the bot gives to an exact message
    pub fn set_chat_reply(&self, message: impl Into<String>, reply: impl Into<String>) {
        write(&self.replies).insert(message.into(), reply.into());
    }

    /// Seed a stored history entry
    pub fn push_history(&self, entry: ChatHistoryEntry) {
        write(&self.history).push(entry);
    }

    /// Make every ticket request for `id` fail with `error`
    pub fn fail_ticket(&self, id: QueryId, error: RequestError) {
        write(&self.ticket_failures).insert(id, error);
    }

    /// Make the next chat, history, upload or support request fail
    pub fn fail_next(&self, error: RequestError) {
        *write(&self.next_failure) = Some(error);
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        read(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn clear_requests(&self) {
        write(&self.requests).clear();
    }

    fn record(&self, request: RecordedRequest) {
        write(&self.requests).push(request);
    }

    fn take_failure(&self) -> RequestResult<()> {
        match write(&self.next_failure).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run `f` against a ticket, honouring injected failures
    fn with_ticket<T>(
        &self,
        id: QueryId,
        f: impl FnOnce(&mut HashMap<QueryId, QueryItem>) -> RequestResult<T>,
    ) -> RequestResult<T> {
        if let Some(err) = read(&self.ticket_failures).get(&id) {
            return Err(err.clone());
        }
        let mut tickets = write(&self.tickets);
        if !tickets.contains_key(&id) {
            return Err(not_found());
        }
        f(&mut tickets)
    }

    fn reply_for(&self, message: &str) -> String {
        read(&self.replies)
            .get(message)
            .cloned()
            .unwrap_or_else(|| format!("You asked: {}", message))
    }
}

impl Default for InMemoryPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalApi for InMemoryPortal {
    fn toggle_star(&self, id: QueryId) -> RequestResult<()> {
        self.record(RecordedRequest::ToggleStar(id));
        self.with_ticket(id, |tickets| {
            if let Some(t) = tickets.get_mut(&id) {
                t.starred = !t.starred;
            }
            Ok(())
        })
    }

    fn toggle_archive(&self, id: QueryId) -> RequestResult<bool> {
        self.record(RecordedRequest::ToggleArchive(id));
        self.with_ticket(id, |tickets| {
            let t = tickets.get_mut(&id).ok_or_else(not_found)?;
            t.archived = !t.archived;
            Ok(t.archived)
        })
    }

    fn delete_query(&self, id: QueryId, permanent: bool) -> RequestResult<()> {
        self.record(RecordedRequest::Delete { id, permanent });
        self.with_ticket(id, |tickets| {
            if permanent {
                tickets.remove(&id);
            } else if let Some(t) = tickets.get_mut(&id) {
                t.trashed = true;
            }
            Ok(())
        })
    }

    fn restore_query(&self, id: QueryId) -> RequestResult<()> {
        self.record(RecordedRequest::Restore(id));
        self.with_ticket(id, |tickets| {
            if let Some(t) = tickets.get_mut(&id) {
                t.trashed = false;
            }
            Ok(())
        })
    }

    fn archive_query(&self, id: QueryId) -> RequestResult<()> {
        self.record(RecordedRequest::Archive(id));
        self.with_ticket(id, |tickets| {
            if let Some(t) = tickets.get_mut(&id) {
                t.archived = true;
            }
            Ok(())
        })
    }

    fn send_chat(&self, message: &str) -> RequestResult<String> {
        self.record(RecordedRequest::Chat(message.to_string()));
        self.take_failure()?;

        let message = message.trim();
        if message.is_empty() {
            return Ok("Please enter a message.".to_string());
        }

        let reply = self.reply_for(message);
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut history = write(&self.history);
        let id = history.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        history.push(ChatHistoryEntry {
            id,
            user_message: message.to_string(),
            bot_response: reply.clone(),
            user_timestamp: now.clone(),
            created_at: now,
        });
        Ok(reply)
    }

    fn chat_history(&self) -> RequestResult<Vec<ChatHistoryEntry>> {
        self.record(RecordedRequest::History);
        self.take_failure()?;
        Ok(read(&self.history).clone())
    }

    fn clear_chat_history(&self) -> RequestResult<()> {
        self.record(RecordedRequest::ClearHistory);
        self.take_failure()?;
        write(&self.history).clear();
        Ok(())
    }

    fn upload_profile_photo(&self, upload: &PhotoUpload) -> RequestResult<String> {
        self.record(RecordedRequest::UploadPhoto(upload.file_name.clone()));
        self.take_failure()?;

        if upload.file_name.is_empty() {
            return Err(RequestError::Application("No file selected".to_string()));
        }
        if !upload.has_allowed_extension() {
            return Err(RequestError::Application("Invalid file type".to_string()));
        }
        Ok(format!("/profile_photo/{}", upload.file_name))
    }

    fn send_support_email(&self, request: &SupportRequest) -> RequestResult<Option<String>> {
        self.record(RecordedRequest::SupportEmail(request.clone()));
        self.take_failure()?;

        if !request.is_complete() {
            return Err(RequestError::Application("Missing required fields".to_string()));
        }
        Ok(Some("Email sent successfully".to_string()))
    }
}
