//! Portal backend access
//!
//! This module provides:
//! - The [`PortalApi`] trait, one method per endpoint
//! - [`HttpPortal`], the blocking HTTP implementation (CSRF header, timeout)
//! - [`InMemoryPortal`], the same server rules kept in memory, for tests
//!   and offline use

mod client;
mod memory;
mod traits;

pub use client::{HttpPortal, extract_csrf_token};
pub use memory::{InMemoryPortal, RecordedRequest};
pub use traits::PortalApi;

/// Request and response bodies exchanged with the portal
pub mod wire {
    use serde::{Deserialize, Serialize};

    use crate::error::{RequestError, RequestResult};
    use crate::models::{ChatHistoryEntry, QueryId};

    /// `{query_id}` body of the single-query endpoints
    #[derive(Debug, Serialize, Deserialize)]
    pub struct QueryRef {
        pub query_id: QueryId,
    }

    /// Body of `/delete_query`
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeleteRequest {
        pub query_id: QueryId,
        pub permanent: bool,
    }

    /// Body of `/chat`
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatRequest {
        pub message: String,
    }

    /// Generic `{success, error?, message?}` acknowledgement
    #[derive(Debug, Default, Deserialize)]
    pub struct Ack {
        #[serde(default)]
        pub success: bool,
        pub error: Option<String>,
        pub message: Option<String>,
    }

    impl Ack {
        /// Map `success: false` to an application error
        pub fn into_result(self, fallback: &str) -> RequestResult<Option<String>> {
            if self.success {
                Ok(self.message)
            } else {
                Err(RequestError::Application(
                    self.error
                        .or(self.message)
                        .unwrap_or_else(|| fallback.to_string()),
                ))
            }
        }
    }

    /// Reply of `/toggle_archive`
    #[derive(Debug, Deserialize)]
    pub struct ArchiveAck {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub archived: bool,
        pub error: Option<String>,
    }

    /// Reply of `/chat`
    #[derive(Debug, Deserialize)]
    pub struct ChatReply {
        pub success: Option<bool>,
        pub response: Option<String>,
    }

    /// Reply of `/get_chat_history`
    #[derive(Debug, Deserialize)]
    pub struct HistoryReply {
        #[serde(default)]
        pub history: Vec<ChatHistoryEntry>,
        pub error: Option<String>,
    }

    /// Reply of `/upload_profile_photo`
    #[derive(Debug, Deserialize)]
    pub struct PhotoReply {
        #[serde(default)]
        pub success: bool,
        pub photo_url: Option<String>,
        pub error: Option<String>,
    }

    /// Body of a non-2xx response, when it is JSON at all
    #[derive(Debug, Default, Deserialize)]
    pub struct ErrorBody {
        pub error: Option<String>,
        pub message: Option<String>,
    }
}
