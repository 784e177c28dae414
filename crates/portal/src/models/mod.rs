//! Domain models for portal entities

mod chat;
mod profile;
mod query;

pub use chat::{ChatHistoryEntry, ChatMessage, Sender};
pub use profile::{PhotoUpload, SupportRequest};
pub use query::{Folder, QueryId, QueryItem};
