//! Support-ticket ("query") model and folder views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a support query (server primary key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub i64);

impl QueryId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for QueryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueryId {
    type Err = std::num::ParseIntError;

    /// Parse the value of an item's `data-id` attribute
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One of the five mutually exclusive ticket lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    #[default]
    Inbox,
    Sent,
    Starred,
    Archive,
    Trash,
}

impl Folder {
    /// All folders in sidebar order
    pub const ALL: [Folder; 5] = [
        Folder::Inbox,
        Folder::Sent,
        Folder::Starred,
        Folder::Archive,
        Folder::Trash,
    ];

    /// Name used in the `view` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Sent => "sent",
            Folder::Starred => "starred",
            Folder::Archive => "archive",
            Folder::Trash => "trash",
        }
    }

    /// Bootstrap icon shown next to the folder
    pub fn icon(&self) -> &'static str {
        match self {
            Folder::Inbox => "inbox-fill",
            Folder::Sent => "send-fill",
            Folder::Starred => "star-fill",
            Folder::Archive => "archive-fill",
            Folder::Trash => "trash-fill",
        }
    }

    /// Whether a query belongs in this folder's list.
    ///
    /// Mirrors the server's listing filters. `Sent` has no filter of its own
    /// and lists what the inbox lists.
    pub fn admits(&self, item: &QueryItem) -> bool {
        match self {
            Folder::Inbox | Folder::Sent => !item.trashed && !item.archived,
            Folder::Starred => item.starred && !item.trashed && !item.archived,
            Folder::Archive => item.archived && !item.trashed,
            Folder::Trash => item.trashed,
        }
    }

    /// Page route listing this folder
    pub fn route(&self) -> String {
        format!("/support_tickets?view={}", self.as_str())
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Folder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Folder::Inbox),
            "sent" => Ok(Folder::Sent),
            "starred" => Ok(Folder::Starred),
            "archive" => Ok(Folder::Archive),
            "trash" => Ok(Folder::Trash),
            other => Err(format!("unknown folder: {}", other)),
        }
    }
}

/// A support query as listed in a folder view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryItem {
    /// Server id (the item's `data-id`)
    pub id: QueryId,
    /// Subject line
    pub subject: String,
    /// Ticket status as reported by the server ("Open", "Closed", ...)
    #[serde(default = "default_status")]
    pub status: String,
    /// When the ticket was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub archived: bool,
    /// Moved to trash (the server's `deleted` flag)
    #[serde(default, alias = "deleted")]
    pub trashed: bool,
    /// Checkbox state in the active view
    #[serde(skip)]
    pub selected: bool,
    /// A request for this item is in flight
    #[serde(skip)]
    pub loading: bool,
}

fn default_status() -> String {
    "Open".to_string()
}

impl QueryItem {
    /// Create an open, unflagged query
    pub fn new(id: i64, subject: impl Into<String>) -> Self {
        Self {
            id: QueryId(id),
            subject: subject.into(),
            status: default_status(),
            created_at: None,
            starred: false,
            archived: false,
            trashed: false,
            selected: false,
            loading: false,
        }
    }

    pub fn starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub fn trashed(mut self, trashed: bool) -> Self {
        self.trashed = trashed;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Star glyph matching the starred state
    pub fn star_icon(&self) -> &'static str {
        if self.starred { "bi-star-fill" } else { "bi-star" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_id_from_data_attribute() {
        assert_eq!(" 42 ".parse::<QueryId>().unwrap(), QueryId(42));
        assert!("abc".parse::<QueryId>().is_err());
        assert_eq!(QueryId(7).to_string(), "7");
    }

    #[test]
    fn test_folder_round_trip_names() {
        for folder in Folder::ALL {
            assert_eq!(folder.as_str().parse::<Folder>().unwrap(), folder);
        }
        assert!("spam".parse::<Folder>().is_err());
        assert_eq!(Folder::Trash.route(), "/support_tickets?view=trash");
    }

    #[test]
    fn test_each_state_admitted_by_one_primary_folder() {
        let plain = QueryItem::new(1, "a");
        let starred = QueryItem::new(2, "b").starred(true);
        let archived = QueryItem::new(3, "c").archived(true);
        let trashed = QueryItem::new(4, "d").archived(true).trashed(true);

        assert!(Folder::Inbox.admits(&plain));
        assert!(!Folder::Starred.admits(&plain));

        assert!(Folder::Inbox.admits(&starred));
        assert!(Folder::Starred.admits(&starred));

        assert!(!Folder::Inbox.admits(&archived));
        assert!(Folder::Archive.admits(&archived));

        for folder in [Folder::Inbox, Folder::Sent, Folder::Starred, Folder::Archive] {
            assert!(!folder.admits(&trashed));
        }
        assert!(Folder::Trash.admits(&trashed));
    }

    #[test]
    fn test_deserialize_server_flags() {
        let json = r#"{"id": 9, "subject": "Fee receipt", "deleted": true, "starred": true}"#;
        let item: QueryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, QueryId(9));
        assert!(item.trashed);
        assert!(item.starred);
        assert_eq!(item.status, "Open");
        assert!(!item.selected);
    }

    #[test]
    fn test_star_icon() {
        let item = QueryItem::new(1, "x");
        assert_eq!(item.star_icon(), "bi-star");
        assert_eq!(item.starred(true).star_icon(), "bi-star-fill");
    }
}
