//! Chat history sidebar: grouping by day and date labels

use chrono::{Days, Local, NaiveDate};
use std::collections::HashMap;

use crate::models::ChatHistoryEntry;

/// One row of the history sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Time part of the user's timestamp
    pub time: String,
    pub entry: ChatHistoryEntry,
}

impl HistoryRow {
    /// Question shown in the row
    pub fn message(&self) -> &str {
        &self.entry.user_message
    }
}

/// Entries of one calendar day under a date header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup {
    /// Date key (`YYYY-MM-DD`)
    pub date: String,
    /// Header text ("Today", "Yesterday" or the date)
    pub label: String,
    /// Newest first within the day
    pub rows: Vec<HistoryRow>,
}

/// Group entries by the date part of `created_at`, labelled against the
/// local calendar
pub fn group_by_date(entries: &[ChatHistoryEntry]) -> Vec<HistoryGroup> {
    group_by_date_on(entries, Local::now().date_naive())
}

/// Group entries by date as of `today`
///
/// Groups keep the order in which their date was first seen. Within a
/// group, entries come out in reverse of their input order.
pub fn group_by_date_on(entries: &[ChatHistoryEntry], today: NaiveDate) -> Vec<HistoryGroup> {
    let mut groups: Vec<HistoryGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let date = entry.date_key();
        let slot = *index.entry(date).or_insert_with(|| {
            groups.push(HistoryGroup {
                date: date.to_string(),
                label: format_date_on(date, today),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(HistoryRow {
            time: entry.time_label().to_string(),
            entry: entry.clone(),
        });
    }

    for group in &mut groups {
        group.rows.reverse();
    }
    groups
}

/// Header label for a `YYYY-MM-DD` date relative to the local calendar
pub fn format_date(date: &str) -> String {
    format_date_on(date, Local::now().date_naive())
}

/// Header label for a `YYYY-MM-DD` date relative to `today`
///
/// Dates that do not parse are shown as-is.
pub fn format_date_on(date: &str, today: NaiveDate) -> String {
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };

    if parsed == today {
        "Today".to_string()
    } else if today.checked_sub_days(Days::new(1)) == Some(parsed) {
        "Yesterday".to_string()
    } else {
        parsed.format("%-m/%-d/%Y").to_string()
    }
}
