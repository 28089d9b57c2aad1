use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;

/// One kept notice. Serializes as `{title, date, content}` where `date` is the
/// text exactly as the listing printed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub date: String,
    pub content: String,
    #[serde(skip)]
    pub publish_date: NaiveDate,
}

impl Notice {
    pub fn new(title: String, publish_date: NaiveDate, date: String, content: String) -> Self {
        Self {
            title,
            date,
            content,
            publish_date,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.date, self.title)
    }
}

/// The two identifiers that address a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReference {
    pub board_index: String,
    pub parent_seq: String,
}

impl ItemReference {
    pub fn new(board_index: impl Into<String>, parent_seq: impl Into<String>) -> Self {
        Self {
            board_index: board_index.into(),
            parent_seq: parent_seq.into(),
        }
    }
}

impl Display for ItemReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bcIdx={} parentSeq={}", self.board_index, self.parent_seq)
    }
}
