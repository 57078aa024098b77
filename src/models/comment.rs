use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
            CommentStatus::Flagged => "flagged",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CommentStatus::Pending),
            "approved" => Some(CommentStatus::Approved),
            "rejected" => Some(CommentStatus::Rejected),
            "flagged" => Some(CommentStatus::Flagged),
            _ => None,
        }
    }
}

pub const FLAG_THRESHOLD: i32 = 3;
pub const MAX_ACTIVE_COMMENTS_PER_DOCUMENT: i64 = 100;
pub const MIN_COMMENT_LENGTH: usize = 10;
pub const MAX_COMMENT_LENGTH: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub document_id: i32,
    pub parent_comment_id: Option<i32>,
    pub comment_text: String,
    pub session_hash: String,
    pub status: CommentStatus,
    pub flag_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment attached to its ordered, recursively-counted replies. Built as a pure
/// transformation over a flat `Vec<Comment>` — see [`crate::moderation::comment_tree`].
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub descendant_count: usize,
    pub replies: Vec<CommentNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            CommentStatus::Pending,
            CommentStatus::Approved,
            CommentStatus::Rejected,
            CommentStatus::Flagged,
        ] {
            assert_eq!(CommentStatus::from_str(status.as_str()), Some(status));
        }
    }
}
