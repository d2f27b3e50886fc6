use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::DocumentId;

/// A visitor comment as held in memory
///
/// `id` is `None` until the store acknowledges the write. `timestamp` is the
/// store's creation time for persisted comments and the local wall-clock time
/// for optimistic ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<DocumentId>,
    pub name: String,
    pub comment: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(
        id: DocumentId,
        name: String,
        comment: String,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            comment,
            timestamp,
        }
    }

    /// Build the locally displayed copy of a submitted draft
    pub fn optimistic(draft: &CommentDraft) -> Self {
        Self {
            id: None,
            name: draft.name.clone(),
            comment: draft.comment.clone(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Upper-cased first letter of the author's name, used as an avatar
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim_start()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

/// Sort newest first; comments without a timestamp go last
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Contents of the comment form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub name: String,
    pub comment: String,
}

impl CommentDraft {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }

    /// Both fields must contain something besides whitespace
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.comment.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.comment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment_at(name: &str, seconds: Option<i64>) -> Comment {
        Comment {
            id: None,
            name: name.to_string(),
            comment: "text".to_string(),
            timestamp: seconds.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    #[test]
    fn test_draft_validation() {
        assert!(CommentDraft::new("Alice", "Nice work").is_submittable());
        assert!(!CommentDraft::new("   ", "Nice work").is_submittable());
        assert!(!CommentDraft::new("Alice", "\n\t ").is_submittable());
        assert!(!CommentDraft::default().is_submittable());
    }

    #[test]
    fn test_draft_clear() {
        let mut draft = CommentDraft::new("Alice", "Nice work");
        draft.clear();
        assert_eq!(draft, CommentDraft::default());
    }

    #[test]
    fn test_optimistic_comment_has_no_identity() {
        let draft = CommentDraft::new("Alice", "Nice work");
        let comment = Comment::optimistic(&draft);

        assert!(comment.id.is_none());
        assert!(comment.timestamp.is_some());
        assert_eq!(comment.name, "Alice");
        assert_eq!(comment.comment, "Nice work");
    }

    #[test]
    fn test_initial() {
        assert_eq!(comment_at("alice", None).initial(), Some('A'));
        assert_eq!(comment_at("  émile", None).initial(), Some('É'));
        assert_eq!(comment_at("", None).initial(), None);
    }

    #[test]
    fn test_sort_newest_first_puts_missing_timestamps_last() {
        let mut comments = vec![
            comment_at("old", Some(100)),
            comment_at("undated", None),
            comment_at("new", Some(300)),
            comment_at("pre-epoch", Some(-50)),
        ];

        sort_newest_first(&mut comments);

        let names: Vec<_> = comments.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "pre-epoch", "undated"]);
    }
}
