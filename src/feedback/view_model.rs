//! In-memory comment and rating state behind the feedback section
//!
//! Submissions are split in two so several writes can be in flight at once
//! without sharing the view-model across tasks:
//!
//! 1. `begin_*` validates the form, inserts an optimistic entry tagged with a
//!    [`LocalId`], clears the form and hands back a ticket.
//! 2. The caller performs the store append with the ticket's payload.
//! 3. `complete_*` matches the ticket to its entry and applies the outcome.
//!
//! `submit_*` runs all three steps for callers with nothing else to do.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::client::{FeedbackClient, FeedbackError, FeedbackResult};
use crate::common::{
    Comment, CommentDraft, LocalId, Rating, RatingSummary, Score, sort_newest_first,
};
use crate::storage::{Acknowledgement, DocumentStore};

/// What happens to an optimistic entry whose store append failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFailurePolicy {
    /// Leave the entry displayed as if the write had succeeded
    #[default]
    Keep,
    /// Remove the entry
    Rollback,
    /// Leave the entry, marked as failed
    Flag,
}

impl fmt::Display for WriteFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteFailurePolicy::Keep => write!(f, "keep"),
            WriteFailurePolicy::Rollback => write!(f, "rollback"),
            WriteFailurePolicy::Flag => write!(f, "flag"),
        }
    }
}

impl FromStr for WriteFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(WriteFailurePolicy::Keep),
            "rollback" | "remove" => Ok(WriteFailurePolicy::Rollback),
            "flag" | "mark" => Ok(WriteFailurePolicy::Flag),
            _ => Err(anyhow::anyhow!(
                "Invalid write failure policy '{}'. Valid options: keep, rollback, flag",
                s
            )),
        }
    }
}

/// Where an in-memory entry stands relative to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Inserted locally, append not yet settled
    Pending,
    /// Loaded from or acknowledged by the store
    Confirmed,
    /// Append failed and was kept silently
    Unsynced,
    /// Append failed and the failure is shown
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracked<T> {
    pub record: T,
    pub state: SyncState,
    local_id: Option<LocalId>,
}

impl<T> Tracked<T> {
    fn confirmed(record: T) -> Self {
        Self {
            record,
            state: SyncState::Confirmed,
            local_id: None,
        }
    }

    fn pending(record: T, local_id: LocalId) -> Self {
        Self {
            record,
            state: SyncState::Pending,
            local_id: Some(local_id),
        }
    }

    pub fn local_id(&self) -> Option<LocalId> {
        self.local_id
    }

    pub fn is_pending(&self) -> bool {
        self.state == SyncState::Pending
    }

    /// Only [`SyncState::Failed`] is meant to be visible to the visitor
    pub fn shows_failure(&self) -> bool {
        self.state == SyncState::Failed
    }

    fn awaits(&self, local_id: LocalId) -> bool {
        self.is_pending() && self.local_id == Some(local_id)
    }
}

/// A swallowed failure, kept for diagnostics and never shown as an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Ticket for a comment append in flight
#[must_use = "a pending comment must be completed once its append settles"]
#[derive(Debug, Clone)]
pub struct PendingComment {
    local_id: LocalId,
    comment: Comment,
}

impl PendingComment {
    pub fn local_id(&self) -> LocalId {
        self.local_id
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }
}

/// Ticket for a rating append in flight
#[must_use = "a pending rating must be completed once its append settles"]
#[derive(Debug, Clone, Copy)]
pub struct PendingRating {
    local_id: LocalId,
    score: Score,
}

impl PendingRating {
    pub fn local_id(&self) -> LocalId {
        self.local_id
    }

    pub fn score(&self) -> Score {
        self.score
    }
}

pub struct FeedbackViewModel {
    comments: Vec<Tracked<Comment>>,
    ratings: Vec<Tracked<Rating>>,
    summary: RatingSummary,
    comment_form: CommentDraft,
    selected_rating: u8,
    failure_policy: WriteFailurePolicy,
    next_local_id: u64,
    diagnostics: Vec<Diagnostic>,
}

impl Default for FeedbackViewModel {
    fn default() -> Self {
        Self::new(WriteFailurePolicy::default())
    }
}

impl FeedbackViewModel {
    pub fn new(failure_policy: WriteFailurePolicy) -> Self {
        Self {
            comments: Vec::new(),
            ratings: Vec::new(),
            summary: RatingSummary::default(),
            comment_form: CommentDraft::default(),
            selected_rating: 0,
            failure_policy,
            next_local_id: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn comments(&self) -> &[Tracked<Comment>] {
        &self.comments
    }

    pub fn ratings(&self) -> &[Tracked<Rating>] {
        &self.ratings
    }

    /// Mean of the ratings in memory, e.g. `"4.0"`; `"0.0"` when there are none
    pub fn average_rating(&self) -> String {
        self.summary.average()
    }

    pub fn voter_count(&self) -> u64 {
        self.summary.count()
    }

    pub fn voter_label(&self) -> String {
        self.summary.voter_label()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn failure_policy(&self) -> WriteFailurePolicy {
        self.failure_policy
    }

    pub fn comment_form(&self) -> &CommentDraft {
        &self.comment_form
    }

    pub fn set_commenter_name(&mut self, name: impl Into<String>) {
        self.comment_form.name = name.into();
    }

    pub fn set_comment_text(&mut self, comment: impl Into<String>) {
        self.comment_form.comment = comment.into();
    }

    /// Selected star count; 0 means nothing selected
    pub fn selected_rating(&self) -> u8 {
        self.selected_rating
    }

    /// Select 1-5 stars, or 0 to clear; anything larger is ignored
    pub fn select_rating(&mut self, stars: u8) {
        if stars <= Score::MAX {
            self.selected_rating = stars;
        }
    }

    pub fn can_submit_rating(&self) -> bool {
        Score::new(self.selected_rating).is_some()
    }

    /// Replace local state with the store's contents
    ///
    /// Comments are ordered newest first. Entries whose append is still in
    /// flight stay at the head. A collection that fails to load keeps its
    /// current state.
    pub async fn reload<S: DocumentStore>(&mut self, client: &FeedbackClient<S>) {
        let (comments, ratings) = tokio::join!(client.fetch_comments(), client.fetch_ratings());

        match comments {
            Ok(comments) => self.replace_comments(comments),
            Err(e) => self.record_failure("Error fetching comments", &e),
        }

        match ratings {
            Ok(ratings) => self.replace_ratings(ratings),
            Err(e) => self.record_failure("Error fetching ratings", &e),
        }
    }

    fn replace_comments(&mut self, mut fetched: Vec<Comment>) {
        sort_newest_first(&mut fetched);

        let mut comments: Vec<_> = self.comments.drain(..).filter(Tracked::is_pending).collect();
        comments.extend(fetched.into_iter().map(Tracked::confirmed));
        self.comments = comments;
    }

    fn replace_ratings(&mut self, fetched: Vec<Rating>) {
        let mut ratings: Vec<_> = self.ratings.drain(..).filter(Tracked::is_pending).collect();
        ratings.extend(fetched.into_iter().map(Tracked::confirmed));
        self.ratings = ratings;
        self.summary = RatingSummary::from_scores(self.ratings.iter().map(|r| r.record.score));
    }

    /// Accept the comment form, if valid, and show it at the head right away
    pub fn begin_comment(&mut self) -> Option<PendingComment> {
        if !self.comment_form.is_submittable() {
            log::debug!("Ignoring comment submission with blank fields");
            return None;
        }

        let local_id = self.allocate_local_id();
        let comment = Comment::optimistic(&self.comment_form);
        self.comments
            .insert(0, Tracked::pending(comment.clone(), local_id));
        self.comment_form.clear();

        Some(PendingComment { local_id, comment })
    }

    /// Accept the selected rating, if any, and count it right away
    pub fn begin_rating(&mut self) -> Option<PendingRating> {
        let Some(score) = Score::new(self.selected_rating) else {
            log::debug!("Ignoring rating submission without a selection");
            return None;
        };

        let local_id = self.allocate_local_id();
        self.ratings
            .push(Tracked::pending(Rating::optimistic(score), local_id));
        self.summary.add(score);
        self.selected_rating = 0;

        Some(PendingRating { local_id, score })
    }

    /// Settle a comment append; the entry keeps its position either way
    pub fn complete_comment(
        &mut self,
        pending: PendingComment,
        result: FeedbackResult<Acknowledgement>,
    ) {
        let Some(index) = self
            .comments
            .iter()
            .position(|entry| entry.awaits(pending.local_id))
        else {
            log::debug!("No pending comment {} to settle", pending.local_id);
            return;
        };

        match result {
            Ok(ack) if self.holds_comment(&ack) => {
                // A reload already brought in the stored copy
                self.comments.remove(index);
            }
            Ok(ack) => {
                let entry = &mut self.comments[index];
                entry.record.id = Some(ack.id);
                entry.record.timestamp = Some(ack.timestamp);
                entry.state = SyncState::Confirmed;
            }
            Err(e) => {
                self.record_failure("Error adding comment", &e);
                match self.failure_policy {
                    WriteFailurePolicy::Keep => self.comments[index].state = SyncState::Unsynced,
                    WriteFailurePolicy::Flag => self.comments[index].state = SyncState::Failed,
                    WriteFailurePolicy::Rollback => {
                        self.comments.remove(index);
                    }
                }
            }
        }
    }

    /// Settle a rating append
    pub fn complete_rating(&mut self, pending: PendingRating, result: FeedbackResult<Acknowledgement>) {
        let Some(index) = self
            .ratings
            .iter()
            .position(|entry| entry.awaits(pending.local_id))
        else {
            log::debug!("No pending rating {} to settle", pending.local_id);
            return;
        };

        match result {
            Ok(ack) if self.holds_rating(&ack) => {
                let removed = self.ratings.remove(index);
                self.summary.remove(removed.record.score);
            }
            Ok(ack) => {
                let entry = &mut self.ratings[index];
                entry.record.id = Some(ack.id);
                entry.record.timestamp = Some(ack.timestamp);
                entry.state = SyncState::Confirmed;
            }
            Err(e) => {
                self.record_failure("Error adding rating", &e);
                match self.failure_policy {
                    WriteFailurePolicy::Keep => self.ratings[index].state = SyncState::Unsynced,
                    WriteFailurePolicy::Flag => self.ratings[index].state = SyncState::Failed,
                    WriteFailurePolicy::Rollback => {
                        let removed = self.ratings.remove(index);
                        self.summary.remove(removed.record.score);
                    }
                }
            }
        }
    }

    /// Submit the comment form and wait for the store; false if rejected
    pub async fn submit_comment<S: DocumentStore>(&mut self, client: &FeedbackClient<S>) -> bool {
        let Some(pending) = self.begin_comment() else {
            return false;
        };
        let result = client.append_comment(pending.comment()).await;
        self.complete_comment(pending, result);
        true
    }

    /// Submit the selected rating and wait for the store; false if rejected
    pub async fn submit_rating<S: DocumentStore>(&mut self, client: &FeedbackClient<S>) -> bool {
        let Some(pending) = self.begin_rating() else {
            return false;
        };
        let result = client.append_rating(pending.score()).await;
        self.complete_rating(pending, result);
        true
    }

    fn holds_comment(&self, ack: &Acknowledgement) -> bool {
        self.comments
            .iter()
            .any(|entry| entry.record.id.as_ref() == Some(&ack.id))
    }

    fn holds_rating(&self, ack: &Acknowledgement) -> bool {
        self.ratings
            .iter()
            .any(|entry| entry.record.id.as_ref() == Some(&ack.id))
    }

    fn allocate_local_id(&mut self) -> LocalId {
        self.next_local_id += 1;
        LocalId::new(self.next_local_id)
    }

    fn record_failure(&mut self, context: &str, error: &FeedbackError) {
        let message = format!("{}: {}", context, error);
        log::error!("{}", message);
        self.diagnostics.push(Diagnostic {
            at: Utc::now(),
            message,
        });
    }
}
