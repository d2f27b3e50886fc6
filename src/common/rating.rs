use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::common::DocumentId;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct InvalidScore(pub u64);

/// A star rating between 1 and 5
///
/// Zero is the "nothing selected" value of the rating form and is never a
/// valid `Score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = InvalidScore;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value).ok_or(InvalidScore(value.into()))
    }
}

impl TryFrom<u64> for Score {
    type Error = InvalidScore;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Score::new)
            .ok_or(InvalidScore(value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Option<DocumentId>,
    pub score: Score,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Rating {
    pub fn new(id: DocumentId, score: Score, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Some(id),
            score,
            timestamp,
        }
    }

    pub fn optimistic(score: Score) -> Self {
        Self {
            id: None,
            score,
            timestamp: Some(Utc::now()),
        }
    }
}

/// Running sum and count behind the average rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    sum: u64,
    count: u64,
}

impl RatingSummary {
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        scores.into_iter().fold(Self::default(), |mut summary, score| {
            summary.add(score);
            summary
        })
    }

    pub fn add(&mut self, score: Score) {
        self.sum += u64::from(score.get());
        self.count += 1;
    }

    pub fn remove(&mut self, score: Score) {
        if self.count == 0 {
            return;
        }
        self.sum = self.sum.saturating_sub(u64::from(score.get()));
        self.count -= 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean score rounded to one decimal, halves rounding up
    ///
    /// Computed in integer tenths so that e.g. 17/4 renders as "4.3".
    pub fn average(&self) -> String {
        if self.count == 0 {
            return "0.0".to_string();
        }
        let tenths = (self.sum * 20 + self.count) / (self.count * 2);
        format!("{}.{}", tenths / 10, tenths % 10)
    }

    pub fn voter_label(&self) -> String {
        format!(
            "{} {}",
            self.count,
            if self.count == 1 { "voter" } else { "voters" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[u8]) -> Vec<Score> {
        values.iter().map(|v| Score::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(Score::new(0), None);
        assert_eq!(Score::new(6), None);
        for value in 1..=5 {
            assert_eq!(Score::new(value).map(Score::get), Some(value));
        }
        assert_eq!(Score::try_from(300u64), Err(InvalidScore(300)));
    }

    #[test]
    fn test_score_deserialization_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<Score>("4").unwrap().get(), 4);
        assert!(serde_json::from_str::<Score>("0").is_err());
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn test_average_of_empty_set() {
        let summary = RatingSummary::default();
        assert_eq!(summary.average(), "0.0");
        assert_eq!(summary.count(), 0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(RatingSummary::from_scores(scores(&[5, 3])).average(), "4.0");
        assert_eq!(RatingSummary::from_scores(scores(&[5, 4, 4])).average(), "4.3");
        assert_eq!(RatingSummary::from_scores(scores(&[1, 2])).average(), "1.5");
        assert_eq!(RatingSummary::from_scores(scores(&[5, 4, 4, 4])).average(), "4.3");
        assert_eq!(RatingSummary::from_scores(scores(&[1, 1, 2])).average(), "1.3");
        assert_eq!(RatingSummary::from_scores(scores(&[5])).average(), "5.0");
    }

    #[test]
    fn test_average_matches_float_mean_for_small_sets() {
        for a in 1..=5u8 {
            for b in 1..=5u8 {
                for c in 1..=5u8 {
                    let summary = RatingSummary::from_scores(scores(&[a, b, c]));
                    let mean = f64::from(a + b + c) / 3.0;
                    let expected = format!("{:.1}", (mean * 10.0).round() / 10.0);
                    assert_eq!(summary.average(), expected, "scores {a} {b} {c}");
                }
            }
        }
    }

    #[test]
    fn test_remove_keeps_summary_consistent() {
        let mut summary = RatingSummary::from_scores(scores(&[5, 1]));
        summary.remove(Score::new(1).unwrap());
        assert_eq!(summary.average(), "5.0");
        assert_eq!(summary.count(), 1);

        summary.remove(Score::new(5).unwrap());
        summary.remove(Score::new(5).unwrap());
        assert_eq!(summary, RatingSummary::default());
    }

    #[test]
    fn test_voter_label() {
        let mut summary = RatingSummary::default();
        assert_eq!(summary.voter_label(), "0 voters");
        summary.add(Score::new(3).unwrap());
        assert_eq!(summary.voter_label(), "1 voter");
        summary.add(Score::new(3).unwrap());
        assert_eq!(summary.voter_label(), "2 voters");
    }
}
