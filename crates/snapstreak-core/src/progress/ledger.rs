//! Append-only completion ledger and streak accounting.
//!
//! [`UserProgress`] is the single aggregate root. It is never edited in
//! place: [`record_completion`] takes the current snapshot and returns a
//! new one, so previously accepted entries cannot be corrupted by a
//! failed action and concurrent readers always see a whole snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::achievements::Achievement;
use crate::challenge::Challenge;

/// One successfully captured and accepted challenge. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedChallenge {
    /// `{date}-{challenge id}-{capture epoch ms}`; unique even under
    /// same-day retries.
    pub id: String,
    pub date: NaiveDate,
    pub prompt: String,
    /// Encoded image payload as a data URL.
    pub photo_url: String,
    pub day_number: u32,
}

/// The progress aggregate: streak counters, the completion ledger
/// (most-recent-first), and unlocked achievements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed: u32,
    pub start_date: NaiveDate,
    pub completed_challenges: Vec<CompletedChallenge>,
    pub achievements: Vec<Achievement>,
}

impl UserProgress {
    /// Fresh aggregate for a user whose series starts on `start_date`.
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_completed: 0,
            start_date,
            completed_challenges: Vec::new(),
            achievements: Vec::new(),
        }
    }

    /// Date of the most recent completion, if any.
    pub fn last_completion_date(&self) -> Option<NaiveDate> {
        self.completed_challenges.first().map(|c| c.date)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

/// Append a completion and recompute streak state.
///
/// A completion is consecutive when it lands exactly one calendar day
/// after the most recent entry; an empty ledger is vacuously consecutive,
/// so the first entry starts a streak of 1. Any other gap resets the
/// streak to 1 (not 0). The new entry is prepended, keeping the ledger
/// most-recent-first.
///
/// Returns a new snapshot; the input is left untouched.
pub fn record_completion(
    progress: &UserProgress,
    challenge: &Challenge,
    photo_url: String,
    day_number: u32,
    today: NaiveDate,
    captured_at: DateTime<Utc>,
) -> UserProgress {
    let entry = CompletedChallenge {
        id: format!(
            "{}-{}-{}",
            today.format("%Y-%m-%d"),
            challenge.id,
            captured_at.timestamp_millis()
        ),
        date: today,
        prompt: challenge.prompt.clone(),
        photo_url,
        day_number,
    };

    let is_consecutive = progress
        .last_completion_date()
        .map(|last| (today - last).num_days() == 1)
        .unwrap_or(true);
    let current_streak = if is_consecutive {
        progress.current_streak + 1
    } else {
        1
    };

    let mut completed_challenges = Vec::with_capacity(progress.completed_challenges.len() + 1);
    completed_challenges.push(entry);
    completed_challenges.extend(progress.completed_challenges.iter().cloned());

    UserProgress {
        current_streak,
        longest_streak: progress.longest_streak.max(current_streak),
        total_completed: progress.total_completed + 1,
        start_date: progress.start_date,
        completed_challenges,
        achievements: progress.achievements.clone(),
    }
}
