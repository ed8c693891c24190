//! Deterministic "today's challenge" selection.
//!
//! Selection is a pure function of the calendar date and pool order: the
//! digits of the date (yyyymmdd) taken modulo the pool length. No mapping
//! is persisted, so the same date always yields the same challenge across
//! reloads; reordering the pool reshuffles every date's selection.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Challenge, PromptPool};
use crate::error::StoreError;
use crate::storage::Store;

/// Store key for the cached daily selection.
pub const DAILY_CHALLENGE_KEY: &str = "daily-challenge";

/// Today's challenge with its position in the running series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub challenge: Challenge,
    /// Inclusive day count within the series; day 1 is the first run.
    pub day_number: u32,
    pub date: NaiveDate,
}

/// Persisted selection state, keyed by `daily-challenge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
struct DailyState {
    challenge: Option<Challenge>,
    day_number: u32,
    date: Option<NaiveDate>,
}

/// Select the challenge for a date. Pure; `None` only for an empty pool.
pub fn select_for_date(date: NaiveDate, pool: &PromptPool) -> Option<&Challenge> {
    if pool.is_empty() {
        return None;
    }
    let key = i64::from(date.year()) * 10_000
        + i64::from(date.month()) * 100
        + i64::from(date.day());
    let index = key.rem_euclid(pool.len() as i64) as usize;
    pool.get(index)
}

/// Caches one selection per calendar day in the durable store.
#[derive(Debug, Clone)]
pub struct DailyChallengeTracker {
    pool: PromptPool,
}

impl DailyChallengeTracker {
    pub fn new(pool: PromptPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PromptPool {
        &self.pool
    }

    /// The challenge for `today`.
    ///
    /// Returns the cached selection unchanged while the stored date still
    /// equals `today` (no re-roll within a day, even across reloads);
    /// otherwise recomputes, persists, and returns the new selection.
    /// An empty pool yields `Ok(None)`: the selector stays "loading"
    /// instead of failing.
    pub fn current<S: Store>(
        &self,
        store: &mut S,
        today: NaiveDate,
    ) -> Result<Option<DailyChallenge>, StoreError> {
        if self.pool.is_empty() {
            return Ok(None);
        }

        let state: DailyState = store.get(DAILY_CHALLENGE_KEY, DailyState::default())?;
        if let (Some(challenge), Some(date)) = (&state.challenge, state.date) {
            if date == today {
                return Ok(Some(DailyChallenge {
                    challenge: challenge.clone(),
                    day_number: state.day_number,
                    date,
                }));
            }
        }

        let Some(challenge) = select_for_date(today, &self.pool).cloned() else {
            return Ok(None);
        };

        // Day count anchors to the previously stored challenge date (or
        // today on first run). Skipped days therefore stretch the count;
        // this matches the shipped behavior.
        let anchor = state.date.unwrap_or(today);
        let day_number = ((today - anchor).num_days() + 1).max(1) as u32;

        let next = DailyState {
            challenge: Some(challenge.clone()),
            day_number,
            date: Some(today),
        };
        store.set(DAILY_CHALLENGE_KEY, &next)?;

        Ok(Some(DailyChallenge {
            challenge,
            day_number,
            date: today,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn selection_uses_date_digits_modulo_pool_len() {
        let pool = PromptPool::builtin();
        let day = date(2024, 1, 1);
        let expected = 20_240_101_usize % pool.len();
        assert_eq!(
            select_for_date(day, &pool).unwrap(),
            pool.get(expected).unwrap()
        );
    }

    #[test]
    fn empty_pool_offers_nothing() {
        let pool = PromptPool::default();
        assert!(select_for_date(date(2024, 5, 5), &pool).is_none());

        let tracker = DailyChallengeTracker::new(pool);
        let mut store = MemoryStore::new();
        assert!(tracker.current(&mut store, date(2024, 5, 5)).unwrap().is_none());
    }

    #[test]
    fn same_day_is_cached_across_calls() {
        let tracker = DailyChallengeTracker::new(PromptPool::builtin());
        let mut store = MemoryStore::new();
        let today = date(2024, 3, 10);

        let first = tracker.current(&mut store, today).unwrap().unwrap();
        let second = tracker.current(&mut store, today).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.day_number, 1);
    }

    #[test]
    fn day_number_counts_from_previous_challenge_date() {
        let tracker = DailyChallengeTracker::new(PromptPool::builtin());
        let mut store = MemoryStore::new();

        let d1 = tracker.current(&mut store, date(2024, 1, 1)).unwrap().unwrap();
        assert_eq!(d1.day_number, 1);

        let d2 = tracker.current(&mut store, date(2024, 1, 2)).unwrap().unwrap();
        assert_eq!(d2.day_number, 2);

        // A skipped day stretches the count: anchored to the previous
        // stored date, not a fixed series start.
        let d5 = tracker.current(&mut store, date(2024, 1, 5)).unwrap().unwrap();
        assert_eq!(d5.day_number, 4);
    }

    proptest! {
        #[test]
        fn selection_is_pure(year in 2000i32..2100, ordinal in 1u32..365) {
            let day = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            let pool = PromptPool::builtin();
            prop_assert_eq!(
                select_for_date(day, &pool),
                select_for_date(day, &pool)
            );
        }

        #[test]
        fn selection_index_always_in_bounds(year in 1i32..3000, ordinal in 1u32..365) {
            let day = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            let pool = PromptPool::builtin();
            prop_assert!(select_for_date(day, &pool).is_some());
        }
    }
}
