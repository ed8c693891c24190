//! Application service: the control flow of the daily challenge.
//!
//! Ties the challenge selector, the progress ledger, the achievement
//! engine, the store, and the notification surface together. All
//! aggregate mutation happens here as read-snapshot, compute-next,
//! write-whole-snapshot; execution is single-threaded and each step runs
//! to completion, so no write can interleave with another.

use chrono::{NaiveDate, Utc};

use crate::capture::{CameraDevice, CaptureSession};
use crate::challenge::{DailyChallenge, DailyChallengeTracker, PromptPool};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::notify::Notifier;
use crate::photo::EncodedPhoto;
use crate::progress::{
    record_completion, Achievement, AchievementEngine, AchievementStatus, UserProgress,
};
use crate::storage::{Config, Store, USER_PROGRESS_KEY};

/// Result of accepting a photo for today's challenge.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    /// The new progress snapshot, as persisted.
    pub progress: UserProgress,
    /// The achievement unlocked by this completion, if any.
    pub unlocked: Option<Achievement>,
    pub events: Vec<Event>,
}

/// The daily photo challenge app over a durable store and a
/// notification sink.
pub struct App<S: Store, N: Notifier> {
    store: S,
    notifier: N,
    tracker: DailyChallengeTracker,
    engine: AchievementEngine,
    config: Config,
}

impl<S: Store, N: Notifier> App<S, N> {
    pub fn new(store: S, notifier: N, pool: PromptPool, config: Config) -> Self {
        Self {
            store,
            notifier,
            tracker: DailyChallengeTracker::new(pool),
            engine: AchievementEngine::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a capture session configured from the app config.
    pub fn capture_session<D: CameraDevice>(&self, device: D) -> CaptureSession<D> {
        CaptureSession::new(device, self.config.capture_options())
    }

    /// Today's challenge, cached per calendar day.
    ///
    /// `Ok(None)` while the prompt pool is empty (still loading).
    pub fn daily_challenge(&mut self, today: NaiveDate) -> Result<Option<DailyChallenge>> {
        Ok(self.tracker.current(&mut self.store, today)?)
    }

    /// The current progress snapshot, or a fresh aggregate starting today.
    pub fn progress(&self, today: NaiveDate) -> Result<UserProgress> {
        Ok(self.store.get(USER_PROGRESS_KEY, UserProgress::new(today))?)
    }

    /// Achievement status of every rule, for the progress page.
    pub fn achievement_report(&self, today: NaiveDate) -> Result<Vec<AchievementStatus>> {
        Ok(self.engine.report(&self.progress(today)?))
    }

    /// Record an accepted photo against today's challenge.
    ///
    /// Reads the stored snapshot, appends the completion, evaluates
    /// achievements, and writes the whole next snapshot in one `set`. A
    /// persistence failure aborts the action: the error is returned and
    /// the stored aggregate still holds the previous snapshot.
    pub fn complete_challenge(
        &mut self,
        photo: &EncodedPhoto,
        today: NaiveDate,
    ) -> Result<CompletionOutcome> {
        let Some(daily) = self.tracker.current(&mut self.store, today)? else {
            return Err(CoreError::Custom(
                "no challenge available: prompt pool is still loading".into(),
            ));
        };

        let now = Utc::now();
        let progress = self.store.get(USER_PROGRESS_KEY, UserProgress::new(today))?;
        let mut next = record_completion(
            &progress,
            &daily.challenge,
            photo.to_data_url(),
            daily.day_number,
            today,
            now,
        );

        let unlocked = self.engine.evaluate(&next, now);
        if let Some(achievement) = &unlocked {
            next.achievements.push(achievement.clone());
        }

        self.store.set(USER_PROGRESS_KEY, &next)?;

        let mut events = vec![Event::ChallengeCompleted {
            challenge_id: daily.challenge.id.clone(),
            date: today,
            day_number: daily.day_number,
            streak: next.current_streak,
            at: now,
        }];
        if let Some(achievement) = &unlocked {
            events.push(Event::AchievementUnlocked {
                id: achievement.id.clone(),
                title: achievement.title.clone(),
                at: now,
            });
            // Best-effort; the unlock stands whether or not this lands.
            if self.config.notifications.enabled {
                self.notifier.notify(
                    "New Achievement Unlocked!",
                    &format!("{} - {}", achievement.title, achievement.description),
                );
            }
        }

        Ok(CompletionOutcome {
            progress: next,
            unlocked,
            events,
        })
    }
}
