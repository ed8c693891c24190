//! Achievement rules and evaluation.
//!
//! Requirements are data, not closures: each rule is a [`Requirement`]
//! variant evaluated by a small interpreter, so the rule set stays
//! serializable and testable in isolation. The catalog order is fixed;
//! evaluation unlocks at most one achievement per call so a single user
//! action never fires a burst of unlock notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::UserProgress;

/// A predicate over the progress aggregate, expressed as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "n", rename_all = "snake_case")]
pub enum Requirement {
    /// Total completions reach `n`.
    TotalAtLeast(u32),
    /// Current streak reaches `n` consecutive days.
    StreakAtLeast(u32),
}

impl Requirement {
    pub fn satisfied(&self, progress: &UserProgress) -> bool {
        match *self {
            Requirement::TotalAtLeast(n) => progress.total_completed >= n,
            Requirement::StreakAtLeast(n) => progress.current_streak >= n,
        }
    }

    /// `(current, target)` toward this requirement.
    pub fn progress(&self, progress: &UserProgress) -> (u32, u32) {
        match *self {
            Requirement::TotalAtLeast(n) => (progress.total_completed.min(n), n),
            Requirement::StreakAtLeast(n) => (progress.current_streak.min(n), n),
        }
    }
}

/// Static rule definition. The catalog is configuration, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: Requirement,
}

impl AchievementDef {
    fn unlock(&self, now: DateTime<Utc>) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked_at: now,
        }
    }
}

/// An unlocked achievement as stored in the progress aggregate.
/// `unlocked_at` is stamped once and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Locked-or-unlocked view of one rule, with progress toward the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub current: u32,
    pub target: u32,
}

/// The built-in rule set, in evaluation order.
pub fn builtin_catalog() -> Vec<AchievementDef> {
    vec![
        AchievementDef {
            id: "first-photo",
            title: "First Shot",
            description: "Complete your first daily challenge",
            icon: "\u{1F4F8}",
            requirement: Requirement::TotalAtLeast(1),
        },
        AchievementDef {
            id: "week-streak",
            title: "Week Warrior",
            description: "Complete 7 days in a row",
            icon: "\u{1F525}",
            requirement: Requirement::StreakAtLeast(7),
        },
        AchievementDef {
            id: "month-master",
            title: "Month Master",
            description: "Complete 30 days in a row",
            icon: "\u{1F451}",
            requirement: Requirement::StreakAtLeast(30),
        },
        AchievementDef {
            id: "half-century",
            title: "Half Century",
            description: "Complete 50 challenges total",
            icon: "\u{1F31F}",
            requirement: Requirement::TotalAtLeast(50),
        },
        AchievementDef {
            id: "century",
            title: "Century Club",
            description: "Complete 100 challenges total",
            icon: "\u{1F3C6}",
            requirement: Requirement::TotalAtLeast(100),
        },
    ]
}

/// Evaluates the rule set against a progress snapshot.
#[derive(Debug, Clone)]
pub struct AchievementEngine {
    catalog: Vec<AchievementDef>,
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self {
            catalog: builtin_catalog(),
        }
    }
}

impl AchievementEngine {
    pub fn new(catalog: Vec<AchievementDef>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[AchievementDef] {
        &self.catalog
    }

    /// The first rule (in catalog order) that is not yet unlocked and
    /// whose requirement holds, stamped with `now`.
    ///
    /// At most one achievement per call, even when several rules newly
    /// qualify; the rest are picked up on the next progress change. No
    /// side effect when nothing qualifies.
    pub fn evaluate(&self, progress: &UserProgress, now: DateTime<Utc>) -> Option<Achievement> {
        self.catalog
            .iter()
            .find(|def| !progress.has_achievement(def.id) && def.requirement.satisfied(progress))
            .map(|def| def.unlock(now))
    }

    /// Status of every rule, for the progress page.
    pub fn report(&self, progress: &UserProgress) -> Vec<AchievementStatus> {
        self.catalog
            .iter()
            .map(|def| {
                let unlocked_at = progress
                    .achievements
                    .iter()
                    .find(|a| a.id == def.id)
                    .map(|a| a.unlocked_at);
                let (current, target) = def.requirement.progress(progress);
                AchievementStatus {
                    id: def.id.to_string(),
                    title: def.title.to_string(),
                    description: def.description.to_string(),
                    icon: def.icon.to_string(),
                    unlocked_at,
                    current,
                    target,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn progress_with(total: u32, streak: u32) -> UserProgress {
        let mut progress = UserProgress::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        progress.total_completed = total;
        progress.current_streak = streak;
        progress.longest_streak = streak;
        progress
    }

    #[test]
    fn first_completion_unlocks_first_photo() {
        let engine = AchievementEngine::default();
        let progress = progress_with(1, 1);
        let unlocked = engine.evaluate(&progress, Utc::now()).unwrap();
        assert_eq!(unlocked.id, "first-photo");
    }

    #[test]
    fn nothing_unlocks_on_empty_progress() {
        let engine = AchievementEngine::default();
        let progress = progress_with(0, 0);
        assert!(engine.evaluate(&progress, Utc::now()).is_none());
    }

    #[test]
    fn unlocked_rule_is_never_returned_again() {
        let engine = AchievementEngine::default();
        let mut progress = progress_with(1, 1);
        let first = engine.evaluate(&progress, Utc::now()).unwrap();
        progress.achievements.push(first);

        // Unchanged progress: no rule newly qualifies.
        assert!(engine.evaluate(&progress, Utc::now()).is_none());
    }

    #[test]
    fn at_most_one_unlock_per_call() {
        let engine = AchievementEngine::default();
        // Several rules qualify simultaneously; only the first in catalog
        // order is returned, the rest wait for later evaluations.
        let mut progress = progress_with(100, 30);

        let a = engine.evaluate(&progress, Utc::now()).unwrap();
        assert_eq!(a.id, "first-photo");
        progress.achievements.push(a);

        let b = engine.evaluate(&progress, Utc::now()).unwrap();
        assert_eq!(b.id, "week-streak");
        progress.achievements.push(b);

        let c = engine.evaluate(&progress, Utc::now()).unwrap();
        assert_eq!(c.id, "month-master");
    }

    #[test]
    fn streak_rules_track_current_streak() {
        let engine = AchievementEngine::default();
        let mut progress = progress_with(7, 7);
        progress.achievements.push(
            engine.evaluate(&progress, Utc::now()).unwrap(), // first-photo
        );
        let unlocked = engine.evaluate(&progress, Utc::now()).unwrap();
        assert_eq!(unlocked.id, "week-streak");
    }

    #[test]
    fn report_caps_progress_at_target() {
        let engine = AchievementEngine::default();
        let progress = progress_with(120, 3);
        let report = engine.report(&progress);

        let century = report.iter().find(|s| s.id == "century").unwrap();
        assert_eq!((century.current, century.target), (100, 100));

        let week = report.iter().find(|s| s.id == "week-streak").unwrap();
        assert_eq!((week.current, week.target), (3, 7));
        assert!(week.unlocked_at.is_none());
    }

    #[test]
    fn requirement_rules_serialize_as_data() {
        let rule = Requirement::StreakAtLeast(7);
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"kind":"streak_at_least","n":7}"#);
        let back: Requirement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
