//! Completion history, streaks, and achievements.

pub mod achievements;
pub mod ledger;

pub use achievements::{
    builtin_catalog, Achievement, AchievementDef, AchievementEngine, AchievementStatus,
    Requirement,
};
pub use ledger::{record_completion, CompletedChallenge, UserProgress};
