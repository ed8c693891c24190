//! Daily challenge prompts and deterministic day selection.

pub mod selector;

pub use selector::{select_for_date, DailyChallenge, DailyChallengeTracker, DAILY_CHALLENGE_KEY};

use serde::{Deserialize, Serialize};

/// Prompt difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One photo prompt from the static pool. Immutable; selected per day,
/// never created at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub prompt: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// JSON envelope the prompt file uses.
#[derive(Debug, Deserialize)]
struct PromptFile {
    prompts: Vec<Challenge>,
}

/// A static, ordered collection of challenges.
///
/// Selection indexes into this order, so reordering the pool reshuffles
/// every date's challenge. An empty pool means the selector offers no
/// challenge (perpetually loading) rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PromptPool(Vec<Challenge>);

impl PromptPool {
    pub fn new(prompts: Vec<Challenge>) -> Self {
        Self(prompts)
    }

    /// Parse a `{"prompts": [...]}` JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: PromptFile = serde_json::from_str(json)?;
        Ok(Self(file.prompts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Challenge> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.0.iter()
    }

    /// The built-in prompt pool shipped with the app.
    pub fn builtin() -> Self {
        fn challenge(id: &str, prompt: &str, category: &str, difficulty: Difficulty) -> Challenge {
            Challenge {
                id: id.to_string(),
                prompt: prompt.to_string(),
                category: category.to_string(),
                difficulty: Some(difficulty),
            }
        }
        Self(vec![
            challenge("morning-light", "Capture the first light you see today", "light", Difficulty::Beginner),
            challenge("something-red", "Find something red and make it the hero", "color", Difficulty::Beginner),
            challenge("reflections", "Photograph a reflection without the mirror", "composition", Difficulty::Intermediate),
            challenge("shadows", "Make a shadow the subject, not the object", "light", Difficulty::Intermediate),
            challenge("texture-closeup", "Get close enough to feel the texture", "detail", Difficulty::Beginner),
            challenge("leading-lines", "Use lines that pull the eye somewhere", "composition", Difficulty::Intermediate),
            challenge("motion", "Freeze or blur something in motion", "action", Difficulty::Advanced),
            challenge("symmetry", "Find symmetry you walk past every day", "composition", Difficulty::Beginner),
            challenge("from-below", "Shoot an ordinary thing from the ground up", "perspective", Difficulty::Beginner),
            challenge("negative-space", "Let emptiness do most of the talking", "composition", Difficulty::Advanced),
            challenge("silhouette", "A subject with no detail, only shape", "light", Difficulty::Intermediate),
            challenge("pattern-break", "A repeating pattern with one interruption", "detail", Difficulty::Intermediate),
            challenge("golden-hour", "Anything, but only in golden-hour light", "light", Difficulty::Beginner),
            challenge("hands-at-work", "Hands doing what they do best", "people", Difficulty::Intermediate),
            challenge("weather", "Show today's weather without the sky", "story", Difficulty::Advanced),
            challenge("tiny-world", "A scene that looks bigger than it is", "perspective", Difficulty::Advanced),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pool_is_non_empty_with_unique_ids() {
        let pool = PromptPool::builtin();
        assert!(!pool.is_empty());
        let mut ids: Vec<_> = pool.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), pool.len());
    }

    #[test]
    fn pool_parses_prompt_file_envelope() {
        let json = r#"{
            "prompts": [
                {"id": "a", "prompt": "Photograph a door", "category": "detail"},
                {"id": "b", "prompt": "Blue hour", "category": "light", "difficulty": "advanced"}
            ]
        }"#;
        let pool = PromptPool::from_json(json).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap().difficulty, None);
        assert_eq!(pool.get(1).unwrap().difficulty, Some(Difficulty::Advanced));
    }

    #[test]
    fn pool_rejects_malformed_json() {
        assert!(PromptPool::from_json(r#"{"prompts": "nope"}"#).is_err());
    }
}
