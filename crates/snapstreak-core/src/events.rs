use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::Facing;

/// Every state change in the system produces an Event.
/// A host UI renders events; the notification surface subscribes to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The device video stream was acquired and the viewfinder is live.
    CameraStarted {
        facing: Facing,
        at: DateTime<Utc>,
    },
    /// The live stream signalled readiness; capture is now possible.
    CameraReady {
        facing: Facing,
        at: DateTime<Utc>,
    },
    /// Stream acquisition or frame processing failed; the flow entered
    /// a recoverable error state with a user-facing message.
    CameraFailed {
        message: String,
        at: DateTime<Utc>,
    },
    /// A still frame was captured and optimized for preview.
    PhotoCaptured {
        width: u32,
        height: u32,
        mirrored: bool,
        at: DateTime<Utc>,
    },
    /// An edit session opened over the previewed still.
    EditStarted {
        at: DateTime<Utc>,
    },
    /// The edited composite replaced the previewed still.
    EditSaved {
        at: DateTime<Utc>,
    },
    /// Edits were discarded; the pre-edit still was restored.
    EditCancelled {
        at: DateTime<Utc>,
    },
    /// Saving the edit failed; the prior preview is preserved.
    EditFailed {
        message: String,
        at: DateTime<Utc>,
    },
    /// The previewed still was accepted and handed to the caller.
    PhotoAccepted {
        width: u32,
        height: u32,
        at: DateTime<Utc>,
    },
    /// The capture flow was cancelled.
    CaptureCancelled {
        at: DateTime<Utc>,
    },
    /// A completed challenge was appended to the ledger.
    ChallengeCompleted {
        challenge_id: String,
        date: NaiveDate,
        day_number: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// An achievement rule evaluated true for the first time.
    AchievementUnlocked {
        id: String,
        title: String,
        at: DateTime<Utc>,
    },
}
