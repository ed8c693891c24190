//! # Snapstreak Core Library
//!
//! Core business logic for Snapstreak, a single-user daily photo
//! challenge app: a prompt per day, camera capture with light editing,
//! and a running history with streaks and achievements. A host shell
//! (desktop or web view) is a thin presentation layer over this crate;
//! the camera and notification surfaces are supplied by the host through
//! small traits.
//!
//! ## Architecture
//!
//! - **Capture**: a caller-driven state machine taking one photo from
//!   live viewfinder through preview/edit to an accepted, optimized still
//! - **Photo**: encoded payloads, CSS-semantics color adjustments, and a
//!   bounded resize/re-encode optimizer
//! - **Challenge**: deterministic per-day prompt selection over a static
//!   pool, cached once per calendar day
//! - **Progress**: copy-on-write completion ledger with streak counters,
//!   plus a data-driven achievement rule engine
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`CaptureSession`]: capture/edit state machine
//! - [`Optimizer`]: image bounding and re-encoding
//! - [`App`]: application service wiring selector, ledger, and store
//! - [`Database`]: durable key-value persistence

pub mod app;
pub mod capture;
pub mod challenge;
pub mod error;
pub mod events;
pub mod notify;
pub mod photo;
pub mod progress;
pub mod storage;

pub use app::{App, CompletionOutcome};
pub use capture::{CameraDevice, CaptureOptions, CaptureSession, CaptureState, Facing};
pub use challenge::{Challenge, DailyChallenge, PromptPool};
pub use error::{ConfigError, CoreError, DeviceError, ImageError, StoreError};
pub use events::Event;
pub use notify::{NoopNotifier, Notifier};
pub use photo::{EncodedPhoto, FilterPreset, OptimizeOptions, Optimizer, PhotoFormat};
pub use progress::{Achievement, AchievementEngine, CompletedChallenge, UserProgress};
pub use storage::{Config, Database, MemoryStore, Store};
