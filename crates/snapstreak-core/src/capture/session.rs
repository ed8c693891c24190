//! Capture/edit state machine.
//!
//! Drives one photo from live viewfinder to accepted, optimized still.
//! Like the rest of the core, the session has no internal threads: every
//! command runs to completion and returns the event it produced.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Live -> Previewing -> Editing -> Previewing -> Accepted | Cancelled
//!          ^  \                    |
//!          |   -> Error -> Live (retry)
//!          +--- Previewing (retake)
//! ```
//!
//! The device stream is a scoped resource: it is acquired on every entry
//! to `Live` and released synchronously on every exit path, including
//! errors, cancellation, and Drop. At most one stream exists at a time.

use chrono::Utc;
use image::imageops;
use serde::{Deserialize, Serialize};

use super::device::{CameraDevice, Facing, Resolution};
use super::editor::EditSession;
use crate::events::Event;
use crate::photo::{EncodedPhoto, FilterPreset, OptimizeOptions, Optimizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    Idle,
    Live,
    Previewing,
    Editing,
    Accepted,
    Cancelled,
    /// Recoverable device/render failure; `retry` re-enters Live.
    Error,
}

/// Capture session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CaptureOptions {
    pub facing: Facing,
    pub resolution: Resolution,
    pub optimize: OptimizeOptions,
}

/// One capture/edit flow over a camera device.
///
/// Commands return `Some(Event)` on a state change and `None` when the
/// command does not apply in the current state (no-op).
pub struct CaptureSession<D: CameraDevice> {
    device: D,
    options: CaptureOptions,
    optimizer: Optimizer,
    state: CaptureState,
    facing: Facing,
    stream: Option<super::device::StreamHandle>,
    stream_ready: bool,
    still: Option<EncodedPhoto>,
    editor: Option<EditSession>,
    last_error: Option<String>,
}

impl<D: CameraDevice> CaptureSession<D> {
    pub fn new(device: D, options: CaptureOptions) -> Self {
        Self {
            device,
            facing: options.facing,
            options,
            optimizer: Optimizer::new(),
            state: CaptureState::Idle,
            stream: None,
            stream_ready: false,
            still: None,
            editor: None,
            last_error: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// User-facing message for the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The optimized still currently previewed, if any.
    pub fn still(&self) -> Option<&EncodedPhoto> {
        self.still.as_ref()
    }

    pub fn editor(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    /// Whether an optimize pass is in flight; interactive controls must
    /// be disabled while true.
    pub fn is_processing(&self) -> bool {
        self.optimizer.is_processing()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle -> Live: request an exclusive device stream.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            CaptureState::Idle => Some(self.go_live()),
            _ => None,
        }
    }

    /// Error -> Live: retry stream acquisition.
    pub fn retry(&mut self) -> Option<Event> {
        match self.state {
            CaptureState::Error => Some(self.go_live()),
            _ => None,
        }
    }

    /// The device driver signalled that the live stream is delivering
    /// frames; capture becomes possible.
    pub fn stream_ready(&mut self) -> Option<Event> {
        if self.state != CaptureState::Live || self.stream.is_none() || self.stream_ready {
            return None;
        }
        self.stream_ready = true;
        Some(Event::CameraReady {
            facing: self.facing,
            at: Utc::now(),
        })
    }

    /// Live -> Previewing: snapshot the current frame, mirror it for the
    /// front camera, optimize it, and release the stream.
    ///
    /// No-op unless the stream is live and ready.
    pub fn capture(&mut self) -> Option<Event> {
        if self.state != CaptureState::Live || !self.stream_ready {
            return None;
        }
        let stream = self.stream.clone()?;
        let frame = match self.device.grab_frame(&stream) {
            Ok(frame) => frame,
            Err(e) => return Some(self.enter_error(e.to_string())),
        };

        // Mirror front-camera captures so the stored photo matches what
        // the subject physically saw, not the mirrored viewfinder.
        let mirrored = stream.facing == Facing::Front;
        let pixels = if mirrored {
            imageops::flip_horizontal(&frame.pixels)
        } else {
            frame.pixels
        };

        let still = match self.optimizer.optimize_image(&pixels, &self.options.optimize) {
            Ok(still) => still,
            Err(e) => return Some(self.enter_error(e.to_string())),
        };

        self.release_stream();
        let (width, height) = (still.width, still.height);
        self.still = Some(still);
        self.state = CaptureState::Previewing;
        Some(Event::PhotoCaptured {
            width,
            height,
            mirrored,
            at: Utc::now(),
        })
    }

    /// Previewing -> Editing: open a non-destructive edit session seeded
    /// with the previewed still.
    ///
    /// A decode failure leaves the preview untouched.
    pub fn edit(&mut self) -> Option<Event> {
        if self.state != CaptureState::Previewing {
            return None;
        }
        let still = self.still.as_ref()?;
        match EditSession::open(still) {
            Ok(session) => {
                self.editor = Some(session);
                self.state = CaptureState::Editing;
                Some(Event::EditStarted { at: Utc::now() })
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                Some(Event::EditFailed {
                    message,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Select a filter preset. Returns false outside an edit session.
    pub fn set_filter(&mut self, preset: FilterPreset) -> bool {
        match self.editor.as_mut() {
            Some(editor) if self.state == CaptureState::Editing => {
                editor.set_filter(preset);
                true
            }
            _ => false,
        }
    }

    pub fn set_brightness(&mut self, percent: u16) -> bool {
        match self.editor.as_mut() {
            Some(editor) if self.state == CaptureState::Editing => {
                editor.set_brightness(percent);
                true
            }
            _ => false,
        }
    }

    pub fn set_contrast(&mut self, percent: u16) -> bool {
        match self.editor.as_mut() {
            Some(editor) if self.state == CaptureState::Editing => {
                editor.set_contrast(percent);
                true
            }
            _ => false,
        }
    }

    pub fn set_saturation(&mut self, percent: u16) -> bool {
        match self.editor.as_mut() {
            Some(editor) if self.state == CaptureState::Editing => {
                editor.set_saturation(percent);
                true
            }
            _ => false,
        }
    }

    /// Editing -> Previewing: re-optimize the rendered composite and
    /// replace the previewed still.
    ///
    /// On encode failure the session stays in Editing and the prior
    /// preview is preserved.
    pub fn save_edit(&mut self) -> Option<Event> {
        if self.state != CaptureState::Editing {
            return None;
        }
        let editor = self.editor.as_ref()?;
        match self
            .optimizer
            .optimize_image(editor.rendered(), &self.options.optimize)
        {
            Ok(still) => {
                self.still = Some(still);
                self.editor = None;
                self.state = CaptureState::Previewing;
                Some(Event::EditSaved { at: Utc::now() })
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                Some(Event::EditFailed {
                    message,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Editing -> Previewing: discard edits and restore the pre-edit still.
    pub fn cancel_edit(&mut self) -> Option<Event> {
        if self.state != CaptureState::Editing {
            return None;
        }
        let editor = self.editor.take()?;
        self.still = Some(editor.pre_edit().clone());
        self.state = CaptureState::Previewing;
        Some(Event::EditCancelled { at: Utc::now() })
    }

    /// Previewing -> Live: discard the still and re-acquire the stream.
    pub fn retake(&mut self) -> Option<Event> {
        if self.state != CaptureState::Previewing {
            return None;
        }
        self.still = None;
        Some(self.go_live())
    }

    /// Toggle front/back while Live. The current stream is released
    /// before the opposite one is acquired; two streams never coexist.
    pub fn toggle_facing(&mut self) -> Option<Event> {
        if self.state != CaptureState::Live {
            return None;
        }
        self.release_stream();
        self.facing = self.facing.opposite();
        Some(self.go_live())
    }

    /// Previewing -> Accepted: hand the optimized still to the caller.
    /// The session is terminal afterwards.
    pub fn accept(&mut self) -> Option<(EncodedPhoto, Event)> {
        if self.state != CaptureState::Previewing {
            return None;
        }
        let still = self.still.take()?;
        self.state = CaptureState::Accepted;
        let event = Event::PhotoAccepted {
            width: still.width,
            height: still.height,
            at: Utc::now(),
        };
        Some((still, event))
    }

    /// Cancel the whole flow from any non-terminal state, releasing the
    /// stream synchronously before the transition completes.
    pub fn cancel(&mut self) -> Option<Event> {
        match self.state {
            CaptureState::Accepted | CaptureState::Cancelled => None,
            _ => {
                self.release_stream();
                self.editor = None;
                self.still = None;
                self.state = CaptureState::Cancelled;
                Some(Event::CaptureCancelled { at: Utc::now() })
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn go_live(&mut self) -> Event {
        debug_assert!(self.stream.is_none(), "stream released before re-acquire");
        match self.device.acquire(self.facing, self.options.resolution) {
            Ok(handle) => {
                self.stream = Some(handle);
                self.stream_ready = false;
                self.last_error = None;
                self.state = CaptureState::Live;
                Event::CameraStarted {
                    facing: self.facing,
                    at: Utc::now(),
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                self.state = CaptureState::Error;
                Event::CameraFailed {
                    message,
                    at: Utc::now(),
                }
            }
        }
    }

    /// Device/render failure mid-flow: release everything and surface a
    /// recoverable error with a user-facing message.
    fn enter_error(&mut self, message: String) -> Event {
        self.release_stream();
        self.still = None;
        self.editor = None;
        self.last_error = Some(message.clone());
        self.state = CaptureState::Error;
        Event::CameraFailed {
            message,
            at: Utc::now(),
        }
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.device.release(stream);
        }
        self.stream_ready = false;
    }
}

impl<D: CameraDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        self.release_stream();
    }
}
