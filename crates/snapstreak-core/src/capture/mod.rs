//! Camera capture and photo editing.
//!
//! [`CaptureSession`] is the state machine that takes one photo from live
//! viewfinder to accepted still; [`CameraDevice`] is the host-supplied
//! device binding; [`EditSession`] is the non-destructive edit pass.

pub mod device;
pub mod editor;
pub mod session;

pub use device::{CameraDevice, Facing, RawFrame, Resolution, StreamHandle};
pub use editor::EditSession;
pub use session::{CaptureOptions, CaptureSession, CaptureState};
