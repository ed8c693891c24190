//! Device capture collaborator contract.
//!
//! The capture flow never talks to camera hardware directly; it drives an
//! implementation of [`CameraDevice`]. Hosts supply the real device
//! binding, tests supply fakes.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeviceError;

/// Which physical camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// User-facing camera; viewfinder and capture are mirrored.
    Front,
    /// World-facing camera.
    Back,
}

impl Facing {
    pub fn opposite(&self) -> Facing {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Back
    }
}

/// Target stream resolution. The device may deliver a different size;
/// the optimizer bounds the stored result either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Token for one open device video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandle {
    pub id: Uuid,
    pub facing: Facing,
}

impl StreamHandle {
    pub fn new(facing: Facing) -> Self {
        Self {
            id: Uuid::new_v4(),
            facing,
        }
    }
}

/// One raw frame snapshotted from a live stream.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub pixels: RgbaImage,
}

/// Exclusive access to the device camera.
///
/// Implementations must hand out at most one live stream per acquire and
/// treat `release` as idempotent; the capture session guarantees it never
/// holds two handles at once.
pub trait CameraDevice {
    /// Open an exclusive video stream on the camera with the given facing.
    fn acquire(&mut self, facing: Facing, resolution: Resolution)
        -> Result<StreamHandle, DeviceError>;

    /// Close a previously acquired stream.
    fn release(&mut self, stream: StreamHandle);

    /// Snapshot the current frame of a live stream.
    fn grab_frame(&mut self, stream: &StreamHandle) -> Result<RawFrame, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_opposite_flips() {
        assert_eq!(Facing::Front.opposite(), Facing::Back);
        assert_eq!(Facing::Back.opposite(), Facing::Front);
        assert_eq!(Facing::default(), Facing::Back);
    }

    #[test]
    fn stream_handles_are_unique() {
        let a = StreamHandle::new(Facing::Back);
        let b = StreamHandle::new(Facing::Back);
        assert_ne!(a.id, b.id);
    }
}
