//! End-to-end capture flow: live stream to accepted still to recorded
//! completion, over a fake camera device.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use snapstreak_core::capture::{RawFrame, Resolution, StreamHandle};
use snapstreak_core::{
    App, CameraDevice, CaptureState, Config, DeviceError, Event, Facing, FilterPreset,
    MemoryStore, NoopNotifier, PromptPool,
};

#[derive(Default)]
struct DeviceState {
    open_streams: usize,
    max_open: usize,
}

#[derive(Clone)]
struct FakeCamera {
    state: Rc<RefCell<DeviceState>>,
}

impl FakeCamera {
    fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DeviceState::default())),
        }
    }
}

impl CameraDevice for FakeCamera {
    fn acquire(
        &mut self,
        facing: Facing,
        _resolution: Resolution,
    ) -> Result<StreamHandle, DeviceError> {
        let mut state = self.state.borrow_mut();
        state.open_streams += 1;
        state.max_open = state.max_open.max(state.open_streams);
        Ok(StreamHandle::new(facing))
    }

    fn release(&mut self, _stream: StreamHandle) {
        self.state.borrow_mut().open_streams -= 1;
    }

    fn grab_frame(&mut self, _stream: &StreamHandle) -> Result<RawFrame, DeviceError> {
        // A 3000x2000 sensor frame; the optimizer must bound it.
        Ok(RawFrame {
            pixels: image::RgbaImage::from_pixel(3000, 2000, image::Rgba([80, 160, 90, 255])),
        })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn capture_edit_accept_records_a_completion() {
    let mut app = App::new(
        MemoryStore::new(),
        NoopNotifier,
        PromptPool::builtin(),
        Config::default(),
    );
    let camera = FakeCamera::new();
    let device_state = camera.state.clone();

    let mut session = app.capture_session(camera);
    assert!(matches!(session.start(), Some(Event::CameraStarted { .. })));
    assert!(matches!(session.stream_ready(), Some(Event::CameraReady { .. })));
    assert!(matches!(session.capture(), Some(Event::PhotoCaptured { .. })));

    // The sensor frame was bounded to the configured 1920x1080 budget.
    let still = session.still().unwrap();
    assert!(still.width <= 1920 && still.height <= 1080);

    // One editing round trip before acceptance.
    session.edit().unwrap();
    assert!(session.set_filter(FilterPreset::Vintage));
    assert!(session.set_contrast(120));
    assert!(matches!(session.save_edit(), Some(Event::EditSaved { .. })));
    assert_eq!(session.state(), CaptureState::Previewing);

    let (photo, _) = session.accept().unwrap();
    drop(session);
    {
        let state = device_state.borrow();
        assert_eq!(state.open_streams, 0);
        assert_eq!(state.max_open, 1);
    }

    let outcome = app.complete_challenge(&photo, date(2024, 5, 20)).unwrap();
    assert_eq!(outcome.progress.total_completed, 1);
    assert_eq!(outcome.unlocked.unwrap().id, "first-photo");

    // The stored payload is the accepted still.
    let entry = &outcome.progress.completed_challenges[0];
    assert!(entry.photo_url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn retake_and_facing_toggle_keep_a_single_stream() {
    let app = App::new(
        MemoryStore::new(),
        NoopNotifier,
        PromptPool::builtin(),
        Config::default(),
    );
    let camera = FakeCamera::new();
    let device_state = camera.state.clone();

    let mut session = app.capture_session(camera);
    session.start().unwrap();
    session.stream_ready().unwrap();
    session.toggle_facing().unwrap();
    assert_eq!(session.facing(), Facing::Front);

    session.stream_ready().unwrap();
    session.capture().unwrap();
    session.retake().unwrap();
    session.stream_ready().unwrap();
    session.capture().unwrap();
    session.cancel().unwrap();

    let state = device_state.borrow();
    assert_eq!(state.open_streams, 0);
    assert_eq!(state.max_open, 1);
}
