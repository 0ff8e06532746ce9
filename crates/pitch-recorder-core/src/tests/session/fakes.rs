use crate::{
    CaptureError, CaptureService, CapturedRecording, CoreResult, Handoff, IndicatorSet,
    Presentation, RecordingSessionController, RecordingStorage,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use error_location::ErrorLocation;

/// A call the controller made on the capture service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CaptureCall {
    Start(PathBuf),
    Pause,
    Resume,
    Stop,
    Deactivate,
}

/// Capture service recording every call; individual calls can be set to fail.
#[derive(Default)]
pub(crate) struct FakeCapture {
    pub(crate) calls: Vec<CaptureCall>,
    pub(crate) fail_start: bool,
    pub(crate) fail_pause: bool,
    pub(crate) fail_resume: bool,
    pub(crate) fail_stop: bool,
    pub(crate) fail_deactivate: bool,
}

impl FakeCapture {
    #[track_caller]
    fn device_error(reason: &str) -> CaptureError {
        CaptureError::DeviceError {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl CaptureService for FakeCapture {
    fn start(&mut self, location: &Path) -> CoreResult<()> {
        self.calls.push(CaptureCall::Start(location.to_path_buf()));
        if self.fail_start {
            return Err(CaptureError::RecorderConstructionFailed {
                path: location.to_path_buf(),
                reason: "fake".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        self.calls.push(CaptureCall::Pause);
        if self.fail_pause {
            return Err(Self::device_error("pause failed"));
        }
        Ok(())
    }

    fn resume(&mut self) -> CoreResult<()> {
        self.calls.push(CaptureCall::Resume);
        if self.fail_resume {
            return Err(Self::device_error("resume failed"));
        }
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        self.calls.push(CaptureCall::Stop);
        if self.fail_stop {
            return Err(Self::device_error("stop failed"));
        }
        Ok(())
    }

    fn deactivate_session(&mut self) -> CoreResult<()> {
        self.calls.push(CaptureCall::Deactivate);
        if self.fail_deactivate {
            return Err(CaptureError::SessionDeactivationFailed {
                reason: "fake".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

/// Presentation remembering every render and every reported error message.
#[derive(Default)]
pub(crate) struct FakePresentation {
    pub(crate) renders: Vec<IndicatorSet>,
    pub(crate) errors: Vec<String>,
}

impl FakePresentation {
    pub(crate) fn last(&self) -> Option<IndicatorSet> {
        self.renders.last().copied()
    }
}

impl Presentation for FakePresentation {
    fn render(&mut self, indicators: IndicatorSet) {
        self.renders.push(indicators);
    }

    fn report_error(&mut self, error: &CaptureError) {
        self.errors.push(error.to_string());
    }
}

#[derive(Default)]
pub(crate) struct FakeHandoff {
    pub(crate) received: Vec<CapturedRecording>,
}

impl Handoff for FakeHandoff {
    fn transition_to_playback(&mut self, recording: CapturedRecording) {
        self.received.push(recording);
    }
}

pub(crate) type TestController =
    RecordingSessionController<FakeCapture, FakePresentation, FakeHandoff>;

/// Controller over fakes with a fixed clock (2014-12-12 09:05:03) and
/// storage under `/recordings`.
#[allow(clippy::unwrap_used)]
pub(crate) fn controller_with(capture: FakeCapture) -> TestController {
    let started_at = NaiveDate::from_ymd_opt(2014, 12, 12)
        .unwrap()
        .and_hms_opt(9, 5, 3)
        .unwrap();

    RecordingSessionController::new(
        capture,
        FakePresentation::default(),
        FakeHandoff::default(),
        RecordingStorage::new("/recordings"),
    )
    .with_clock(move || started_at)
}

pub(crate) fn controller() -> TestController {
    controller_with(FakeCapture::default())
}
