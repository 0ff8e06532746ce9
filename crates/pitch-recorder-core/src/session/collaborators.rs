use crate::{CaptureError, CapturedRecording, CoreResult, IndicatorSet};

use std::path::{Path, PathBuf};

/// Platform facility recording the microphone to a file.
///
/// Implementations deliver exactly one [`CaptureCompletion`] per started
/// capture, after `stop` or an internal failure, over a channel handed to
/// them at construction.
pub trait CaptureService {
    /// Begin capturing into `location`.
    fn start(&mut self, location: &Path) -> CoreResult<()>;

    /// Suspend the running capture.
    fn pause(&mut self) -> CoreResult<()>;

    /// Continue a paused capture.
    fn resume(&mut self) -> CoreResult<()>;

    /// Finish the capture and finalize the file.
    fn stop(&mut self) -> CoreResult<()>;

    /// Release the capture session acquired by `start`.
    fn deactivate_session(&mut self) -> CoreResult<()>;
}

/// Surface showing the session indicators to the user.
pub trait Presentation {
    /// Show exactly the given indicator set.
    fn render(&mut self, indicators: IndicatorSet);

    /// Tell the user an operation failed.
    fn report_error(&mut self, error: &CaptureError);
}

/// Receiver of finished recordings (the playback stage).
pub trait Handoff {
    /// Move on to playback of `recording`.
    fn transition_to_playback(&mut self, recording: CapturedRecording);
}

/// Message sent by a [`CaptureService`] when a capture finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureCompletion {
    /// Whether the file was written completely.
    pub success: bool,
    /// File the capture wrote to.
    pub location: PathBuf,
}
