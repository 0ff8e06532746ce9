//! Pitch Recorder Core Library
//!
//! Record/pause/resume/stop session control over a pluggable capture
//! service, with a CPAL + hound WAV recorder as the concrete backend.
//!
//! # Example
//!
//! ```no_run
//! use pitch_recorder_core::{
//!     CaptureError, CapturedRecording, CoreResult, Handoff, IndicatorSet, Presentation,
//!     RecordingSessionController, RecordingStorage, WavCapture,
//! };
//!
//! struct Stdout;
//!
//! impl Presentation for Stdout {
//!     fn render(&mut self, indicators: IndicatorSet) {
//!         println!("{}", indicators.prompt().label());
//!     }
//!     fn report_error(&mut self, error: &CaptureError) {
//!         eprintln!("{}", error);
//!     }
//! }
//!
//! impl Handoff for Stdout {
//!     fn transition_to_playback(&mut self, recording: CapturedRecording) {
//!         println!("Recorded {}", recording.display_title());
//!     }
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let (completion_tx, completion_rx) = std::sync::mpsc::channel();
//!     let capture = WavCapture::new(None, completion_tx);
//!     let storage = RecordingStorage::new("recordings");
//!     let mut controller = RecordingSessionController::new(capture, Stdout, Stdout, storage);
//!
//!     controller.on_view_will_appear();
//!     controller.on_trigger_tapped()?;
//!     std::thread::sleep(std::time::Duration::from_secs(3));
//!     controller.on_stop_tapped()?;
//!
//!     if let Ok(completion) = completion_rx.recv() {
//!         controller.on_capture_completed(completion)?;
//!     }
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod recording;
mod session;

pub use {
    capture::WavCapture,
    error::{CaptureError, Result as CoreResult},
    recording::{CapturedRecording, RecordingStorage, recording_file_name},
    session::{
        CaptureCompletion, CaptureService, Handoff, IndicatorSet, Presentation, Prompt,
        RecordingSessionController, SessionState, TriggerAction,
    },
};

#[cfg(test)]
mod tests;
