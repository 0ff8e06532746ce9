use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture session could not be configured (device, stream config).
    #[error("Capture session configuration failed: {reason} {location}")]
    SessionConfigurationFailed {
        /// Description of the configuration failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder writing the audio file could not be created.
    #[error("Recorder construction failed for {path:?}: {reason} {location}")]
    RecorderConstructionFailed {
        /// Path of the audio file the recorder was meant to write.
        path: PathBuf,
        /// Description of the construction failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture session could not be closed.
    #[error("Capture session deactivation failed: {reason} {location}")]
    SessionDeactivationFailed {
        /// Description of the deactivation failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture service reported the recording as unsuccessful.
    #[error("Capture finished unsuccessfully: {path:?} {location}")]
    CaptureUnsuccessful {
        /// Path of the audio file the capture was writing.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
