mod captured;
mod storage;

pub use {
    captured::CapturedRecording,
    storage::{RecordingStorage, recording_file_name},
};
