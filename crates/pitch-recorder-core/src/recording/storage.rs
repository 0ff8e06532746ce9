use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use directories::ProjectDirs;

/// `ddMMyyyy-HHmmss`, e.g. `12122014-090503`.
const FILE_STEM_FORMAT: &str = "%d%m%Y-%H%M%S";

/// File name of a recording started at `started_at`.
pub fn recording_file_name(started_at: NaiveDateTime) -> String {
    format!("{}.wav", started_at.format(FILE_STEM_FORMAT))
}

/// Directory recordings are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingStorage {
    dir: PathBuf,
}

impl RecordingStorage {
    /// Store recordings under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The application's private data directory, or `None` when the platform
    /// has no home directory.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "pitch-recorder", "Pitch-Recorder")
            .map(|dirs| dirs.data_dir().join("recordings"))
    }

    /// Directory recordings land in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a recording started at `started_at`.
    pub fn path_for(&self, started_at: NaiveDateTime) -> PathBuf {
        self.dir.join(recording_file_name(started_at))
    }
}
