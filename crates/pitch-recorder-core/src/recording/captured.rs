use std::path::{Path, PathBuf};

/// A finished recording handed to the playback stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecording {
    location: PathBuf,
    display_title: String,
}

impl CapturedRecording {
    /// Build from the file the capture wrote. The title is the file name.
    pub fn from_location(location: PathBuf) -> Self {
        let display_title = location
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.display().to_string());

        Self {
            location,
            display_title,
        }
    }

    /// Path of the audio file.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Title shown for the recording.
    pub fn display_title(&self) -> &str {
        &self.display_title
    }
}
