use pitch_recorder_core::Prompt;

/// Tray icon states corresponding to the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// Currently recording audio.
    Recording,
    /// Recording paused.
    Paused,
}

impl TrayIconState {
    /// RGBA colour of the status dot.
    pub fn color(self) -> [u8; 4] {
        match self {
            TrayIconState::Idle => [0x9e, 0x9e, 0x9e, 0xff],
            TrayIconState::Recording => [0xe5, 0x39, 0x35, 0xff],
            TrayIconState::Paused => [0xff, 0xb3, 0x00, 0xff],
        }
    }

    /// Label of the trigger menu item in this state.
    pub fn trigger_label(self) -> &'static str {
        match self {
            TrayIconState::Idle => "Record",
            TrayIconState::Recording => "Pause",
            TrayIconState::Paused => "Resume",
        }
    }
}

impl From<Prompt> for TrayIconState {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::TapToRecord => TrayIconState::Idle,
            Prompt::RecordingInProgress => TrayIconState::Recording,
            Prompt::TapToResume => TrayIconState::Paused,
        }
    }
}
