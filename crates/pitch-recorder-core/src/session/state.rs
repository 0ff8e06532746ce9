/// Recording session state driven by the trigger and stop controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing is being captured.
    #[default]
    Idle,
    /// Audio is being captured.
    Recording,
    /// A capture is open but not taking samples.
    Paused,
}

impl SessionState {
    /// True while a capture is open (Recording or Paused).
    pub fn is_active(self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// The action a trigger tap performs from this state.
    pub fn trigger_action(self) -> TriggerAction {
        match self {
            SessionState::Idle => TriggerAction::Start,
            SessionState::Recording => TriggerAction::Pause,
            SessionState::Paused => TriggerAction::Resume,
        }
    }
}

/// What a trigger tap does to the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Open a new capture.
    Start,
    /// Suspend the running capture.
    Pause,
    /// Continue a paused capture.
    Resume,
}

impl TriggerAction {
    /// State the session is in once the action succeeded.
    pub fn next_state(self) -> SessionState {
        match self {
            TriggerAction::Start | TriggerAction::Resume => SessionState::Recording,
            TriggerAction::Pause => SessionState::Paused,
        }
    }
}

/// The prompt shown next to the trigger control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// "Tap to record".
    TapToRecord,
    /// "Recording in progress" together with "Tap to pause".
    RecordingInProgress,
    /// "Tap to resume".
    TapToResume,
}

impl Prompt {
    /// Human readable label for the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Prompt::TapToRecord => "Tap to record",
            Prompt::RecordingInProgress => "Recording in progress - tap to pause",
            Prompt::TapToResume => "Tap to resume",
        }
    }
}

/// Visibility and enabled flags of the presentation layer.
///
/// Only obtainable through [`IndicatorSet::for_state`], so the visible set is
/// always a function of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSet {
    trigger_enabled: bool,
    stop_visible: bool,
    tap_to_record: bool,
    recording_in_progress: bool,
    tap_to_pause: bool,
    tap_to_resume: bool,
}

impl IndicatorSet {
    /// Indicators for the given state.
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Idle => Self {
                trigger_enabled: true,
                stop_visible: false,
                tap_to_record: true,
                recording_in_progress: false,
                tap_to_pause: false,
                tap_to_resume: false,
            },
            SessionState::Recording => Self {
                trigger_enabled: true,
                stop_visible: true,
                tap_to_record: false,
                recording_in_progress: true,
                tap_to_pause: true,
                tap_to_resume: false,
            },
            SessionState::Paused => Self {
                trigger_enabled: true,
                stop_visible: true,
                tap_to_record: false,
                recording_in_progress: false,
                tap_to_pause: false,
                tap_to_resume: true,
            },
        }
    }

    /// The one prompt group that is visible.
    pub fn prompt(&self) -> Prompt {
        if self.tap_to_record {
            Prompt::TapToRecord
        } else if self.tap_to_resume {
            Prompt::TapToResume
        } else {
            Prompt::RecordingInProgress
        }
    }

    /// Whether the trigger control accepts taps.
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    /// Whether the stop control is shown.
    pub fn stop_visible(&self) -> bool {
        self.stop_visible
    }

    /// Whether "tap to record" is shown.
    pub fn tap_to_record(&self) -> bool {
        self.tap_to_record
    }

    /// Whether "recording in progress" is shown.
    pub fn recording_in_progress(&self) -> bool {
        self.recording_in_progress
    }

    /// Whether "tap to pause" is shown.
    pub fn tap_to_pause(&self) -> bool {
        self.tap_to_pause
    }

    /// Whether "tap to resume" is shown.
    pub fn tap_to_resume(&self) -> bool {
        self.tap_to_resume
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::for_state(SessionState::Idle)
    }
}
