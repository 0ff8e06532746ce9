use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use pitch_recorder_core::{CapturedRecording, Handoff};
use tracing::{error, info, instrument};

/// Hands finished recordings to the system's default audio player.
pub struct PlaybackHandoff {
    open_in_player: bool,
    last: Option<CapturedRecording>,
}

impl PlaybackHandoff {
    /// Open recordings in the player when `open_in_player` is set; otherwise
    /// only log them.
    pub fn new(open_in_player: bool) -> Self {
        Self {
            open_in_player,
            last: None,
        }
    }

    /// The most recent recording handed off.
    pub fn last(&self) -> Option<&CapturedRecording> {
        self.last.as_ref()
    }

    #[track_caller]
    fn open(recording: &CapturedRecording) -> AppResult<()> {
        open::that(recording.location()).map_err(|e| AppError::PlaybackFailed {
            reason: format!("Failed to open {:?}: {}", recording.location(), e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Handoff for PlaybackHandoff {
    #[instrument(skip(self), fields(title = recording.display_title()))]
    fn transition_to_playback(&mut self, recording: CapturedRecording) {
        info!(location = ?recording.location(), "Recording ready for playback");

        if self.open_in_player {
            if let Err(e) = Self::open(&recording) {
                error!(error = ?e, "Failed to start playback");
            }
        }

        self.last = Some(recording);
    }
}
