use crate::{
    CaptureCompletion, CaptureError, CaptureService, CapturedRecording, CoreResult, Handoff,
    IndicatorSet, Presentation, RecordingStorage, SessionState, TriggerAction,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

type Clock = Box<dyn Fn() -> NaiveDateTime + Send>;

/// A started capture: its log correlation id and the file it writes.
#[derive(Debug, Clone)]
struct SessionRecord {
    session_id: Uuid,
    location: PathBuf,
}

/// Drives the record/pause/resume/stop state machine.
///
/// Owns the session state and forwards each transition to the capture
/// service, the presentation and, once a capture completes, the hand-off.
/// Every failure is reported to the presentation, logged and returned;
/// the session then falls back to Idle.
///
/// Completions are matched to captures by file location, so a completion
/// for an earlier capture never disturbs the one currently running.
///
/// Not thread-safe: own it from a single task and feed it events in order.
pub struct RecordingSessionController<C, P, H> {
    capture: C,
    presentation: P,
    handoff: H,
    storage: RecordingStorage,
    clock: Clock,
    state: SessionState,
    is_first_recording: bool,
    active: Option<SessionRecord>,
    /// Captures stopped but whose completion has not arrived yet.
    stopped: Vec<SessionRecord>,
}

impl<C, P, H> RecordingSessionController<C, P, H>
where
    C: CaptureService,
    P: Presentation,
    H: Handoff,
{
    /// Create a controller in Idle. Nothing is rendered until
    /// [`on_view_will_appear`](Self::on_view_will_appear).
    pub fn new(capture: C, presentation: P, handoff: H, storage: RecordingStorage) -> Self {
        Self {
            capture,
            presentation,
            handoff,
            storage,
            clock: Box::new(|| Local::now().naive_local()),
            state: SessionState::Idle,
            is_first_recording: true,
            active: None,
            stopped: Vec::new(),
        }
    }

    /// Replace the clock used to name recording files.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True until a capture has been started since the last reset.
    pub fn is_first_recording(&self) -> bool {
        self.is_first_recording
    }

    /// File the running capture writes to, if any.
    pub fn active_location(&self) -> Option<&Path> {
        self.active.as_ref().map(|s| s.location.as_path())
    }

    /// The capture service.
    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// The presentation layer.
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// The hand-off collaborator.
    pub fn handoff(&self) -> &H {
        &self.handoff
    }

    /// Reset to Idle defaults when the screen becomes visible.
    #[instrument(skip(self))]
    pub fn on_view_will_appear(&mut self) {
        if self.active.is_some() {
            warn!("Screen reappeared with a capture running, closing it");
            if let Err(e) = self.close_capture() {
                warn!(error = ?e, "Failed to close capture on appearance");
            }
        }
        self.reset();
        debug!("Session reset for appearance");
    }

    /// Start, pause or resume depending on the current state.
    ///
    /// Makes one capture call and one render on success. A failed start
    /// resets to Idle; a failed pause or resume also stops and closes the
    /// capture so nothing keeps recording behind an Idle session.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn on_trigger_tapped(&mut self) -> CoreResult<SessionState> {
        let action = self.state.trigger_action();

        let result = match action {
            TriggerAction::Start => {
                let location = self.storage.path_for((self.clock)());
                let result = self.capture.start(&location);
                if result.is_ok() {
                    let session_id = Uuid::new_v4();
                    info!(session_id = %session_id, location = ?location, "Recording started");
                    self.active = Some(SessionRecord {
                        session_id,
                        location,
                    });
                    self.is_first_recording = false;
                }
                result
            }
            TriggerAction::Pause => self.capture.pause(),
            TriggerAction::Resume => self.capture.resume(),
        };

        match result {
            Ok(()) => {
                self.state = action.next_state();
                self.presentation.render(IndicatorSet::for_state(self.state));
                debug!(session_id = ?self.session_id(), action = ?action, state = ?self.state, "Trigger handled");
                Ok(self.state)
            }
            Err(e) => {
                error!(session_id = ?self.session_id(), action = ?action, error = ?e, "Trigger failed");
                if self.active.is_some() {
                    if let Err(close_err) = self.close_capture() {
                        warn!(error = ?close_err, "Failed to close capture after trigger failure");
                    }
                }
                self.reset();
                self.presentation.report_error(&e);
                Err(e)
            }
        }
    }

    /// Stop the capture, close the session and return to Idle.
    ///
    /// Ignored in Idle. Stop and deactivation failures never keep the
    /// session out of Idle; the first one is reported and returned.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn on_stop_tapped(&mut self) -> CoreResult<()> {
        if !self.state.is_active() {
            debug!("Stop tapped while idle, ignoring");
            return Ok(());
        }

        let session_id = self.session_id();
        let outcome = self.close_capture();
        self.reset();

        match outcome {
            Ok(()) => {
                info!(session_id = ?session_id, "Recording stopped");
                Ok(())
            }
            Err(e) => {
                self.presentation.report_error(&e);
                Err(e)
            }
        }
    }

    /// Hand a successful capture to playback, or report the failure.
    ///
    /// A completion for the running capture (or arriving while Idle) ends
    /// the session in Idle. A completion for an earlier capture while a new
    /// one runs is handled without touching the running session.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn on_capture_completed(&mut self, completion: CaptureCompletion) -> CoreResult<()> {
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|s| s.location == completion.location);

        let session_id = if is_current {
            self.active.take().map(|s| s.session_id)
        } else {
            self.take_stopped(&completion.location)
        };

        if is_current || !self.state.is_active() {
            self.reset();
        } else {
            debug!(session_id = ?session_id, "Completion for an earlier capture, session kept");
        }

        if completion.success {
            let recording = CapturedRecording::from_location(completion.location);
            info!(
                session_id = ?session_id,
                title = recording.display_title(),
                "Capture completed, handing off to playback"
            );
            self.handoff.transition_to_playback(recording);
            Ok(())
        } else {
            let e = CaptureError::CaptureUnsuccessful {
                path: completion.location,
                location: ErrorLocation::from(Location::caller()),
            };
            error!(session_id = ?session_id, error = ?e, "Capture completed unsuccessfully");
            self.presentation.report_error(&e);
            Err(e)
        }
    }

    fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|s| s.session_id)
    }

    /// Stop and deactivate the capture; deactivation runs even if stop
    /// failed. The running session is kept for its completion.
    fn close_capture(&mut self) -> CoreResult<()> {
        let session_id = self.session_id();
        let stopped = self.capture.stop();
        let deactivated = self.capture.deactivate_session();
        self.retire_active();

        if let Err(e) = &stopped {
            error!(session_id = ?session_id, error = ?e, "Failed to stop capture");
        }
        if let Err(e) = &deactivated {
            warn!(session_id = ?session_id, error = ?e, "Failed to deactivate capture session");
        }

        stopped.and(deactivated)
    }

    fn retire_active(&mut self) {
        if let Some(record) = self.active.take() {
            self.stopped.push(record);
        }
    }

    fn take_stopped(&mut self, location: &Path) -> Option<Uuid> {
        let index = self.stopped.iter().position(|s| s.location == location)?;
        Some(self.stopped.remove(index).session_id)
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.is_first_recording = true;
        self.presentation.render(IndicatorSet::for_state(self.state));
    }
}
