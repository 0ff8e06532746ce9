mod collaborators;
mod controller;
mod state;

pub use {
    collaborators::{CaptureCompletion, CaptureService, Handoff, Presentation},
    controller::RecordingSessionController,
    state::{IndicatorSet, Prompt, SessionState, TriggerAction},
};
