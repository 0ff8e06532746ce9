use pitch_recorder_core::CaptureCompletion;

/// Commands delivered to the application loop, processed in order.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// The recording screen became visible.
    Appear,
    /// The trigger control was tapped (start, pause or resume).
    Trigger,
    /// The stop control was tapped.
    Stop,
    /// The capture service finished a recording.
    CaptureCompleted(CaptureCompletion),
    /// Request application shutdown.
    Shutdown,
}
