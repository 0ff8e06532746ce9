use pitch_recorder_core::IndicatorSet;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Show a new indicator set.
    Render(IndicatorSet),
    /// Show an error until the next render.
    ShowError(String),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
