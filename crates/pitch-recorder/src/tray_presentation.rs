use crate::TrayCommand;

use pitch_recorder_core::{CaptureError, IndicatorSet, Presentation};
use tao::event_loop::EventLoopProxy;
use tracing::{debug, warn};

/// Presentation layer backed by the tray icon on the main thread.
///
/// Renders are forwarded as [`TrayCommand`]s because `TrayIcon` is `!Send`.
pub struct TrayPresentation {
    proxy: EventLoopProxy<TrayCommand>,
}

impl TrayPresentation {
    /// Forward renders through `proxy`.
    pub fn new(proxy: EventLoopProxy<TrayCommand>) -> Self {
        Self { proxy }
    }

    fn send(&self, command: TrayCommand) {
        if let Err(e) = self.proxy.send_event(command) {
            warn!(error = ?e, "Tray event loop closed, dropping update");
        }
    }
}

impl Presentation for TrayPresentation {
    fn render(&mut self, indicators: IndicatorSet) {
        debug!(prompt = ?indicators.prompt(), stop_visible = indicators.stop_visible(), "Render");
        self.send(TrayCommand::Render(indicators));
    }

    fn report_error(&mut self, error: &CaptureError) {
        self.send(TrayCommand::ShowError(error.to_string()));
    }
}
