use crate::{AppCommand, AppResult, PlaybackHandoff, TrayCommand, TrayPresentation};

use std::sync::mpsc as std_mpsc;

use pitch_recorder_core::{CaptureCompletion, RecordingSessionController, WavCapture};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument};
use tray_icon::menu::{MenuEvent, MenuId};

pub(crate) type SessionController =
    RecordingSessionController<WavCapture, TrayPresentation, PlaybackHandoff>;

/// Main application state.
///
/// Runs on the async runtime thread and owns the session controller. Every
/// input (tray menu, hotkeys, capture completions) is funnelled into
/// `command_rx` so the controller sees events strictly in order.
pub struct App {
    pub(crate) controller: SessionController,
    pub(crate) completion_rx: Option<std_mpsc::Receiver<CaptureCompletion>>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: MenuIds,
}

/// IDs of the tray menu items the app reacts to.
#[derive(Debug, Clone)]
pub struct MenuIds {
    /// Trigger (record/pause/resume).
    pub trigger: MenuId,
    /// Stop.
    pub stop: MenuId,
    /// Exit.
    pub exit: MenuId,
}

impl MenuIds {
    /// Command for a menu click, if the item is one of ours.
    pub(crate) fn command_for(&self, id: &MenuId) -> Option<AppCommand> {
        if *id == self.trigger {
            Some(AppCommand::Trigger)
        } else if *id == self.stop {
            Some(AppCommand::Stop)
        } else if *id == self.exit {
            Some(AppCommand::Shutdown)
        } else {
            None
        }
    }
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Pitch-Recorder starting");

        // MenuEvent::receiver() is a crossbeam receiver with blocking recv();
        // one blocking task forwards clicks as commands until command_rx is
        // dropped.
        let menu_tx = self.command_tx.clone();
        let menu_ids = self.menu_ids.clone();
        let menu_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if let Some(command) = menu_ids.command_for(&event.id) {
                    if menu_tx.blocking_send(command).is_err() {
                        break;
                    }
                }
            }
        });

        // Capture completions arrive on a std channel from the capture
        // service and may land after later commands; the controller matches
        // each one to its capture by file location.
        let completion_rx = self.completion_rx.take();
        let completion_tx = self.command_tx.clone();
        let completion_handle = tokio::task::spawn_blocking(move || {
            let Some(completion_rx) = completion_rx else {
                return;
            };
            while let Ok(completion) = completion_rx.recv() {
                if completion_tx
                    .blocking_send(AppCommand::CaptureCompleted(completion))
                    .is_err()
                {
                    break;
                }
            }
        });

        if let Err(e) = self.command_tx.send(AppCommand::Appear).await {
            error!(error = ?e, "Failed to queue initial appearance");
        }

        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, AppCommand::Shutdown) {
                info!("Shutdown requested");
                break;
            }
            if let Err(e) = self.handle_command(cmd) {
                error!(error = ?e, "Command failed");
            }
        }

        self.shutdown(menu_handle, completion_handle).await;

        Ok(())
    }

    /// Apply one command to the session controller.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Appear => self.controller.on_view_will_appear(),
            AppCommand::Trigger => {
                self.controller.on_trigger_tapped()?;
            }
            AppCommand::Stop => self.controller.on_stop_tapped()?,
            AppCommand::CaptureCompleted(completion) => {
                self.controller.on_capture_completed(completion)?
            }
            AppCommand::Shutdown => {}
        }
        Ok(())
    }

    async fn shutdown(
        mut self,
        menu_handle: tokio::task::JoinHandle<()>,
        completion_handle: tokio::task::JoinHandle<()>,
    ) {
        if self.controller.state().is_active() {
            info!("Stopping active recording before exit");
            if let Err(e) = self.controller.on_stop_tapped() {
                error!(error = ?e, "Failed to stop recording on exit");
            }
        }

        if let Some(recording) = self.controller.handoff().last() {
            info!(title = recording.display_title(), "Last recording of this run");
        }

        drop(self.controller);
        drop(self.command_rx);

        for (name, handle) in [("Menu", menu_handle), ("Completion", completion_handle)] {
            match tokio::time::timeout(std::time::Duration::from_secs(1), handle).await {
                Ok(Ok(())) => info!(forwarder = name, "Event forwarder stopped cleanly"),
                Ok(Err(e)) => error!(forwarder = name, error = ?e, "Event forwarder task panicked"),
                Err(_) => info!(
                    forwarder = name,
                    "Event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
                ),
            }
        }

        let _ = self.shutdown_tx.send(true);
        let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
        info!("Pitch-Recorder shut down successfully");
    }
}
