//! Global hotkeys for the trigger and stop controls.
//!
//! CTRL+SHIFT+Space taps the trigger, CTRL+SHIFT+S taps stop. Presses are
//! forwarded to the application loop as [`AppCommand`]s; the session state
//! machine itself lives in the controller.

use crate::{AppCommand, AppError, AppResult};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// IDs of the registered hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyIds {
    /// Trigger (record/pause/resume).
    pub trigger: u32,
    /// Stop.
    pub stop: u32,
}

/// Forwards global hotkey presses to the application loop.
pub struct HotkeyHandler {
    ids: HotkeyIds,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register CTRL+SHIFT+Space and CTRL+SHIFT+S.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkeys to remain registered.
    #[track_caller]
    #[instrument]
    pub fn register_hotkeys() -> AppResult<(GlobalHotKeyManager, HotkeyIds)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let trigger = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::Space);
        let stop = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyS);

        manager
            .register_all(&[trigger, stop])
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register CTRL+SHIFT+Space / CTRL+SHIFT+S: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            trigger = "CTRL+SHIFT+Space",
            stop = "CTRL+SHIFT+S",
            "Global hotkeys registered"
        );

        Ok((
            manager,
            HotkeyIds {
                trigger: trigger.id(),
                stop: stop.id(),
            },
        ))
    }

    /// Create a handler for previously registered hotkeys.
    pub fn new(ids: HotkeyIds, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { ids, command_tx }
    }

    /// Command for a hotkey event, if it is a press of one of ours.
    pub(crate) fn command_for(&self, id: u32, state: HotKeyState) -> Option<AppCommand> {
        if state != HotKeyState::Pressed {
            return None;
        }
        if id == self.ids.trigger {
            Some(AppCommand::Trigger)
        } else if id == self.ids.stop {
            Some(AppCommand::Stop)
        } else {
            None
        }
    }

    /// Run the hotkey handler event loop until a shutdown signal arrives.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task forwarding hotkey events.
        // Stops once event_rx is dropped and the next blocking_send fails.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if let Some(command) = self.command_for(event.id, event.state) {
                        debug!(command = ?command, "Hotkey pressed");
                        self.command_tx.send(command).await.map_err(|e| {
                            AppError::ChannelSendFailed {
                                message: format!("Failed to send hotkey command: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            }
                        })?;
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may sit in recv() until another hotkey event;
        // it is cleaned up on process exit either way.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }
}
