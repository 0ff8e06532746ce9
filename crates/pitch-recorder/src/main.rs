//! Pitch-Recorder: tray-driven audio recorder with record/pause/resume/stop
//! and hand-off to playback.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod playback_handoff;
mod tray_command;
mod tray_icon_state;
mod tray_manager;
mod tray_presentation;

pub(crate) use {
    app::{App, MenuIds},
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::{HotkeyHandler, HotkeyIds},
    playback_handoff::PlaybackHandoff,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
    tray_presentation::TrayPresentation,
};

use crate::config::Config;

use global_hotkey::GlobalHotKeyManager;
use pitch_recorder_core::{RecordingSessionController, WavCapture};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pitch_recorder=debug,pitch_recorder_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations; dropping it unregisters the hotkeys.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                let result = match cmd {
                    TrayCommand::Render(indicators) => tray_manager.render(indicators),
                    TrayCommand::ShowError(message) => tray_manager.show_error(&message),
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    error!(error = ?e, "Failed to update tray icon");
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Register hotkeys on the main thread; tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let (manager, hotkey_ids) = match HotkeyHandler::register_hotkeys() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let menu_ids = MenuIds {
                    trigger: tray_manager.trigger_item_id().clone(),
                    stop: tray_manager.stop_item_id().clone(),
                    exit: tray_manager.exit_item_id().clone(),
                };
                let tray_proxy = tray_proxy.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let (command_tx, command_rx) = mpsc::channel(32);
                        let (shutdown_tx, shutdown_rx) = watch::channel(false);
                        let (completion_tx, completion_rx) = std::sync::mpsc::channel();

                        let controller = RecordingSessionController::new(
                            WavCapture::new(config.audio.selected_device.clone(), completion_tx),
                            TrayPresentation::new(tray_proxy.clone()),
                            PlaybackHandoff::new(config.behaviour.open_in_player),
                            config.recording_storage(),
                        );

                        let hotkey_handler = HotkeyHandler::new(hotkey_ids, command_tx.clone());

                        let app = App {
                            controller,
                            completion_rx: Some(completion_rx),
                            tray_proxy,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
