//! System tray icon acting as the recording screen.
//!
//! The icon colour and tooltip follow the session prompt. The menu carries a
//! status line, the trigger control, the stop control and Exit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use pitch_recorder_core::IndicatorSet;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

pub(crate) const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    status_item: MenuItem,
    trigger_item: MenuItem,
    stop_item: MenuItem,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a tray icon showing the Idle indicators.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let idle = IndicatorSet::default();
        let idle_state = TrayIconState::from(idle.prompt());

        let menu = Menu::new();

        let status_item = MenuItem::new(idle.prompt().label(), false, None);
        let trigger_item = MenuItem::new(idle_state.trigger_label(), idle.trigger_enabled(), None);
        let stop_item = MenuItem::new("Stop", idle.stop_visible(), None);
        let exit_item = MenuItem::new("Exit", true, None);

        let exit_id = exit_item.id().clone();

        menu.append_items(&[
            &status_item,
            &PredefinedMenuItem::separator(),
            &trigger_item,
            &stop_item,
            &PredefinedMenuItem::separator(),
            &exit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(Self::tooltip(&idle))
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(idle_state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            status_item,
            trigger_item,
            stop_item,
            exit_item_id: exit_id,
        })
    }

    /// Show exactly the given indicator set.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn render(&mut self, indicators: IndicatorSet) -> AppResult<()> {
        let state = TrayIconState::from(indicators.prompt());

        self.status_item.set_text(indicators.prompt().label());
        self.trigger_item.set_text(state.trigger_label());
        self.trigger_item.set_enabled(indicators.trigger_enabled());
        self.stop_item.set_enabled(indicators.stop_visible());

        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.set_tooltip(&Self::tooltip(&indicators))
    }

    /// Show an error in the tooltip until the next render.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn show_error(&mut self, message: &str) -> AppResult<()> {
        self.set_tooltip(&format!("Pitch-Recorder - Error: {}", message))
    }

    #[track_caller]
    fn set_tooltip(&mut self, tooltip: &str) -> AppResult<()> {
        self.tray_icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub(crate) fn tooltip(indicators: &IndicatorSet) -> String {
        format!("Pitch-Recorder - {}", indicators.prompt().label())
    }

    /// Draw a filled status dot in the state's colour.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_rgba(state);

        Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get the trigger menu item ID.
    pub fn trigger_item_id(&self) -> &MenuId {
        self.trigger_item.id()
    }

    /// Get the stop menu item ID.
    pub fn stop_item_id(&self) -> &MenuId {
        self.stop_item.id()
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}

/// RGBA pixels of a `ICON_SIZE` square with a centred dot, transparent outside.
pub(crate) fn icon_rgba(state: TrayIconState) -> Vec<u8> {
    let color = state.color();
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 2.0;

    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            if dx * dx + dy * dy <= radius * radius {
                rgba.extend_from_slice(&color);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    rgba
}
