use crate::config::default_open_in_player;

use serde::{Deserialize, Serialize};

/// Application behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether finished recordings are opened in the system player.
    #[serde(default = "default_open_in_player")]
    pub open_in_player: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            open_in_player: default_open_in_player(),
        }
    }
}
