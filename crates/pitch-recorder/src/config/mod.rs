mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_OPEN_IN_PLAYER: bool = true;

pub(crate) fn default_open_in_player() -> bool {
    DEFAULT_OPEN_IN_PLAYER
}
