//! Layered resolver configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Host config (~/.config/mpd-inherit/config.toml)
//! 3. Project config (.mpd-inherit.toml or --config)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_host_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig,
    PROJECT_CONFIG_FILE,
};
pub use merge::{deep_merge, merge_layers};
