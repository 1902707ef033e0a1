//! Configuration
//!
//! Settings live in YAML files at two levels:
//! - user: `~/.config/coursebot/config.yaml` (platform config dir)
//! - workspace: `<root>/.config/coursebot/config.yaml`
//!
//! Workspace values override user values, which override defaults.
//! `COURSEBOT_PROVIDER` and `COURSEBOT_MODEL` override both.

mod error;
mod settings;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use settings::{
    AssistantConfig, ModelSettings, SearchSettings, SessionSettings, ENV_MODEL, ENV_PROVIDER,
};
pub use file::{merge_yaml, ConfigLevel, FileConfigProvider};
