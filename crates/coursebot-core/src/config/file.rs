//! File-based configuration (YAML)
//!
//! Supports user-level (~/.config/coursebot/config.yaml) and workspace-level
//! (.config/coursebot/config.yaml) files.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_yaml::Value;

use super::error::{ConfigError, ConfigResult};
use super::settings::AssistantConfig;

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/coursebot/config.yaml)
    User,
    /// Workspace-level config (.config/coursebot/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// Reads and writes one YAML config file
///
/// # Example
///
/// ```no_run
/// use coursebot_core::config::FileConfigProvider;
///
/// let user = FileConfigProvider::user();
/// let workspace = FileConfigProvider::workspace("/path/to/workspace");
/// let config = FileConfigProvider::load_layered(&user, Some(&workspace)).unwrap();
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<Value>>,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level config provider
    pub fn user() -> Self {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("coursebot").join("config.yaml"), ConfigLevel::User)
    }

    /// Create a workspace-level config provider
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("coursebot").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Raw YAML document; an absent file is an empty mapping
    fn read_value(&self) -> ConfigResult<Value> {
        if !self.path.exists() {
            return Ok(Value::Mapping(Default::default()));
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Value::Mapping(Default::default()));
        }
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Parse(format!("{} ({}): {}", self.path.display(), self.level.as_str(), e))
        })
    }

    /// Cached raw document
    pub fn value(&self) -> ConfigResult<Value> {
        if let Some(value) = self.cache.read().as_ref() {
            return Ok(value.clone());
        }
        self.reload()
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<Value> {
        let value = self.read_value()?;
        *self.cache.write() = Some(value.clone());
        Ok(value)
    }

    /// This file alone on top of the defaults
    pub fn load(&self) -> ConfigResult<AssistantConfig> {
        serde_yaml::from_value(self.value()?)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", self.path.display(), e)))
    }

    /// Write a full config, creating parent directories
    pub fn save(&self, config: &AssistantConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let value = serde_yaml::to_value(config)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize YAML: {}", e)))?;
        let content = serde_yaml::to_string(&value)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize YAML: {}", e)))?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(value);
        Ok(())
    }

    /// Defaults, then `user`, then `workspace`, then environment overrides.
    ///
    /// The result is validated.
    pub fn load_layered(
        user: &FileConfigProvider,
        workspace: Option<&FileConfigProvider>,
    ) -> ConfigResult<AssistantConfig> {
        let mut merged = user.value()?;
        if let Some(workspace) = workspace {
            merge_yaml(&mut merged, workspace.value()?);
        }

        let mut config: AssistantConfig = serde_yaml::from_value(merged)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, anything else replaces
pub fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);
        assert!(!provider.exists());
        assert_eq!(provider.load().unwrap(), AssistantConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let provider = FileConfigProvider::new(&path, ConfigLevel::User);

        let mut config = AssistantConfig::default();
        config.search.max_results = 8;
        config.system_prompt = Some("Answer briefly.".into());
        provider.save(&config).unwrap();

        assert!(provider.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("max_results: 8"));
        assert!(!content.contains("api_key"));

        provider.reload().unwrap();
        assert_eq!(provider.load().unwrap(), config);
    }

    #[test]
    fn test_workspace_overrides_user() {
        let dir = tempdir().unwrap();
        let user = FileConfigProvider::new(dir.path().join("user.yaml"), ConfigLevel::User);
        fs::write(
            user.path(),
            "model:\n  provider: openai\n  model: gpt-4o\nsearch:\n  max_results: 3\n",
        )
        .unwrap();

        let workspace = FileConfigProvider::workspace(dir.path());
        fs::create_dir_all(workspace.path().parent().unwrap()).unwrap();
        fs::write(workspace.path(), "model:\n  model: gpt-4o-mini\n").unwrap();

        let mut merged = user.value().unwrap();
        merge_yaml(&mut merged, workspace.value().unwrap());
        let config: AssistantConfig = serde_yaml::from_value(merged).unwrap();

        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.model.max_tokens, 800);
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::Workspace);
        fs::write(provider.path(), "model: [unclosed").unwrap();
        assert!(matches!(provider.load(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_layered_validation() {
        let dir = tempdir().unwrap();
        let user = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);
        fs::write(user.path(), "session:\n  max_history: 50\n").unwrap();
        assert!(matches!(
            FileConfigProvider::load_layered(&user, None),
            Err(ConfigError::Invalid(_))
        ));
    }
}
