use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentSource;
use crate::chat::ThemePreference;
use crate::models::{ActionItem, ActionKind};

/// Settings of the chat screen, stored as JSON.
///
/// Missing keys fall back to their defaults, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Seconds after sending during which a message may be recalled.
    pub recall_expiry_secs: u64,
    /// Long-press actions in display order.
    pub message_actions: Vec<ActionConfig>,
    /// Attachment menu entries in display order.
    pub attachment_sources: Vec<AttachmentSource>,
    pub theme: ThemePreference,
    pub history_page_size: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            recall_expiry_secs: 120,
            message_actions: vec![
                ActionConfig::new(ActionKind::Copy, "Copy"),
                ActionConfig::new(ActionKind::Edit, "Edit"),
                ActionConfig::new(ActionKind::Reply, "Reply"),
                ActionConfig::new(ActionKind::Recall, "Recall"),
                ActionConfig::new(ActionKind::Delete, "Delete"),
                ActionConfig::new(ActionKind::Report, "Report"),
            ],
            attachment_sources: vec![
                AttachmentSource::PhotoLibrary,
                AttachmentSource::Camera,
                AttachmentSource::File,
                AttachmentSource::Contact,
            ],
            theme: ThemePreference::default(),
            history_page_size: 20,
        }
    }
}

impl ChatConfig {
    pub fn recall_expiry(&self) -> Duration {
        Duration::from_secs(self.recall_expiry_secs)
    }

    /// Attachment menu in configured order, repeated entries dropped.
    pub fn attachment_menu(&self) -> Vec<AttachmentSource> {
        let mut menu = Vec::with_capacity(self.attachment_sources.len());
        for source in &self.attachment_sources {
            if !menu.contains(source) {
                menu.push(*source);
            }
        }
        menu
    }

    /// Fresh action items for the configured master list.
    pub fn master_actions(&self) -> Vec<ActionItem> {
        self.message_actions
            .iter()
            .map(|action| ActionItem::new(action.tag.clone(), action.label.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub tag: ActionKind,
    pub label: String,
}

impl ActionConfig {
    pub fn new(tag: ActionKind, label: impl Into<String>) -> Self {
        Self {
            tag,
            label: label.into(),
        }
    }
}

/// Loads and persists [`ChatConfig`] in a JSON file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub const PATH_ENV: &'static str = "CHATVIEW_CONFIG";

    /// Create a new ConfigManager. Does not perform I/O.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `CHATVIEW_CONFIG`, or `chatview/config.json` in the user config directory.
    pub fn default_path() -> Result<PathBuf, anyhow::Error> {
        if let Ok(custom_path) = std::env::var(Self::PATH_ENV) {
            let path = PathBuf::from(custom_path);
            if path.is_absolute() {
                return Ok(path);
            }
            tracing::warn!("{} is not an absolute path, using default", Self::PATH_ENV);
        }
        let base_dir = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(anyhow!("Cannot determine config directory"))?;
        Ok(base_dir.join("chatview").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, returning defaults when the file does not exist.
    pub async fn load(&self) -> Result<ChatConfig, anyhow::Error> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(v) => v,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "Config not found, using defaults");
                return Ok(ChatConfig::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read config {}", self.path.display()));
            }
        };
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", self.path.display()))?;
        Ok(config)
    }

    pub async fn save(&self, config: &ChatConfig) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, data)
            .await
            .with_context(|| format!("Failed to write config {}", self.path.display()))?;
        Ok(())
    }

    /// Persist the theme preference in config.
    pub async fn set_theme(&self, theme: ThemePreference) -> Result<(), anyhow::Error> {
        let mut config = self.load().await?;
        config.theme = theme;
        self.save(&config).await
    }
}
