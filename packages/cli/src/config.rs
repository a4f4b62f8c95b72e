use anyhow::Context;
use remix_editor::MixMasterOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "remix.config.json";

/// Remix configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where the external editor is loaded from
    #[serde(default = "default_dialog_url")]
    pub dialog_url: String,

    #[serde(default)]
    pub disable_transition_effects: bool,

    /// Send the whole page to the editor instead of the element alone
    #[serde(default)]
    pub send_full_document: bool,

    /// Base URI reported to the editor (defaults to the page's file URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,

    /// Opaque mods forwarded to the editor
    #[serde(default)]
    pub page_mods: Value,

    #[serde(default = "default_max_undo_levels")]
    pub max_undo_levels: usize,

    /// Localized string overrides, by key
    #[serde(default)]
    pub strings: HashMap<String, String>,
}

fn default_dialog_url() -> String {
    "about:blank".to_string()
}

fn default_max_undo_levels() -> usize {
    100
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn mix_master_options(&self) -> MixMasterOptions {
        MixMasterOptions {
            disable_transition_effects: self.disable_transition_effects,
            page_mods: self.page_mods.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialog_url: default_dialog_url(),
            disable_transition_effects: false,
            send_full_document: false,
            base_uri: None,
            page_mods: Value::Null,
            max_undo_levels: default_max_undo_levels(),
            strings: HashMap::new(),
        }
    }
}
