use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Construction options for a [`crate::CommandOrchestrator`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MixMasterOptions {
    /// Run commands without overlay transitions
    pub disable_transition_effects: bool,

    /// Initial page mods forwarded to the editor (`null` when unset)
    pub page_mods: Value,
}
