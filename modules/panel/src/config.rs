use serde::{Deserialize, Serialize};

/// Configuration for the panel module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    /// Base URL of the remote seed service.
    #[serde(default = "default_seed_base_url")]
    pub seed_base_url: String,
    /// Store directory; a relative path resolves under the home dir.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            seed_base_url: default_seed_base_url(),
            storage_dir: default_storage_dir(),
        }
    }
}

fn default_seed_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_storage_dir() -> String {
    "store".to_string()
}
