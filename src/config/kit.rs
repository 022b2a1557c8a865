//! Asset kit descriptor (`kit.yaml`)
//!
//! ```yaml
//! name: example-kit
//! version: 1.2.0
//! structured:
//!   - settings.json
//! ```
//!
//! `structured` lists group-relative paths that are merged into an existing
//! file instead of being copied over it.

use serde::{Deserialize, Serialize};

/// File name of the descriptor at the root of a kit
pub const KIT_FILE: &str = "kit.yaml";

fn default_structured() -> Vec<String> {
    vec!["settings.json".to_string()]
}

/// Kit metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitDescriptor {
    pub name: String,
    pub version: String,
    #[serde(default = "default_structured")]
    pub structured: Vec<String>,
}

impl KitDescriptor {
    /// Descriptor used when a kit has no `kit.yaml`
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            structured: default_structured(),
        }
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Whether a group-relative path is merged rather than copied
    pub fn is_structured(&self, relative_path: &str) -> bool {
        self.structured.iter().any(|p| p == relative_path)
    }
}
