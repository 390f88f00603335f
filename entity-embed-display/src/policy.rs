//! Site policy over display plugins, read from a TOML file listing which
//! plugins editors may use.
//!
//! ```toml
//! mode = "denylist"
//! plugin_ids = ["entity_reference:entity_reference_entity_id"]
//! ```
//!
//! An entry of the form `group:*` matches every plugin in that group.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// How `plugin_ids` is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Only listed plugins are offered.
    Allowlist,
    /// All plugins except listed ones are offered.
    Denylist,
    /// No restrictions.
    #[default]
    Unrestricted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPolicy {
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub plugin_ids: Vec<String>,
}

impl DisplayPolicy {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn allowlist<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: PolicyMode::Allowlist,
            plugin_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn denylist<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: PolicyMode::Denylist,
            plugin_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a policy from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads a policy from `path`. A missing file means unrestricted; an
    /// unreadable or malformed one falls back to unrestricted with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No display policy at {:?}, running unrestricted", path);
            return Self::unrestricted();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(policy) => {
                    info!(mode = ?policy.mode, "Loaded display policy from {:?}", path);
                    policy
                }
                Err(e) => {
                    warn!(
                        "Failed to parse display policy {:?}: {}. Falling back to unrestricted mode.",
                        path, e
                    );
                    Self::unrestricted()
                }
            },
            Err(e) => {
                warn!("Failed to read display policy {:?}: {}", path, e);
                Self::unrestricted()
            }
        }
    }

    fn listed(&self, plugin_id: &str) -> bool {
        self.plugin_ids.iter().any(|entry| match entry.strip_suffix(":*") {
            Some(group) => plugin_id
                .split_once(':')
                .is_some_and(|(plugin_group, _)| plugin_group == group),
            None => entry == plugin_id,
        })
    }

    /// Whether editors may use `plugin_id`.
    pub fn is_allowed(&self, plugin_id: &str) -> bool {
        match self.mode {
            PolicyMode::Unrestricted => true,
            PolicyMode::Allowlist => self.listed(plugin_id),
            PolicyMode::Denylist => !self.listed(plugin_id),
        }
    }
}
