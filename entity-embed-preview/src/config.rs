//! Server configuration.
//!
//! ```toml
//! bind = "127.0.0.1:8080"
//! entities_file = "entities.json"
//! policy_file = "display-policy.toml"
//!
//! [[formats]]
//! id = "full_html"
//! embeds_enabled = true
//!
//! [[entity_types]]
//! id = "node"
//! label = "Content"
//! has_view_builder = true
//! canonical_path = "/node/{id}"
//! ```
//!
//! Relative file paths are resolved against the config file's directory.
//! Without `entity_types` the stock types are used.

use crate::error::ConfigError;
use entity_embed_model::{Entity, EntityTypeInfo, EntityTypeRegistry, InMemoryEntityRepository};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// A text format editors write in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFormat {
    pub id: String,
    /// Whether markers in this format are rendered.
    #[serde(default)]
    pub embeds_enabled: bool,
}

impl TextFormat {
    pub fn new(id: impl Into<String>, embeds_enabled: bool) -> Self {
        Self {
            id: id.into(),
            embeds_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub formats: Vec<TextFormat>,
    #[serde(default)]
    pub entity_types: Vec<EntityTypeInfo>,
    /// JSON array of entities to serve.
    #[serde(default)]
    pub entities_file: Option<PathBuf>,
    /// Display policy TOML; unrestricted when unset.
    #[serde(default)]
    pub policy_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            formats: vec![TextFormat::new("full_html", true)],
            entity_types: Vec::new(),
            entities_file: None,
            policy_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;

        let base = path.parent().unwrap_or(Path::new("."));
        for file in [&mut config.entities_file, &mut config.policy_file]
            .into_iter()
            .flatten()
        {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        info!(path = %path.display(), formats = config.formats.len(), "Loaded server config");
        Ok(config)
    }

    pub fn entity_type_registry(&self) -> EntityTypeRegistry {
        if self.entity_types.is_empty() {
            return EntityTypeRegistry::with_defaults();
        }
        let mut registry = EntityTypeRegistry::new();
        for info in &self.entity_types {
            registry.register(info.clone());
        }
        registry
    }

    /// Reads the seed entities, or an empty repository when none are
    /// configured.
    pub fn load_entities(&self) -> Result<InMemoryEntityRepository, ConfigError> {
        let Some(path) = &self.entities_file else {
            return Ok(InMemoryEntityRepository::new());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let entities: Vec<Entity> = serde_json::from_str(&contents)?;
        info!(count = entities.len(), path = %path.display(), "Loaded seed entities");
        Ok(entities.into_iter().collect())
    }
}
