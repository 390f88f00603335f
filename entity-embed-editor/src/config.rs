//! Editor configuration.
//!
//! ```toml
//! format = "full_html"
//! preview_base_url = "http://127.0.0.1:8080"
//!
//! [[buttons]]
//! id = "node"
//! label = "Node"
//! icon = "/icons/node.svg"
//! ```

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_preview_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// A toolbar button that opens the embed dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedButton {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl EmbedButton {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Text format id, part of preview and dialog URLs.
    pub format: String,
    #[serde(default)]
    pub buttons: Vec<EmbedButton>,
    #[serde(default = "default_preview_base_url")]
    pub preview_base_url: String,
}

impl EditorConfig {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            buttons: Vec::new(),
            preview_base_url: default_preview_base_url(),
        }
    }

    #[must_use]
    pub fn with_button(mut self, button: EmbedButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn button(&self, id: &str) -> Option<&EmbedButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, EditorError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
