//! Error types for display plugins.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("display plugin not found: {0}")]
    PluginNotFound(String),

    #[error("display plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("context '{name}' is not declared by display plugin '{plugin_id}'")]
    UnknownContext { plugin_id: String, name: String },

    #[error("context '{name}' has the wrong kind of value for display plugin '{plugin_id}'")]
    InvalidContext { plugin_id: String, name: String },

    #[error("display plugin '{plugin_id}' needs context '{name}'")]
    MissingContext { plugin_id: String, name: String },

    #[error("invalid configuration for '{plugin_id}': option '{option}' {reason}")]
    InvalidConfiguration {
        plugin_id: String,
        option: String,
        reason: String,
    },

    #[error("render failed: {plugin_id}: {message}")]
    Render { plugin_id: String, message: String },
}
