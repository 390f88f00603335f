use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entity_embed_display::DisplayError;
use entity_embed_model::MarkerError;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("unknown text format: {0}")]
    UnknownFormat(String),

    #[error("text format {0} does not allow embedded entities")]
    EmbedsDisabled(String),

    #[error("malformed marker: {0}")]
    MalformedMarker(String),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error("{entity_type} {reference} not found")]
    EntityNotFound {
        entity_type: String,
        reference: String,
    },

    #[error("display {plugin_id} cannot render {entity_type} entities")]
    InapplicableDisplay {
        plugin_id: String,
        entity_type: String,
    },

    #[error(transparent)]
    Display(#[from] DisplayError),
}

impl PreviewError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownFormat(_) | Self::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            Self::EmbedsDisabled(_) => StatusCode::FORBIDDEN,
            Self::MalformedMarker(_) | Self::Marker(_) => StatusCode::BAD_REQUEST,
            Self::InapplicableDisplay { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Display(DisplayError::InvalidConfiguration { .. }) => StatusCode::BAD_REQUEST,
            Self::Display(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Failures while loading the server configuration or its seed data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid entity seed file: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("display registry: {0}")]
    Registry(#[from] DisplayError),
}
