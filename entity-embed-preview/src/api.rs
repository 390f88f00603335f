use crate::error::PreviewError;
use crate::service::PreviewService;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use entity_embed_model::PreviewResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query string of the preview route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewQuery {
    /// Serialized marker markup.
    pub value: String,
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn preview_handler(
    State(service): State<Arc<PreviewService>>,
    Path(format): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewResponse>, PreviewError> {
    service.render_preview(&format, &query.value).map(Json)
}

async fn displays_handler(
    State(service): State<Arc<PreviewService>>,
    Path((entity_type, id)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, String>>, PreviewError> {
    service.display_options(&entity_type, &id).map(Json)
}

/// Build the HTTP API router over `service`.
pub fn build_router(service: Arc<PreviewService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/embed/preview/{format}", get(preview_handler))
        .route("/entity-embed/displays/{entity_type}/{id}", get(displays_handler))
        .with_state(service)
}
