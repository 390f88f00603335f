#![allow(dead_code)]

use entity_embed_display::{DisplayPluginManager, DisplayPolicy, DisplayServices};
use entity_embed_model::{Entity, EntityTypeRegistry, InMemoryEntityRepository};
use entity_embed_preview::{PreviewService, TextFormat, build_router};
use serde_json::json;
use std::sync::Arc;

pub const NODE_UUID: &str = "5f1c6a0e-0d3e-4c55-9a7b-2b1f0f5e9a11";

pub fn entities() -> InMemoryEntityRepository {
    [
        Entity::new("node", "1", "Embedded <node>")
            .with_uuid(NODE_UUID)
            .with_bundle("article")
            .with_data(json!({"body": "Body text"})),
        Entity::new("user", "3", "Jane"),
        Entity::new("menu", "main", "Main navigation"),
    ]
    .into_iter()
    .collect()
}

pub fn service_with_policy(policy: DisplayPolicy) -> PreviewService {
    let displays = DisplayPluginManager::builder()
        .services(DisplayServices::new(Arc::new(EntityTypeRegistry::with_defaults())))
        .policy(policy)
        .register_builtins()
        .unwrap()
        .build();
    PreviewService::new(
        [
            TextFormat::new("full_html", true),
            TextFormat::new("plain_text", false),
        ],
        Arc::new(entities()),
        Arc::new(displays),
    )
}

pub fn service() -> PreviewService {
    service_with_policy(DisplayPolicy::unrestricted())
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
pub async fn spawn_test_server() -> String {
    let app = build_router(Arc::new(service()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}
