use entity_embed_model::{Entity, EntityTypeInfo, EntityTypeRegistry};
use pretty_assertions::assert_eq;
use serde_json::json;

fn make_node() -> Entity {
    Entity::new("node", "1", "Embedded node")
        .with_uuid("7c9e6679-7425-40de-944b-e07fc1f90ae7")
        .with_bundle("page")
        .with_data(json!({"body": "Body text", "promoted": true, "weight": 3}))
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_generates_distinct_uuids() {
    let a = Entity::new("node", "1", "A");
    let b = Entity::new("node", "2", "B");
    assert_ne!(a.uuid, b.uuid);
    assert!(uuid::Uuid::parse_str(&a.uuid).is_ok());
}

#[test]
fn new_defaults_bundle_to_entity_type() {
    let e = Entity::new("user", "5", "admin");
    assert_eq!(e.bundle, "user");
    assert_eq!(e.data, json!({}));
}

// ── Payload fields ───────────────────────────────────────────────

#[test]
fn field_reads_top_level_payload() {
    let e = make_node();
    assert_eq!(e.field("body"), Some(&json!("Body text")));
    assert_eq!(e.field("weight"), Some(&json!(3)));
    assert_eq!(e.field("missing"), None);
}

#[test]
fn null_field_reads_as_absent() {
    let e = make_node().with_data(json!({"body": null}));
    assert_eq!(e.field("body"), None);
}

// ── URLs ─────────────────────────────────────────────────────────

#[test]
fn url_uses_canonical_path_template() {
    let types = EntityTypeRegistry::with_defaults();
    assert_eq!(make_node().url(&types).as_deref(), Some("/node/1"));
}

#[test]
fn url_is_none_for_unknown_type() {
    let types = EntityTypeRegistry::with_defaults();
    let e = Entity::new("widget", "9", "Widget");
    assert_eq!(e.url(&types), None);
}

// ── Entity type registry ─────────────────────────────────────────

#[test]
fn defaults_mark_menu_as_not_viewable() {
    let types = EntityTypeRegistry::with_defaults();
    assert!(types.has_view_builder("node"));
    assert!(types.has_view_builder("user"));
    assert!(!types.has_view_builder("menu"));
    assert!(!types.has_view_builder("unknown"));
}

#[test]
fn register_replaces_existing_type() {
    let mut types = EntityTypeRegistry::with_defaults();
    types.register(EntityTypeInfo::new("menu", "Menu").with_view_builder());
    assert!(types.has_view_builder("menu"));
}

#[test]
fn registry_deserializes_from_map() {
    let types: EntityTypeRegistry = serde_json::from_value(json!({
        "block": {"id": "block", "label": "Block", "has_view_builder": true}
    }))
    .unwrap();
    assert!(types.contains("block"));
    assert!(types.has_view_builder("block"));
    assert_eq!(types.get("block").unwrap().canonical_path, None);
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn entity_deserializes_without_data() {
    let e: Entity = serde_json::from_value(json!({
        "id": "3",
        "uuid": "u-3",
        "entity_type": "node",
        "bundle": "article",
        "label": "Third"
    }))
    .unwrap();
    assert_eq!(e.data, serde_json::Value::Null);
    assert_eq!(e.bundle, "article");
}
