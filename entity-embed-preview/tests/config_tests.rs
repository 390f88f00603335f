use entity_embed_preview::{ConfigError, PreviewService, ServerConfig, TextFormat};
use pretty_assertions::assert_eq;
use std::fs;

const SEED: &str = r#"[
    {"id": "1", "uuid": "u-1", "entity_type": "node", "bundle": "page", "label": "About", "data": {"body": "Hi"}},
    {"id": "7", "uuid": "u-7", "entity_type": "user", "bundle": "user", "label": "Sam"}
]"#;

#[test]
fn defaults_without_file() {
    let config = ServerConfig::default();
    assert_eq!(config.bind, "127.0.0.1:8080");
    assert_eq!(config.formats, vec![TextFormat::new("full_html", true)]);
    assert!(config.entity_type_registry().has_view_builder("node"));
}

#[test]
fn loads_config_with_relative_seed_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("entities.json"), SEED).unwrap();
    fs::write(
        dir.path().join("policy.toml"),
        "mode = \"denylist\"\nplugin_ids = [\"entity_reference:entity_reference_entity_id\"]\n",
    )
    .unwrap();
    let config_path = dir.path().join("preview.toml");
    fs::write(
        &config_path,
        r#"
bind = "0.0.0.0:9000"
entities_file = "entities.json"
policy_file = "policy.toml"

[[formats]]
id = "basic_html"
embeds_enabled = true

[[formats]]
id = "plain_text"
"#,
    )
    .unwrap();

    let config = ServerConfig::load(&config_path).unwrap();
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.entities_file, Some(dir.path().join("entities.json")));
    assert_eq!(config.formats[1], TextFormat::new("plain_text", false));

    let service = PreviewService::from_config(&config).unwrap();
    let options = service.display_options("node", "1").unwrap();
    assert!(options.contains_key("entity_reference:entity_reference_label"));
    assert!(!options.contains_key("entity_reference:entity_reference_entity_id"));
    assert_eq!(service.display_options("user", "7").unwrap().len(), 3);
}

#[test]
fn custom_entity_types_replace_defaults() {
    let config = ServerConfig::from_toml_str(
        r#"
[[entity_types]]
id = "media"
label = "Media"
has_view_builder = true
canonical_path = "/media/{id}"
"#,
    )
    .unwrap();
    let registry = config.entity_type_registry();
    assert!(registry.has_view_builder("media"));
    assert!(!registry.contains("node"));
}

#[test]
fn missing_seed_file_is_an_error() {
    let config = ServerConfig {
        entities_file: Some("/definitely/not/here.json".into()),
        ..ServerConfig::default()
    };
    assert!(matches!(
        PreviewService::from_config(&config),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn malformed_seed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entities.json");
    fs::write(&path, "{not a list").unwrap();
    let config = ServerConfig {
        entities_file: Some(path),
        ..ServerConfig::default()
    };
    assert!(matches!(config.load_entities(), Err(ConfigError::Seed(_))));
}
