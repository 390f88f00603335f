mod common;

use common::*;
use entity_embed_display::{
    DEFAULT_PLUGIN_ID, DisplayError, DisplayPolicy, ENTITY_ID_PLUGIN_ID, ENTITY_VIEW_PLUGIN_ID,
    LABEL_PLUGIN_ID,
};
use entity_embed_model::MarkerError;
use entity_embed_preview::{EmbedRenderRequest, PreviewError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn marker(attributes: &str) -> String {
    format!("<drupal-entity {attributes}></drupal-entity>")
}

// ── render_preview ───────────────────────────────────────────────

#[test]
fn renders_label_by_uuid() {
    let value = marker(&format!(
        r#"data-entity-type="node" data-entity-uuid="{NODE_UUID}" data-entity-embed-display="{LABEL_PLUGIN_ID}" id="entity-embed-0""#
    ));
    let response = service().render_preview("full_html", &value).unwrap();
    assert_eq!(response.html, "<a href=\"/node/1\">Embedded &lt;node&gt;</a>");
    assert_eq!(response.attachments.libraries, vec!["entity_embed/preview"]);
}

#[test]
fn settings_are_applied() {
    let value = marker(&format!(
        r#"data-entity-type="node" data-entity-id="1" data-entity-embed-display="{LABEL_PLUGIN_ID}" data-entity-embed-settings='{{"link":0}}'"#
    ));
    let response = service().render_preview("full_html", &value).unwrap();
    assert_eq!(response.html, "Embedded &lt;node&gt;");
}

#[test]
fn legacy_view_mode_renders_through_default_display() {
    let value = marker(r#"data-entity-type="node" data-entity-id="1" data-view-mode="teaser""#);
    let response = service().render_preview("full_html", &value).unwrap();
    assert!(response.html.contains("view-mode--teaser"));
    assert_eq!(
        response.attachments.libraries,
        vec!["entity_embed/entity_view", "entity_embed/preview"]
    );
}

#[test]
fn display_plugin_wins_over_view_mode() {
    let value = marker(&format!(
        r#"data-entity-type="node" data-entity-id="1" data-view-mode="teaser" data-entity-embed-display="{ENTITY_ID_PLUGIN_ID}""#
    ));
    let response = service().render_preview("full_html", &value).unwrap();
    assert_eq!(response.html, "1");
}

#[test]
fn unknown_format_is_not_found() {
    let value = marker(r#"data-entity-type="node" data-entity-id="1" data-view-mode="full""#);
    let err = service().render_preview("filtered_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::UnknownFormat(_)));
    assert_eq!(err.status().as_u16(), 404);
}

#[test]
fn format_without_embeds_is_forbidden() {
    let value = marker(r#"data-entity-type="node" data-entity-id="1" data-view-mode="full""#);
    let err = service().render_preview("plain_text", &value).unwrap_err();
    assert!(matches!(err, PreviewError::EmbedsDisabled(_)));
    assert_eq!(err.status().as_u16(), 403);
}

#[test]
fn incomplete_marker_is_bad_request() {
    let value = marker(r#"data-entity-id="1" data-view-mode="full""#);
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::Marker(MarkerError::MissingEntityType)));
    assert_eq!(err.status().as_u16(), 400);
}

#[test]
fn invalid_settings_json_is_bad_request() {
    let value = marker(&format!(
        r#"data-entity-type="node" data-entity-id="1" data-entity-embed-display="{LABEL_PLUGIN_ID}" data-entity-embed-settings="{{not json""#
    ));
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::Marker(MarkerError::InvalidSettings(_))));
    assert_eq!(err.status().as_u16(), 400);
}

#[test]
fn invalid_option_value_is_bad_request() {
    let value = marker(r#"data-entity-type="node" data-entity-id="1" data-view-mode="sideways""#);
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(
        err,
        PreviewError::Display(DisplayError::InvalidConfiguration { .. })
    ));
    assert_eq!(err.status().as_u16(), 400);
}

#[test]
fn missing_entity_is_not_found() {
    let value = marker(r#"data-entity-type="node" data-entity-id="404" data-view-mode="full""#);
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::EntityNotFound { .. }));
    assert_eq!(err.status().as_u16(), 404);
}

#[test]
fn uuid_of_other_type_is_not_found() {
    let value = marker(&format!(
        r#"data-entity-type="user" data-entity-uuid="{NODE_UUID}" data-view-mode="full""#
    ));
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::EntityNotFound { .. }));
}

#[test]
fn rendered_entity_is_inapplicable_to_menus() {
    let value = marker(&format!(
        r#"data-entity-type="menu" data-entity-id="main" data-entity-embed-display="{ENTITY_VIEW_PLUGIN_ID}""#
    ));
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::InapplicableDisplay { .. }));
    assert_eq!(err.status().as_u16(), 422);
}

#[test]
fn unknown_plugin_is_inapplicable() {
    let value = marker(r#"data-entity-type="node" data-entity-id="1" data-entity-embed-display="nope""#);
    let err = service().render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::InapplicableDisplay { plugin_id, .. } if plugin_id == "nope"));
}

#[test]
fn policy_denied_plugin_is_inapplicable() {
    let service = service_with_policy(DisplayPolicy::denylist([LABEL_PLUGIN_ID]));
    let value = marker(&format!(
        r#"data-entity-type="node" data-entity-id="1" data-entity-embed-display="{LABEL_PLUGIN_ID}""#
    ));
    let err = service.render_preview("full_html", &value).unwrap_err();
    assert!(matches!(err, PreviewError::InapplicableDisplay { .. }));
}

#[test]
fn fragment_without_marker_is_bad_request() {
    let err = service().render_preview("full_html", "<p>hello</p>").unwrap_err();
    assert!(matches!(err, PreviewError::MalformedMarker(_)));
    assert_eq!(err.status().as_u16(), 400);
}

// ── render_embed / display_options ───────────────────────────────

#[test]
fn render_embed_defaults_to_full_view() {
    let response = service().render_embed(&EmbedRenderRequest::new("node", "1")).unwrap();
    assert!(response.html.contains("view-mode--full"));
    assert!(response.html.contains("Body text"));
}

#[test]
fn render_embed_with_label_display() {
    let settings = json!({"link": false}).as_object().cloned().unwrap();
    let request = EmbedRenderRequest::new("user", "3").with_display(LABEL_PLUGIN_ID, settings);
    assert_eq!(service().render_embed(&request).unwrap().html, "Jane");
}

#[test]
fn display_options_depend_on_entity_type() {
    let service = service();
    let node = service.display_options("node", "1").unwrap();
    assert_eq!(
        node.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![DEFAULT_PLUGIN_ID, ENTITY_ID_PLUGIN_ID, ENTITY_VIEW_PLUGIN_ID, LABEL_PLUGIN_ID]
    );

    let menu = service.display_options("menu", "main").unwrap();
    assert_eq!(
        menu.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![ENTITY_ID_PLUGIN_ID, LABEL_PLUGIN_ID]
    );

    assert!(matches!(
        service.display_options("menu", "footer"),
        Err(PreviewError::EntityNotFound { .. })
    ));
}
