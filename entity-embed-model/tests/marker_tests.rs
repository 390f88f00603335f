use entity_embed_model::{
    ATTR_DISPLAY, ATTR_DISPLAY_SETTINGS, ATTR_EMBED_BUTTON, ATTR_ENTITY_ID, ATTR_ENTITY_TYPE,
    ATTR_ENTITY_UUID, ATTR_VIEW_MODE, AttributeMap, DisplaySelector, EmbedAttributes, EntityRef,
    MarkerError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn minimal_marker_with_id_and_display() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "default"),
    ]))
    .unwrap();
    assert_eq!(a.entity_type, "node");
    assert_eq!(a.entity, EntityRef::Id("1".into()));
    assert_eq!(a.display, DisplaySelector::Plugin("default".into()));
    assert!(!a.is_editable());
}

#[test]
fn legacy_view_mode_is_accepted() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_UUID, "abc"),
        (ATTR_VIEW_MODE, "teaser"),
        (ATTR_EMBED_BUTTON, "node"),
    ]))
    .unwrap();
    assert_eq!(a.entity, EntityRef::Uuid("abc".into()));
    assert_eq!(a.display, DisplaySelector::ViewMode("teaser".into()));
    assert!(a.is_editable());
}

#[test]
fn missing_entity_type_is_rejected() {
    let err = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "default"),
    ]))
    .unwrap_err();
    assert!(matches!(err, MarkerError::MissingEntityType));
}

#[test]
fn missing_reference_is_rejected() {
    let err = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_DISPLAY, "default"),
    ]))
    .unwrap_err();
    assert!(matches!(err, MarkerError::MissingEntityReference));
}

#[test]
fn missing_display_is_rejected() {
    let err = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
    ]))
    .unwrap_err();
    assert!(matches!(err, MarkerError::MissingDisplay));
}

#[test]
fn empty_values_count_as_present() {
    let map = attrs(&[(ATTR_ENTITY_TYPE, ""), (ATTR_ENTITY_ID, ""), (ATTR_VIEW_MODE, "")]);
    assert!(EmbedAttributes::is_marker(&map));
    assert!(EmbedAttributes::from_attributes(&map).is_ok());
}

#[test]
fn uuid_and_plugin_win_when_both_forms_present() {
    let map = attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_ENTITY_UUID, "abc"),
        (ATTR_VIEW_MODE, "full"),
        (ATTR_DISPLAY, "entity_reference:entity_reference_label"),
    ]);
    let a = EmbedAttributes::from_attributes(&map).unwrap();
    assert_eq!(a.entity, EntityRef::Uuid("abc".into()));
    assert_eq!(
        a.display,
        DisplaySelector::Plugin("entity_reference:entity_reference_label".into())
    );
    assert_eq!(a.to_attributes(), map);
}

// ── Settings ─────────────────────────────────────────────────────

#[test]
fn settings_parse_as_object() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "entity_reference:entity_reference_label"),
        (ATTR_DISPLAY_SETTINGS, r#"{"link":1}"#),
    ]))
    .unwrap();
    let settings = a.display_settings().unwrap();
    assert_eq!(settings.get("link"), Some(&json!(1)));
}

#[test]
fn blank_settings_are_empty() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "default"),
        (ATTR_DISPLAY_SETTINGS, "  "),
    ]))
    .unwrap();
    assert!(a.display_settings().unwrap().is_empty());
}

#[test]
fn non_object_settings_are_rejected() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "default"),
        (ATTR_DISPLAY_SETTINGS, "[1,2]"),
    ]))
    .unwrap();
    assert!(matches!(a.display_settings(), Err(MarkerError::SettingsNotObject)));
}

#[test]
fn malformed_settings_are_rejected() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_DISPLAY, "default"),
        (ATTR_DISPLAY_SETTINGS, "{link"),
    ]))
    .unwrap();
    assert!(matches!(a.display_settings(), Err(MarkerError::InvalidSettings(_))));
}

// ── Display resolution ───────────────────────────────────────────

#[test]
fn view_mode_resolves_to_default_plugin() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_VIEW_MODE, "teaser"),
    ]))
    .unwrap();
    let (plugin, settings) = a.resolve_display().unwrap();
    assert_eq!(plugin, "default");
    assert_eq!(settings.get("view_mode"), Some(&json!("teaser")));
}

#[test]
fn explicit_view_mode_setting_is_kept() {
    let a = EmbedAttributes::from_attributes(&attrs(&[
        (ATTR_ENTITY_TYPE, "node"),
        (ATTR_ENTITY_ID, "1"),
        (ATTR_VIEW_MODE, "teaser"),
        (ATTR_DISPLAY_SETTINGS, r#"{"view_mode":"full"}"#),
    ]))
    .unwrap();
    let (_, settings) = a.resolve_display().unwrap();
    assert_eq!(settings.get("view_mode"), Some(&json!("full")));
}

// ── Round trip ───────────────────────────────────────────────────

fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 :_{}\"-]{0,20}").unwrap()
}

proptest! {
    /// Whatever a valid marker carries comes back out unchanged.
    #[test]
    fn to_attributes_reproduces_input(
        entity_type in value_strategy(),
        id in prop::option::of(value_strategy()),
        uuid in prop::option::of(value_strategy()),
        display in prop::option::of(value_strategy()),
        view_mode in prop::option::of(value_strategy()),
        extra in prop::collection::btree_map("data-x-[a-z]{1,6}", value_strategy(), 0..4),
    ) {
        prop_assume!(id.is_some() || uuid.is_some());
        prop_assume!(display.is_some() || view_mode.is_some());

        let mut map = extra;
        map.insert(ATTR_ENTITY_TYPE.to_string(), entity_type);
        if let Some(v) = id { map.insert(ATTR_ENTITY_ID.to_string(), v); }
        if let Some(v) = uuid { map.insert(ATTR_ENTITY_UUID.to_string(), v); }
        if let Some(v) = display { map.insert(ATTR_DISPLAY.to_string(), v); }
        if let Some(v) = view_mode { map.insert(ATTR_VIEW_MODE.to_string(), v); }

        let parsed = EmbedAttributes::from_attributes(&map).unwrap();
        prop_assert_eq!(parsed.to_attributes(), map);
    }
}
