//! Embed marker attributes and their on-the-wire representation.
//!
//! A marker is an element carrying `data-*` attributes that reference an
//! entity and select how it is displayed:
//!
//! ```text
//! <drupal-entity data-entity-type="node" data-entity-uuid="..."
//!     data-entity-embed-display="entity_reference:entity_reference_label"
//!     data-entity-embed-settings='{"link":true}'
//!     data-embed-button="node"></drupal-entity>
//! ```

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Reserved tag name of marker elements.
pub const MARKER_TAG: &str = "drupal-entity";

pub const ATTR_ENTITY_TYPE: &str = "data-entity-type";
pub const ATTR_ENTITY_ID: &str = "data-entity-id";
pub const ATTR_ENTITY_UUID: &str = "data-entity-uuid";
/// Legacy display selector, interchangeable with [`ATTR_DISPLAY`].
pub const ATTR_VIEW_MODE: &str = "data-view-mode";
pub const ATTR_DISPLAY: &str = "data-entity-embed-display";
pub const ATTR_DISPLAY_SETTINGS: &str = "data-entity-embed-settings";
pub const ATTR_EMBED_BUTTON: &str = "data-embed-button";
pub const ATTR_ENTITY_LABEL: &str = "data-entity-label";

/// Plugin a legacy `data-view-mode` marker renders through.
pub const DEFAULT_DISPLAY_PLUGIN: &str = "default";

/// Raw attributes of an element, in name order.
pub type AttributeMap = BTreeMap<String, String>;

/// Plugin-specific display configuration (`data-entity-embed-settings`).
pub type DisplaySettings = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("marker is missing the data-entity-type attribute")]
    MissingEntityType,

    #[error("marker needs one of data-entity-id or data-entity-uuid")]
    MissingEntityReference,

    #[error("marker needs one of data-entity-embed-display or data-view-mode")]
    MissingDisplay,

    #[error("invalid display settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    #[error("display settings must be a JSON object")]
    SettingsNotObject,
}

/// How the marker identifies its entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Id(String),
    Uuid(String),
}

impl EntityRef {
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Uuid(v) => v,
        }
    }
}

/// Which display strategy the marker asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySelector {
    /// `data-entity-embed-display`: a display plugin id.
    Plugin(String),
    /// `data-view-mode`: a view mode rendered through the default plugin.
    ViewMode(String),
}

/// Validated attribute set of an embed marker.
///
/// Attributes are checked for presence only: an empty value still counts.
/// When both forms of a reference (or both display selectors) are present,
/// the uuid and the plugin id win; the other value is kept in `extra` so that
/// [`EmbedAttributes::to_attributes`] reproduces the input map exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedAttributes {
    pub entity_type: String,
    pub entity: EntityRef,
    pub display: DisplaySelector,
    /// Raw JSON of `data-entity-embed-settings`, parsed lazily.
    pub settings: Option<String>,
    pub embed_button: Option<String>,
    pub label: Option<String>,
    /// Attributes this record does not interpret (alignment, captions, ...).
    pub extra: AttributeMap,
}

impl EmbedAttributes {
    /// Builds the record from an element's attributes.
    pub fn from_attributes(attributes: &AttributeMap) -> Result<Self, MarkerError> {
        let mut rest = attributes.clone();

        let entity_type = rest
            .remove(ATTR_ENTITY_TYPE)
            .ok_or(MarkerError::MissingEntityType)?;

        let entity = match rest.remove(ATTR_ENTITY_UUID) {
            Some(uuid) => EntityRef::Uuid(uuid),
            None => rest
                .remove(ATTR_ENTITY_ID)
                .map(EntityRef::Id)
                .ok_or(MarkerError::MissingEntityReference)?,
        };

        let display = match rest.remove(ATTR_DISPLAY) {
            Some(plugin) => DisplaySelector::Plugin(plugin),
            None => rest
                .remove(ATTR_VIEW_MODE)
                .map(DisplaySelector::ViewMode)
                .ok_or(MarkerError::MissingDisplay)?,
        };

        Ok(Self {
            entity_type,
            entity,
            display,
            settings: rest.remove(ATTR_DISPLAY_SETTINGS),
            embed_button: rest.remove(ATTR_EMBED_BUTTON),
            label: rest.remove(ATTR_ENTITY_LABEL),
            extra: rest,
        })
    }

    /// Whether `attributes` carry the minimal field set of a marker.
    pub fn is_marker(attributes: &AttributeMap) -> bool {
        attributes.contains_key(ATTR_ENTITY_TYPE)
            && (attributes.contains_key(ATTR_ENTITY_ID) || attributes.contains_key(ATTR_ENTITY_UUID))
            && (attributes.contains_key(ATTR_DISPLAY) || attributes.contains_key(ATTR_VIEW_MODE))
    }

    /// Serializes back to wire attributes.
    pub fn to_attributes(&self) -> AttributeMap {
        let mut attributes = self.extra.clone();
        attributes.insert(ATTR_ENTITY_TYPE.into(), self.entity_type.clone());
        match &self.entity {
            EntityRef::Id(id) => attributes.insert(ATTR_ENTITY_ID.into(), id.clone()),
            EntityRef::Uuid(uuid) => attributes.insert(ATTR_ENTITY_UUID.into(), uuid.clone()),
        };
        match &self.display {
            DisplaySelector::Plugin(id) => attributes.insert(ATTR_DISPLAY.into(), id.clone()),
            DisplaySelector::ViewMode(mode) => attributes.insert(ATTR_VIEW_MODE.into(), mode.clone()),
        };
        if let Some(settings) = &self.settings {
            attributes.insert(ATTR_DISPLAY_SETTINGS.into(), settings.clone());
        }
        if let Some(button) = &self.embed_button {
            attributes.insert(ATTR_EMBED_BUTTON.into(), button.clone());
        }
        if let Some(label) = &self.label {
            attributes.insert(ATTR_ENTITY_LABEL.into(), label.clone());
        }
        attributes
    }

    /// Markers created through a toolbar button can be edited from the UI.
    pub fn is_editable(&self) -> bool {
        self.embed_button.is_some()
    }

    /// Parses `data-entity-embed-settings`. A missing or blank value is an
    /// empty configuration.
    pub fn display_settings(&self) -> Result<DisplaySettings, MarkerError> {
        let raw = match self.settings.as_deref().map(str::trim) {
            None | Some("") => return Ok(DisplaySettings::new()),
            Some(raw) => raw,
        };
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(MarkerError::SettingsNotObject),
        }
    }

    /// Resolves the plugin id and configuration this marker renders with.
    ///
    /// A legacy view mode maps to the default plugin with `view_mode` set,
    /// unless the settings already name one.
    pub fn resolve_display(&self) -> Result<(String, DisplaySettings), MarkerError> {
        let mut settings = self.display_settings()?;
        match &self.display {
            DisplaySelector::Plugin(id) => Ok((id.clone(), settings)),
            DisplaySelector::ViewMode(mode) => {
                settings
                    .entry("view_mode")
                    .or_insert_with(|| Value::String(mode.clone()));
                Ok((DEFAULT_DISPLAY_PLUGIN.to_string(), settings))
            }
        }
    }
}
