//! Core model for entity embedding.
//!
//! Defines the types shared by the editor widget and the preview service:
//! - [`Entity`]: a content item (type, id, uuid, label, JSON payload)
//! - [`EntityTypeRegistry`]: per-type metadata (view builder, canonical path)
//! - [`EntityRepository`]: lookup of entities by id or uuid
//! - [`EmbedAttributes`]: the validated attribute record of an embed marker
//! - [`PreviewResponse`]: what the rendering endpoint sends back to the editor
//!
//! The marker wire format is defined by the `ATTR_*` constants in this crate;
//! both sides must agree on it.

mod entity;
mod marker;
mod preview;
mod repository;

pub use entity::{Entity, EntityTypeInfo, EntityTypeRegistry};
pub use marker::{
    ATTR_DISPLAY, ATTR_DISPLAY_SETTINGS, ATTR_EMBED_BUTTON, ATTR_ENTITY_ID, ATTR_ENTITY_LABEL,
    ATTR_ENTITY_TYPE, ATTR_ENTITY_UUID, ATTR_VIEW_MODE, AttributeMap, DEFAULT_DISPLAY_PLUGIN,
    DisplaySelector, DisplaySettings, EmbedAttributes, EntityRef, MARKER_TAG, MarkerError,
};
pub use preview::{PreviewAttachments, PreviewResponse};
pub use repository::{EntityRepository, InMemoryEntityRepository};
