//! Display plugins for embedded entities.
//!
//! A display plugin is a rendering strategy for an embedded entity (the full
//! rendered view, a label with a link, the bare id). Plugins are registered
//! in a static table at startup; [`DisplayPluginManager`] answers which of
//! them apply to a given entity and context, and instantiates them.
//!
//! Each definition declares which entity types it supports and which context
//! values it accepts. Applicability is decided per definition by binding the
//! context to a fresh instance and running its access check. A definition
//! that fails to instantiate or bind is excluded with an [`ExclusionReason`]
//! rather than failing the whole query.

mod builtin;
mod context;
mod definition;
mod error;
mod manager;
mod plugin;
mod policy;

pub use builtin::{
    DEFAULT_PLUGIN_ID, DefaultDisplay, ENTITY_ID_PLUGIN_ID, ENTITY_VIEW_PLUGIN_ID, EntityIdDisplay,
    EntityViewDisplay, LABEL_PLUGIN_ID, LabelDisplay,
};
pub use context::{ContextValue, DisplayContext, ENTITY_CONTEXT};
pub use definition::{
    ConfigOption, DisplayPluginDefinition, EntityTypeConstraint, EntityTypesDeclaration,
    OptionKind, SelectOption,
};
pub use error::DisplayError;
pub use manager::{
    DisplayPluginManager, DisplayPluginManagerBuilder, Eligibility, ExclusionReason,
};
pub use plugin::{BuiltDisplay, DisplayBase, DisplayFactory, DisplayPlugin, DisplayServices};
pub use policy::{DisplayPolicy, PolicyMode};
