//! Display plugins shipped with the registry.

use crate::definition::{ConfigOption, DisplayPluginDefinition};
use crate::error::DisplayError;
use crate::plugin::{BuiltDisplay, DisplayBase, DisplayPlugin};
use entity_embed_model::Entity;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

pub const DEFAULT_PLUGIN_ID: &str = "default";
pub const ENTITY_ID_PLUGIN_ID: &str = "entity_reference:entity_reference_entity_id";
pub const ENTITY_VIEW_PLUGIN_ID: &str = "entity_reference:entity_reference_entity_view";
pub const LABEL_PLUGIN_ID: &str = "entity_reference:entity_reference_label";

const ENTITY_VIEW_LIBRARY: &str = "entity_embed/entity_view";
const TEASER_LENGTH: usize = 600;

const VIEW_MODES: &[(&str, &str)] = &[
    ("default", "Default"),
    ("full", "Full content"),
    ("teaser", "Teaser"),
];

macro_rules! display_base {
    ($ty:ident) => {
        impl $ty {
            pub fn create(base: DisplayBase) -> Result<Box<dyn DisplayPlugin>, DisplayError> {
                Ok(Box::new(Self { base }))
            }
        }
    };
}

macro_rules! base_accessors {
    () => {
        fn base(&self) -> &DisplayBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut DisplayBase {
            &mut self.base
        }
    };
}

fn view_mode(base: &DisplayBase) -> &str {
    base.configuration
        .get("view_mode")
        .and_then(|v| v.as_str())
        .unwrap_or("default")
}

/// Only types with a view builder can be rendered as a full view.
fn viewable(plugin: &dyn DisplayPlugin) -> Result<bool, DisplayError> {
    let entity = plugin.entity()?;
    Ok(plugin.definition().entity_types.allows(&entity.entity_type)
        && plugin
            .base()
            .services
            .entity_types
            .has_view_builder(&entity.entity_type))
}

fn trim_teaser(body: &str) -> String {
    match body.char_indices().nth(TEASER_LENGTH) {
        Some((cut, _)) => format!("{}…", body[..cut].trim_end()),
        None => body.to_string(),
    }
}

/// The `body` payload field. A body that is not text cannot be rendered.
fn body<'a>(plugin_id: &str, entity: &'a Entity) -> Result<&'a str, DisplayError> {
    match entity.field("body") {
        None => Ok(""),
        Some(Value::String(body)) => Ok(body),
        Some(_) => Err(DisplayError::Render {
            plugin_id: plugin_id.to_string(),
            message: format!("{} {} has a body that is not text", entity.entity_type, entity.id),
        }),
    }
}

fn render_view(
    plugin_id: &str,
    entity: &Entity,
    view_mode: &str,
) -> Result<BuiltDisplay, DisplayError> {
    let body = body(plugin_id, entity)?;
    let body = if view_mode == "teaser" {
        trim_teaser(body)
    } else {
        body.to_string()
    };

    let mut markup = format!(
        "<article class=\"entity-embed entity-embed--{} entity-embed--{} view-mode--{}\">",
        encode_double_quoted_attribute(&entity.entity_type),
        encode_double_quoted_attribute(&entity.bundle),
        encode_double_quoted_attribute(view_mode),
    );
    markup.push_str(&format!("<h2>{}</h2>", encode_text(&entity.label)));
    if !body.is_empty() {
        markup.push_str(&format!("<div class=\"body\">{}</div>", encode_text(&body)));
    }
    markup.push_str("</article>");

    let mut built = BuiltDisplay::new(markup);
    built.attachments.add_library(ENTITY_VIEW_LIBRARY);
    Ok(built)
}

/// Renders the entity in a selectable view mode.
pub struct DefaultDisplay {
    base: DisplayBase,
}

display_base!(DefaultDisplay);

impl DefaultDisplay {
    pub fn definition() -> DisplayPluginDefinition {
        DisplayPluginDefinition::new(DEFAULT_PLUGIN_ID, "Default").with_option(ConfigOption::select(
            "view_mode",
            "View mode",
            VIEW_MODES,
            "full",
        ))
    }
}

impl DisplayPlugin for DefaultDisplay {
    base_accessors!();

    fn access(&self) -> Result<bool, DisplayError> {
        viewable(self)
    }

    fn build(&self) -> Result<BuiltDisplay, DisplayError> {
        render_view(&self.definition().id, self.entity()?, view_mode(&self.base))
    }
}

/// Renders only the entity id.
pub struct EntityIdDisplay {
    base: DisplayBase,
}

display_base!(EntityIdDisplay);

impl EntityIdDisplay {
    pub fn definition() -> DisplayPluginDefinition {
        DisplayPluginDefinition::new(ENTITY_ID_PLUGIN_ID, "Entity ID")
    }
}

impl DisplayPlugin for EntityIdDisplay {
    base_accessors!();

    fn build(&self) -> Result<BuiltDisplay, DisplayError> {
        let entity = self.entity()?;
        Ok(BuiltDisplay::new(encode_text(&entity.id).into_owned()))
    }
}

/// "Rendered entity": the full view in a chosen view mode.
pub struct EntityViewDisplay {
    base: DisplayBase,
}

display_base!(EntityViewDisplay);

impl EntityViewDisplay {
    pub fn definition() -> DisplayPluginDefinition {
        DisplayPluginDefinition::new(ENTITY_VIEW_PLUGIN_ID, "Rendered entity").with_option(
            ConfigOption::select("view_mode", "View mode", VIEW_MODES, "default"),
        )
    }
}

impl DisplayPlugin for EntityViewDisplay {
    base_accessors!();

    fn access(&self) -> Result<bool, DisplayError> {
        viewable(self)
    }

    fn build(&self) -> Result<BuiltDisplay, DisplayError> {
        render_view(&self.definition().id, self.entity()?, view_mode(&self.base))
    }
}

/// The entity label, optionally linked to the entity.
pub struct LabelDisplay {
    base: DisplayBase,
}

display_base!(LabelDisplay);

impl LabelDisplay {
    pub fn definition() -> DisplayPluginDefinition {
        DisplayPluginDefinition::new(LABEL_PLUGIN_ID, "Label").with_option(ConfigOption::checkbox(
            "link",
            "Link label to the referenced entity",
            true,
        ))
    }
}

impl DisplayPlugin for LabelDisplay {
    base_accessors!();

    fn build(&self) -> Result<BuiltDisplay, DisplayError> {
        let entity = self.entity()?;
        let label = encode_text(&entity.label);
        let link = self
            .configuration()
            .get("link")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let markup = match entity.url(&self.base.services.entity_types) {
            Some(url) if link => format!(
                "<a href=\"{}\">{}</a>",
                encode_double_quoted_attribute(&url),
                label
            ),
            _ => label.into_owned(),
        };
        Ok(BuiltDisplay::new(markup))
    }
}
