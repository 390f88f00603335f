use crate::context::{ContextValue, DisplayContext, ENTITY_CONTEXT};
use crate::definition::{ConfigOption, DisplayPluginDefinition};
use crate::error::DisplayError;
use entity_embed_model::{DisplaySettings, Entity, EntityTypeRegistry, PreviewAttachments};
use std::sync::Arc;

/// Host services shared by all display instances.
#[derive(Debug, Clone, Default)]
pub struct DisplayServices {
    pub entity_types: Arc<EntityTypeRegistry>,
}

impl DisplayServices {
    pub fn new(entity_types: Arc<EntityTypeRegistry>) -> Self {
        Self { entity_types }
    }
}

/// Output of a display plugin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltDisplay {
    pub markup: String,
    pub attachments: PreviewAttachments,
}

impl BuiltDisplay {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            attachments: PreviewAttachments::default(),
        }
    }
}

/// State every display instance carries: its definition, resolved
/// configuration, bound context, and host services.
#[derive(Debug, Clone)]
pub struct DisplayBase {
    pub definition: DisplayPluginDefinition,
    pub configuration: DisplaySettings,
    pub context: DisplayContext,
    pub services: DisplayServices,
}

impl DisplayBase {
    pub fn new(
        definition: DisplayPluginDefinition,
        configuration: DisplaySettings,
        services: DisplayServices,
    ) -> Self {
        Self {
            definition,
            configuration,
            context: DisplayContext::new(),
            services,
        }
    }
}

/// Constructor stored in the registry for each definition.
pub type DisplayFactory = fn(DisplayBase) -> Result<Box<dyn DisplayPlugin>, DisplayError>;

/// A display strategy instance bound to a configuration and a context.
pub trait DisplayPlugin: Send {
    fn base(&self) -> &DisplayBase;

    fn base_mut(&mut self) -> &mut DisplayBase;

    fn definition(&self) -> &DisplayPluginDefinition {
        &self.base().definition
    }

    fn configuration(&self) -> &DisplaySettings {
        &self.base().configuration
    }

    /// Binds a context value. Only names the definition declares are
    /// accepted, and `entity` must hold an entity.
    fn set_context_value(&mut self, name: &str, value: ContextValue) -> Result<(), DisplayError> {
        let plugin_id = &self.definition().id;
        if !self.definition().contexts.contains(name) {
            return Err(DisplayError::UnknownContext {
                plugin_id: plugin_id.clone(),
                name: name.to_string(),
            });
        }
        if name == ENTITY_CONTEXT && !matches!(value, ContextValue::Entity(_)) {
            return Err(DisplayError::InvalidContext {
                plugin_id: plugin_id.clone(),
                name: name.to_string(),
            });
        }
        self.base_mut().context.insert(name, value);
        Ok(())
    }

    /// Binds every value of `context`, stopping at the first failure.
    fn bind_context(&mut self, context: &DisplayContext) -> Result<(), DisplayError> {
        for (name, value) in context.iter() {
            self.set_context_value(name, value.clone())?;
        }
        Ok(())
    }

    /// The bound entity.
    fn entity(&self) -> Result<&Entity, DisplayError> {
        self.base()
            .context
            .entity()
            .ok_or_else(|| DisplayError::MissingContext {
                plugin_id: self.definition().id.clone(),
                name: ENTITY_CONTEXT.to_string(),
            })
    }

    /// Whether this instance can display the bound entity. The default
    /// checks the entity type against the definition's constraint.
    fn access(&self) -> Result<bool, DisplayError> {
        let entity = self.entity()?;
        Ok(self.definition().entity_types.allows(&entity.entity_type))
    }

    /// Options an editor can set for this display.
    fn configuration_form(&self) -> &[ConfigOption] {
        &self.definition().options
    }

    /// Renders the bound entity.
    fn build(&self) -> Result<BuiltDisplay, DisplayError>;
}
