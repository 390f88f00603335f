use crate::config::{ServerConfig, TextFormat};
use crate::error::{ConfigError, PreviewError};
use entity_embed_display::{
    ContextValue, DisplayContext, DisplayPluginManager, DisplayPolicy, DisplayServices,
    ENTITY_CONTEXT,
};
use entity_embed_model::{
    AttributeMap, DEFAULT_DISPLAY_PLUGIN, DisplaySettings, EmbedAttributes, Entity, EntityRef,
    EntityRepository, MARKER_TAG, PreviewResponse,
};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Library every preview response declares.
pub const PREVIEW_LIBRARY: &str = "entity_embed/preview";

fn default_display_plugin() -> String {
    DEFAULT_DISPLAY_PLUGIN.to_string()
}

/// Programmatic embed: render an entity by id without a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRenderRequest {
    pub entity_type: String,
    pub id: String,
    #[serde(default = "default_display_plugin")]
    pub display_plugin: String,
    #[serde(default)]
    pub display_settings: DisplaySettings,
}

impl EmbedRenderRequest {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            display_plugin: default_display_plugin(),
            display_settings: DisplaySettings::new(),
        }
    }

    #[must_use]
    pub fn with_display(mut self, plugin_id: impl Into<String>, settings: DisplaySettings) -> Self {
        self.display_plugin = plugin_id.into();
        self.display_settings = settings;
        self
    }
}

/// Renders markers through the display plugin registry.
pub struct PreviewService {
    formats: BTreeMap<String, TextFormat>,
    repository: Arc<dyn EntityRepository>,
    displays: Arc<DisplayPluginManager>,
}

impl PreviewService {
    pub fn new(
        formats: impl IntoIterator<Item = TextFormat>,
        repository: Arc<dyn EntityRepository>,
        displays: Arc<DisplayPluginManager>,
    ) -> Self {
        Self {
            formats: formats.into_iter().map(|f| (f.id.clone(), f)).collect(),
            repository,
            displays,
        }
    }

    /// Wires entity types, seed entities, the display policy and the
    /// built-in displays from `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let entity_types = Arc::new(config.entity_type_registry());
        let repository = config.load_entities()?;
        let policy = config
            .policy_file
            .as_deref()
            .map(DisplayPolicy::load_from)
            .unwrap_or_default();

        let displays = DisplayPluginManager::builder()
            .services(DisplayServices::new(entity_types))
            .policy(policy)
            .register_builtins()?
            .build();

        info!(entities = repository.len(), "Preview service ready");
        Ok(Self::new(
            config.formats.clone(),
            Arc::new(repository),
            Arc::new(displays),
        ))
    }

    pub fn displays(&self) -> &DisplayPluginManager {
        &self.displays
    }

    /// Renders the marker serialized in `value` for text format `format`.
    pub fn render_preview(&self, format: &str, value: &str) -> Result<PreviewResponse, PreviewError> {
        let text_format = self
            .formats
            .get(format)
            .ok_or_else(|| PreviewError::UnknownFormat(format.to_string()))?;
        if !text_format.embeds_enabled {
            return Err(PreviewError::EmbedsDisabled(format.to_string()));
        }

        let attributes = EmbedAttributes::from_attributes(&parse_marker(value)?)?;
        let (plugin_id, settings) = attributes.resolve_display()?;
        let entity = self.load(&attributes.entity_type, &attributes.entity)?;
        debug!(%format, %plugin_id, entity_type = %entity.entity_type, id = %entity.id, "Rendering preview");
        self.render(entity, &plugin_id, &settings)
    }

    pub fn render_embed(&self, request: &EmbedRenderRequest) -> Result<PreviewResponse, PreviewError> {
        let entity = self.load(&request.entity_type, &EntityRef::Id(request.id.clone()))?;
        self.render(entity, &request.display_plugin, &request.display_settings)
    }

    /// Labels of the displays that can render the entity, keyed by plugin id.
    pub fn display_options(
        &self,
        entity_type: &str,
        id: &str,
    ) -> Result<BTreeMap<String, String>, PreviewError> {
        let entity = self.load(entity_type, &EntityRef::Id(id.to_string()))?;
        Ok(self.displays.definition_options_for_entity(&entity))
    }

    fn load(&self, entity_type: &str, reference: &EntityRef) -> Result<Entity, PreviewError> {
        self.repository
            .load(entity_type, reference)
            .ok_or_else(|| PreviewError::EntityNotFound {
                entity_type: entity_type.to_string(),
                reference: reference.value().to_string(),
            })
    }

    fn render(
        &self,
        entity: Entity,
        plugin_id: &str,
        settings: &DisplaySettings,
    ) -> Result<PreviewResponse, PreviewError> {
        let contexts = DisplayContext::for_entity(entity.clone());
        if !self
            .displays
            .definitions_for_contexts(&contexts)
            .contains_key(plugin_id)
        {
            return Err(PreviewError::InapplicableDisplay {
                plugin_id: plugin_id.to_string(),
                entity_type: entity.entity_type,
            });
        }

        let mut display = self.displays.create_instance(plugin_id, settings)?;
        display.set_context_value(ENTITY_CONTEXT, ContextValue::Entity(entity))?;
        let built = display.build()?;

        let mut response = PreviewResponse::new(built.markup);
        response.attachments = built.attachments;
        response.attachments.add_library(PREVIEW_LIBRARY);
        Ok(response)
    }
}

/// Attributes of the first marker element in `value`.
fn parse_marker(value: &str) -> Result<AttributeMap, PreviewError> {
    let fragment = Html::parse_fragment(value);
    let marker = fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == MARKER_TAG)
        .ok_or_else(|| PreviewError::MalformedMarker(format!("no <{MARKER_TAG}> element")))?;
    Ok(marker
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}
