use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A content item that can be referenced from an embed marker.
///
/// The `data` field holds arbitrary JSON whose structure depends on the
/// entity type (a node's body, a user's mail, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub uuid: String,
    pub entity_type: String,
    pub bundle: String,
    pub label: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Entity {
    /// Creates an entity with a fresh random uuid and an empty payload.
    /// The bundle defaults to the entity type.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>, label: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self {
            id: id.into(),
            uuid: uuid::Uuid::new_v4().to_string(),
            bundle: entity_type.clone(),
            entity_type,
            label: label.into(),
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    #[must_use]
    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = bundle.into();
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// A top-level payload field. `null` reads as absent.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.data.get(name).filter(|value| !value.is_null())
    }

    /// Canonical URL of this entity, if its type declares a path template.
    pub fn url(&self, types: &EntityTypeRegistry) -> Option<String> {
        types
            .get(&self.entity_type)
            .and_then(|info| info.canonical_path.as_deref())
            .map(|template| template.replace("{id}", &self.id))
    }
}

/// Metadata about an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeInfo {
    pub id: String,
    pub label: String,
    /// Whether entities of this type can be rendered as a full view.
    #[serde(default)]
    pub has_view_builder: bool,
    /// Path template with an `{id}` placeholder, e.g. `/node/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_path: Option<String>,
}

impl EntityTypeInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            has_view_builder: false,
            canonical_path: None,
        }
    }

    #[must_use]
    pub fn with_view_builder(mut self) -> Self {
        self.has_view_builder = true;
        self
    }

    #[must_use]
    pub fn with_canonical_path(mut self, template: impl Into<String>) -> Self {
        self.canonical_path = Some(template.into());
        self
    }
}

/// Known entity types, keyed by type id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypeRegistry {
    types: BTreeMap<String, EntityTypeInfo>,
}

impl EntityTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock content types: `node`, `user`,
    /// `taxonomy_term` (all viewable) and `menu` (config, not viewable).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            EntityTypeInfo::new("node", "Content")
                .with_view_builder()
                .with_canonical_path("/node/{id}"),
        );
        registry.register(
            EntityTypeInfo::new("user", "User")
                .with_view_builder()
                .with_canonical_path("/user/{id}"),
        );
        registry.register(
            EntityTypeInfo::new("taxonomy_term", "Taxonomy term")
                .with_view_builder()
                .with_canonical_path("/taxonomy/term/{id}"),
        );
        registry.register(
            EntityTypeInfo::new("menu", "Menu")
                .with_canonical_path("/admin/structure/menu/manage/{id}"),
        );
        registry
    }

    /// Adds or replaces an entity type.
    pub fn register(&mut self, info: EntityTypeInfo) {
        self.types.insert(info.id.clone(), info);
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntityTypeInfo> {
        self.types.get(entity_type)
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.types.contains_key(entity_type)
    }

    /// Unknown types are treated as not viewable.
    pub fn has_view_builder(&self, entity_type: &str) -> bool {
        self.get(entity_type).is_some_and(|info| info.has_view_builder)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityTypeInfo> {
        self.types.values()
    }
}
