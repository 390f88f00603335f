use entity_embed_model::Entity;
use std::collections::BTreeMap;

/// Context name under which the embedded entity is bound.
pub const ENTITY_CONTEXT: &str = "entity";

/// A value bound to a named context slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Entity(Entity),
    Value(serde_json::Value),
}

impl From<Entity> for ContextValue {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Named values a display plugin is evaluated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayContext {
    values: BTreeMap<String, ContextValue>,
}

impl DisplayContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with only `entity` bound.
    pub fn for_entity(entity: Entity) -> Self {
        Self::new().with(ENTITY_CONTEXT, entity)
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.values.get(name)
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self.values.get(ENTITY_CONTEXT) {
            Some(ContextValue::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
