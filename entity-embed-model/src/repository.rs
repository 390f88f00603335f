use crate::{Entity, EntityRef};
use std::collections::HashMap;

/// Source of entities referenced by markers.
pub trait EntityRepository: Send + Sync {
    /// Loads an entity of `entity_type` by id or uuid.
    fn load(&self, entity_type: &str, reference: &EntityRef) -> Option<Entity>;
}

/// Map-backed repository, filled once and then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityRepository {
    by_id: HashMap<(String, String), Entity>,
    /// uuid -> (entity_type, id)
    by_uuid: HashMap<String, (String, String)>,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entity.
    pub fn insert(&mut self, entity: Entity) {
        let key = (entity.entity_type.clone(), entity.id.clone());
        if let Some(previous) = self.by_id.get(&key) {
            self.by_uuid.remove(&previous.uuid);
        }
        self.by_uuid.insert(entity.uuid.clone(), key.clone());
        self.by_id.insert(key, entity);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Entity> for InMemoryEntityRepository {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut repo = Self::new();
        for entity in iter {
            repo.insert(entity);
        }
        repo
    }
}

impl EntityRepository for InMemoryEntityRepository {
    fn load(&self, entity_type: &str, reference: &EntityRef) -> Option<Entity> {
        let key = match reference {
            EntityRef::Id(id) => (entity_type.to_string(), id.clone()),
            EntityRef::Uuid(uuid) => {
                let key = self.by_uuid.get(uuid)?;
                // A uuid of another type does not match.
                if key.0 != entity_type {
                    return None;
                }
                key.clone()
            }
        };
        self.by_id.get(&key).cloned()
    }
}
