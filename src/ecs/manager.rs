//! EntityManager - owns the live entity registry and answers queries

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{trace, warn};

use super::entity::EntityAllocator;
use super::{Bundle, Component, ComponentType, EcsError, EcsResult, Entity, EntityId};

static NEXT_MANAGER_ID: AtomicU32 = AtomicU32::new(1);

/// Registry of live entities.
///
/// Iteration order is insertion order: ids are allocated monotonically and the
/// registry is ordered by id. Every query result is computed against the live
/// set at call time.
pub struct EntityManager {
    id: u32,
    allocator: EntityAllocator,
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityManager {
    pub fn new() -> Self {
        let id = NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            allocator: EntityAllocator::new(id),
            entities: BTreeMap::new(),
        }
    }

    /// Tag stamped into every id this manager allocates.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Create a new entity seeded with `components` and register it.
    pub fn create_entity(&mut self, components: impl Bundle) -> &mut Entity {
        let id = self.allocator.allocate();
        let mut entity = Entity::new(id);
        entity.insert(components);
        trace!(%id, components = entity.component_count(), "entity created");
        self.entities.entry(id).or_insert(entity)
    }

    /// Look up a live entity. Unknown or destroyed ids yield `Ok(None)`.
    pub fn get_entity(&self, id: EntityId) -> EcsResult<Option<&Entity>> {
        self.check_owned(id)?;
        Ok(self.entities.get(&id))
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> EcsResult<Option<&mut Entity>> {
        self.check_owned(id)?;
        Ok(self.entities.get_mut(&id))
    }

    /// True when `id` is live in this manager.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Remove an entity and its components.
    ///
    /// Returns whether anything was removed; the id is never handed out again,
    /// so lookups through it resolve to `None` from now on.
    pub fn destroy_entity(&mut self, id: EntityId) -> EcsResult<bool> {
        self.check_owned(id)?;
        let removed = self.entities.remove(&id).is_some();
        if removed {
            trace!(%id, "entity destroyed");
        }
        Ok(removed)
    }

    /// All live entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Entities holding every listed component type, in insertion order.
    ///
    /// An empty list returns every live entity.
    pub fn get_entities_with_components(&self, types: &[ComponentType]) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|entity| entity.has_all(types))
            .collect()
    }

    /// Ids of the entities `get_entities_with_components` would return.
    ///
    /// The vector is a snapshot: mutating or destroying entities afterwards does
    /// not change it.
    pub fn entity_ids_with_components(&self, types: &[ComponentType]) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.has_all(types))
            .map(Entity::id)
            .collect()
    }

    /// Every `T` in the registry paired with its owner's id.
    pub fn components<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities
            .values()
            .filter_map(|entity| entity.get::<T>().map(|component| (entity.id(), component)))
    }

    /// Number of live entities holding a `T`.
    pub fn count_holders<T: Component>(&self) -> usize {
        self.entities
            .values()
            .filter(|entity| entity.has_component::<T>())
            .count()
    }

    /// The first entity (insertion order) holding a `T`.
    ///
    /// Singleton components are a convention: when more than one entity holds
    /// `T` the first one wins and a warning is emitted.
    pub fn get_singleton_entity<T: Component>(&self) -> Option<&Entity> {
        let mut holders = self
            .entities
            .values()
            .filter(|entity| entity.has_component::<T>());
        let first = holders.next()?;
        let extra = holders.count();
        if extra > 0 {
            warn_ambiguous_singleton(ComponentType::of::<T>(), first.id(), extra + 1);
        }
        Some(first)
    }

    pub fn get_singleton_component<T: Component>(&self) -> Option<&T> {
        self.get_singleton_entity::<T>()
            .and_then(|entity| entity.get::<T>())
    }

    pub fn get_singleton_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let id = self.get_singleton_entity::<T>()?.id();
        self.entities
            .get_mut(&id)
            .and_then(|entity| entity.get_mut::<T>())
    }

    /// Number of live entities.
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy every entity. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        trace!(destroyed = self.entities.len(), "entity registry cleared");
        self.entities.clear();
    }

    fn check_owned(&self, id: EntityId) -> EcsResult<()> {
        if id.manager() == self.id {
            Ok(())
        } else {
            Err(EcsError::foreign_entity(id, self.id))
        }
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_ambiguous_singleton(ty: ComponentType, chosen: EntityId, holders: usize) {
    warn!(
        component = ty.short_name(),
        holders,
        %chosen,
        "singleton component held by more than one entity; using the first"
    );
}
