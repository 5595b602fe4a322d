//! Entity identity and per-entity component storage

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::{Component, ComponentType};

/// Process-unique entity identifier.
///
/// The id carries the tag of the manager that minted it, so ids from two
/// managers never collide and a foreign id is detectable. Indices are never
/// reused after destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    manager: u32,
    index: u64,
}

impl EntityId {
    pub fn manager(self) -> u32 {
        self.manager
    }

    pub fn index(self) -> u64 {
        self.index
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}:{})", self.manager, self.index)
    }
}

/// Monotonic id allocator owned by one manager
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    manager: u32,
    next_index: u64,
}

impl EntityAllocator {
    pub(crate) fn new(manager: u32) -> Self {
        Self {
            manager,
            next_index: 0,
        }
    }

    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId {
            manager: self.manager,
            index: self.next_index,
        };
        self.next_index += 1;
        id
    }
}

struct ComponentSlot {
    ty: ComponentType,
    value: Box<dyn Any + Send + Sync>,
}

/// An identity plus at most one component of each type.
///
/// Entities are created through `EntityManager::create_entity`; they hold no
/// reference back to the manager.
pub struct Entity {
    id: EntityId,
    components: HashMap<TypeId, ComponentSlot>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            components: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Stores `component`, replacing any previous component of the same type.
    pub fn add<T: Component>(&mut self, component: T) -> &mut Self {
        self.components.insert(
            TypeId::of::<T>(),
            ComponentSlot {
                ty: ComponentType::of::<T>(),
                value: Box::new(component),
            },
        );
        self
    }

    /// Adds every component of `bundle`.
    pub fn insert(&mut self, bundle: impl Bundle) -> &mut Self {
        bundle.add_to(self);
        self
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    pub fn has_component_type(&self, ty: ComponentType) -> bool {
        self.components.contains_key(&ty.type_id())
    }

    /// True when every listed type is present. An empty list matches.
    pub fn has_all(&self, types: &[ComponentType]) -> bool {
        types.iter().all(|ty| self.has_component_type(*ty))
    }

    /// Removes the component of type `T`, reporting whether one was present.
    pub fn remove<T: Component>(&mut self) -> bool {
        self.components.remove(&TypeId::of::<T>()).is_some()
    }

    /// Removes and returns the component of type `T`.
    pub fn take<T: Component>(&mut self) -> Option<T> {
        let slot = self.components.remove(&TypeId::of::<T>())?;
        slot.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.values().map(|slot| slot.ty)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.component_types().map(|ty| ty.short_name()).collect();
        names.sort_unstable();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &names)
            .finish()
    }
}

/// A set of components added to an entity in one call.
///
/// Implemented for every `Component`, for `()` and for tuples of bundles up to
/// eight elements, so `create_entity((Name::new("Ada"), Age(3)))` works.
pub trait Bundle {
    fn add_to(self, entity: &mut Entity);
}

impl Bundle for () {
    fn add_to(self, _entity: &mut Entity) {}
}

impl<T: Component> Bundle for T {
    fn add_to(self, entity: &mut Entity) {
        entity.add(self);
    }
}

macro_rules! impl_bundle_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Bundle),+> Bundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn add_to(self, entity: &mut Entity) {
                let ($($name,)+) = self;
                $($name.add_to(entity);)+
            }
        }
    };
}

impl_bundle_for_tuple!(A);
impl_bundle_for_tuple!(A, B);
impl_bundle_for_tuple!(A, B, C);
impl_bundle_for_tuple!(A, B, C, D);
impl_bundle_for_tuple!(A, B, C, D, E);
impl_bundle_for_tuple!(A, B, C, D, E, F);
impl_bundle_for_tuple!(A, B, C, D, E, F, G);
impl_bundle_for_tuple!(A, B, C, D, E, F, G, H);
