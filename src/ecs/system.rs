//! System traits - per-tick logic over matching entities

use std::any::{type_name, Any};

use anyhow::Result;

use super::{ComponentType, EcsError, EntityFilter, EntityId, EntityManager};

/// Downcasting support for boxed systems.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A unit of per-tick logic.
///
/// `A` is the tick argument the driver hands to `SystemManager::update`, such
/// as the number of years to advance or a frame delta.
///
/// The default [`update`](System::update) queries the manager for entities
/// holding every type in [`required_components`](System::required_components)
/// and calls [`process_entity`](System::process_entity) once per match, in
/// registry order. Systems that do not work per entity override `update`
/// instead and can leave `process_entity` unimplemented.
pub trait System<A = ()>: AsAny {
    fn name(&self) -> &str {
        short_type_name(type_name::<Self>())
    }

    /// Component types an entity must hold to be processed. Empty means every
    /// live entity.
    fn required_components(&self) -> &[ComponentType] {
        &[]
    }

    fn update(&mut self, entities: &mut EntityManager, args: &A) -> Result<()> {
        let matching = entities.entity_ids_with_components(self.required_components());
        for id in matching {
            // an earlier entity may have destroyed this one
            if !entities.contains(id) {
                continue;
            }
            self.process_entity(id, entities, args)?;
        }
        Ok(())
    }

    fn process_entity(
        &mut self,
        _entity: EntityId,
        _entities: &mut EntityManager,
        _args: &A,
    ) -> Result<()> {
        Err(EcsError::not_implemented(self.name(), "process_entity").into())
    }
}

/// A system gated by an [`EntityFilter`].
///
/// Register it through [`Filtered`] (or `SystemManager::register_filtered`).
/// An entity is processed only if it holds every required component and the
/// filter accepts it.
pub trait FilteredSystem<A = ()>: 'static {
    fn name(&self) -> &str {
        short_type_name(type_name::<Self>())
    }

    fn required_components(&self) -> &[ComponentType] {
        &[]
    }

    fn filter(&self) -> &EntityFilter;

    fn process_filtered_entity(
        &mut self,
        _entity: EntityId,
        _entities: &mut EntityManager,
        _args: &A,
    ) -> Result<()> {
        Err(EcsError::not_implemented(self.name(), "process_filtered_entity").into())
    }
}

/// Adapter that runs a [`FilteredSystem`] as a [`System`].
#[derive(Debug)]
pub struct Filtered<S> {
    inner: S,
}

impl<S> Filtered<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<A, S: FilteredSystem<A>> System<A> for Filtered<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn required_components(&self) -> &[ComponentType] {
        self.inner.required_components()
    }

    fn process_entity(
        &mut self,
        entity: EntityId,
        entities: &mut EntityManager,
        args: &A,
    ) -> Result<()> {
        let passes = entities
            .get_entity(entity)?
            .is_some_and(|e| self.inner.filter().matches(e));
        if passes {
            self.inner.process_filtered_entity(entity, entities, args)
        } else {
            Ok(())
        }
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_types;
    use crate::ecs::{Component, Name};

    #[derive(Debug, PartialEq)]
    struct Counter(u32);
    impl Component for Counter {}

    struct Bump {
        required: Vec<ComponentType>,
    }

    impl System<u32> for Bump {
        fn required_components(&self) -> &[ComponentType] {
            &self.required
        }

        fn process_entity(
            &mut self,
            entity: EntityId,
            entities: &mut EntityManager,
            step: &u32,
        ) -> Result<()> {
            if let Some(counter) = entities
                .get_entity_mut(entity)?
                .and_then(|e| e.get_mut::<Counter>())
            {
                counter.0 += step;
            }
            Ok(())
        }
    }

    struct Unfinished;
    impl System for Unfinished {}

    struct UnfinishedFilter {
        filter: EntityFilter,
    }
    impl FilteredSystem for UnfinishedFilter {
        fn filter(&self) -> &EntityFilter {
            &self.filter
        }
    }

    #[test]
    fn test_default_update_visits_matches() {
        let mut entities = EntityManager::new();
        let a = entities.create_entity(Counter(0)).id();
        let b = entities.create_entity(Name::new("no counter")).id();

        let mut system = Bump {
            required: component_types![Counter],
        };
        system.update(&mut entities, &5).unwrap();
        system.update(&mut entities, &2).unwrap();

        let counter = entities.get_entity(a).unwrap().unwrap().get::<Counter>();
        assert_eq!(counter, Some(&Counter(7)));
        assert!(!entities.get_entity(b).unwrap().unwrap().has_component::<Counter>());
    }

    #[test]
    fn test_default_name_is_type_name() {
        let system = Bump { required: vec![] };
        assert_eq!(system.name(), "Bump");
        assert_eq!(short_type_name("a::b::Filtered<c::Inner>"), "Filtered");
    }

    #[test]
    fn test_unimplemented_process_entity() {
        let mut entities = EntityManager::new();
        entities.create_entity(());

        let err = Unfinished.update(&mut entities, &()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EcsError>(),
            Some(&EcsError::NotImplemented {
                system: "Unfinished".to_string(),
                hook: "process_entity",
            })
        );
    }

    #[test]
    fn test_unimplemented_filtered_hook_only_fires_on_match() {
        let mut entities = EntityManager::new();
        entities.create_entity(Name::new("other"));

        let mut system = Filtered::new(UnfinishedFilter {
            filter: EntityFilter::by_name("target"),
        });
        system.update(&mut entities, &()).unwrap();

        entities.create_entity(Name::new("target"));
        let err = system.update(&mut entities, &()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EcsError>(),
            Some(EcsError::NotImplemented {
                hook: "process_filtered_entity",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_manager_never_calls_hook() {
        let mut entities = EntityManager::new();
        assert!(Unfinished.update(&mut entities, &()).is_ok());
    }

    #[test]
    fn test_filtered_adapter_exposes_inner_system() {
        let mut entities = EntityManager::new();
        entities.create_entity(Name::new("first"));

        let mut system = Filtered::new(UnfinishedFilter {
            filter: EntityFilter::none(),
        });
        system.update(&mut entities, &()).unwrap();

        system.inner_mut().filter = EntityFilter::by_name("first");
        assert!(system.update(&mut entities, &()).is_err());

        let inner = system.into_inner();
        let named = entities.entities().next().unwrap();
        assert!(inner.filter().matches(named));
    }
}
