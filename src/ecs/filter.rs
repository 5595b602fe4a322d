//! Entity predicates and their combinators
//!
//! An [`EntityFilter`] is a pure `Fn(&Entity) -> bool`. Filters are cheap to
//! clone and compose with [`EntityFilter::and`], [`EntityFilter::or`] and
//! [`EntityFilter::not`], or with the `&`, `|` and `!` operators.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use super::{Component, Entity, Name};

type Predicate = dyn Fn(&Entity) -> bool + Send + Sync;

#[derive(Clone)]
pub struct EntityFilter {
    predicate: Arc<Predicate>,
}

impl EntityFilter {
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&Entity) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        (self.predicate)(entity)
    }

    /// Always true.
    pub fn all() -> Self {
        Self::from_fn(|_| true)
    }

    /// Always false.
    pub fn none() -> Self {
        Self::from_fn(|_| false)
    }

    /// True when the entity's [`Name`] equals `target`. Unnamed entities never match.
    pub fn by_name(target: impl Into<String>) -> Self {
        let target = target.into();
        Self::from_fn(move |entity| {
            entity
                .get::<Name>()
                .is_some_and(|name| name.as_str() == target)
        })
    }

    pub fn has_component<T: Component>() -> Self {
        Self::from_fn(|entity| entity.has_component::<T>())
    }

    pub fn lacks_component<T: Component>() -> Self {
        Self::from_fn(|entity| !entity.has_component::<T>())
    }

    /// True when every filter matches; an empty set is true.
    pub fn and(filters: impl IntoIterator<Item = EntityFilter>) -> Self {
        let filters: Vec<_> = filters.into_iter().collect();
        Self::from_fn(move |entity| filters.iter().all(|filter| filter.matches(entity)))
    }

    /// True when any filter matches; an empty set is false.
    pub fn or(filters: impl IntoIterator<Item = EntityFilter>) -> Self {
        let filters: Vec<_> = filters.into_iter().collect();
        Self::from_fn(move |entity| filters.iter().any(|filter| filter.matches(entity)))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: EntityFilter) -> Self {
        Self::from_fn(move |entity| !filter.matches(entity))
    }
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for EntityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntityFilter(..)")
    }
}

impl Not for EntityFilter {
    type Output = EntityFilter;

    fn not(self) -> EntityFilter {
        EntityFilter::not(self)
    }
}

impl BitAnd for EntityFilter {
    type Output = EntityFilter;

    fn bitand(self, rhs: EntityFilter) -> EntityFilter {
        EntityFilter::and([self, rhs])
    }
}

impl BitOr for EntityFilter {
    type Output = EntityFilter;

    fn bitor(self, rhs: EntityFilter) -> EntityFilter {
        EntityFilter::or([self, rhs])
    }
}
