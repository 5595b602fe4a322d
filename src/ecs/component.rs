//! Component marker trait and runtime type descriptors

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Marker trait for data attached to entities.
///
/// Components carry no behaviour. Absence is expressed with `Option`, so no
/// component type needs a shared "null" instance.
pub trait Component: Send + Sync + 'static {}

/// Runtime descriptor for a component type.
///
/// Identity is the `TypeId`; the name is kept for diagnostics only.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `Name` for `annals::ecs::Name`.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Builds a `Vec<ComponentType>` from a list of component types.
///
/// ```
/// use annals::component_types;
/// use annals::ecs::Name;
///
/// let required = component_types![Name];
/// assert_eq!(required.len(), 1);
/// ```
#[macro_export]
macro_rules! component_types {
    () => {
        ::std::vec::Vec::<$crate::ecs::ComponentType>::new()
    };
    ($($ty:ty),+ $(,)?) => {
        ::std::vec![$($crate::ecs::ComponentType::of::<$ty>()),+]
    };
}

/// Display name of an entity. `EntityFilter::by_name` matches against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Component for Name {}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug)]
    struct Position {
        _x: f32,
    }
    impl Component for Position {}

    #[test]
    fn test_component_type_identity() {
        assert_eq!(ComponentType::of::<Name>(), ComponentType::of::<Name>());
        assert_ne!(ComponentType::of::<Name>(), ComponentType::of::<Position>());

        let set: HashSet<_> = [
            ComponentType::of::<Name>(),
            ComponentType::of::<Position>(),
            ComponentType::of::<Name>(),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_component_type_names() {
        let ty = ComponentType::of::<Position>();
        assert_eq!(ty.short_name(), "Position");
        assert!(ty.name().ends_with("::Position"));
        assert_eq!(format!("{ty}"), "Position");
    }

    #[test]
    fn test_component_types_macro() {
        let empty = component_types![];
        assert!(empty.is_empty());

        let required = component_types![Name, Position];
        assert_eq!(
            required,
            vec![ComponentType::of::<Name>(), ComponentType::of::<Position>()]
        );
    }
}
