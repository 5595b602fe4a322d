//! Entity Component System core
//!
//! Entities own at most one component per type, an [`EntityManager`] answers
//! component queries, and a [`SystemManager`] drives registered systems once
//! per tick in registration order. Everything runs synchronously on the
//! calling thread.

pub mod component;
pub mod entity;
pub mod error;
pub mod filter;
pub mod manager;
pub mod scheduler;
pub mod system;

pub use component::{Component, ComponentType, Name};
pub use entity::{Bundle, Entity, EntityId};
pub use error::{EcsError, EcsResult};
pub use filter::EntityFilter;
pub use manager::EntityManager;
pub use scheduler::{SystemManager, SystemRunReport, TickReport};
pub use system::{Filtered, FilteredSystem, System};
