//! Error taxonomy for the ECS core.
//!
//! Every variant is a programmer-contract violation. Nothing in the core
//! catches, logs or retries these; they are surfaced to the caller as soon as
//! they are detected and before any state is mutated.

use thiserror::Error;

use super::EntityId;

pub type EcsResult<T> = Result<T, EcsError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// A public operation received a value that violates its contract, such as
    /// an entity id minted by a different manager.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `SystemManager::register` was called twice for the same system type.
    #[error("system `{0}` is already registered")]
    DuplicateRegistration(String),

    /// `SystemManager::unregister` was called for a type that is not registered.
    #[error("system `{0}` is not registered")]
    UnknownRegistration(String),

    /// A processing hook was invoked on a system that never provided it.
    #[error("system `{system}` does not implement `{hook}`")]
    NotImplemented { system: String, hook: &'static str },
}

impl EcsError {
    pub(crate) fn foreign_entity(id: EntityId, manager: u32) -> Self {
        EcsError::InvalidArgument(format!(
            "{id} was created by manager #{} and cannot be used with manager #{manager}",
            id.manager()
        ))
    }

    pub(crate) fn not_implemented(system: &str, hook: &'static str) -> Self {
        EcsError::NotImplemented {
            system: system.to_string(),
            hook,
        }
    }
}
