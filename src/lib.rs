pub mod components;
pub mod ecs;
pub mod scenario;
pub mod simulation;
pub mod systems;

pub use ecs::{EntityFilter, EntityManager, SystemManager};
pub use scenario::Scenario;
pub use simulation::{ChronicleSummary, Simulation};
