//! SystemManager - ordered system registry and tick driver

use std::any::{type_name, TypeId};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;

use super::system::AsAny;
use super::{EcsError, EcsResult, EntityManager, Filtered, FilteredSystem, System};

/// Timing of one system within a tick
#[derive(Debug, Clone)]
pub struct SystemRunReport {
    pub name: String,
    pub duration: Duration,
}

/// Statistics for a single tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub duration: Duration,
    pub systems: Vec<SystemRunReport>,
}

struct RegisteredSystem<A> {
    key: TypeId,
    system: Box<dyn System<A>>,
}

/// Owns an ordered, type-keyed set of systems and runs them once per tick.
///
/// Registration order is execution order. Each concrete system type can be
/// registered at most once.
pub struct SystemManager<A = ()> {
    systems: Vec<RegisteredSystem<A>>,
    tick_count: u64,
    history: VecDeque<TickReport>,
    max_history: usize,
}

impl<A: 'static> SystemManager<A> {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            tick_count: 0,
            history: VecDeque::new(),
            max_history: 100,
        }
    }

    /// Keep at most `max_history` tick reports.
    pub fn with_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self.history.truncate(max_history);
        self
    }

    /// Append `system` to the execution order.
    ///
    /// Fails with `DuplicateRegistration` if a system of the same type is
    /// already registered; the registry is left untouched.
    pub fn register<S: System<A>>(&mut self, system: S) -> EcsResult<()> {
        let key = TypeId::of::<S>();
        if self.position(key).is_some() {
            return Err(EcsError::DuplicateRegistration(type_name::<S>().to_string()));
        }
        debug!(system = system.name(), order = self.systems.len(), "system registered");
        self.systems.push(RegisteredSystem {
            key,
            system: Box::new(system),
        });
        Ok(())
    }

    /// Register a [`FilteredSystem`] through the [`Filtered`] adapter.
    pub fn register_filtered<S: FilteredSystem<A>>(&mut self, system: S) -> EcsResult<()> {
        self.register(Filtered::new(system))
    }

    /// Remove the system of type `S` and hand it back.
    pub fn unregister<S: System<A>>(&mut self) -> EcsResult<S> {
        let index = self
            .position(TypeId::of::<S>())
            .ok_or_else(|| EcsError::UnknownRegistration(type_name::<S>().to_string()))?;
        let entry = self.systems.remove(index);
        debug!(system = entry.system.name(), "system unregistered");
        match AsAny::into_any(entry.system).downcast::<S>() {
            Ok(system) => Ok(*system),
            Err(_) => unreachable!("registry key matches the boxed system type"),
        }
    }

    pub fn get_system<S: System<A>>(&self) -> Option<&S> {
        let index = self.position(TypeId::of::<S>())?;
        AsAny::as_any(&*self.systems[index].system).downcast_ref::<S>()
    }

    pub fn get_system_mut<S: System<A>>(&mut self) -> Option<&mut S> {
        let index = self.position(TypeId::of::<S>())?;
        AsAny::as_any_mut(&mut *self.systems[index].system).downcast_mut::<S>()
    }

    pub fn contains<S: System<A>>(&self) -> bool {
        self.position(TypeId::of::<S>()).is_some()
    }

    /// System names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|entry| entry.system.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Drop every registered system and reset tick statistics.
    pub fn clear(&mut self) {
        self.systems.clear();
        self.history.clear();
        self.tick_count = 0;
    }

    /// Run one tick: every system's `update`, once, in registration order.
    ///
    /// The first failing system aborts the tick and its error is returned with
    /// the system name and tick number attached.
    pub fn update(&mut self, entities: &mut EntityManager, args: &A) -> Result<TickReport> {
        let tick = self.tick_count + 1;
        let tick_start = Instant::now();
        let mut systems = Vec::with_capacity(self.systems.len());

        debug!(tick, systems = self.systems.len(), entities = entities.count(), "tick start");

        for entry in &mut self.systems {
            let system: &mut dyn System<A> = &mut *entry.system;
            let start = Instant::now();
            system
                .update(entities, args)
                .with_context(|| format!("system `{}` failed during tick {tick}", system.name()))?;
            let duration = start.elapsed();
            debug!(tick, system = system.name(), ?duration, "system finished");
            systems.push(SystemRunReport {
                name: system.name().to_string(),
                duration,
            });
        }

        self.tick_count = tick;
        let report = TickReport {
            tick,
            duration: tick_start.elapsed(),
            systems,
        };

        if self.max_history > 0 {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(report.clone());
        }

        Ok(report)
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Recent tick reports, oldest first
    pub fn recent_reports(&self) -> impl Iterator<Item = &TickReport> {
        self.history.iter()
    }

    pub fn average_tick_time(&self) -> Option<Duration> {
        if self.history.is_empty() {
            return None;
        }
        let total: Duration = self.history.iter().map(|report| report.duration).sum();
        Some(total / self.history.len() as u32)
    }

    fn position(&self, key: TypeId) -> Option<usize> {
        self.systems.iter().position(|entry| entry.key == key)
    }
}

impl<A: 'static> Default for SystemManager<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityId;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct First {
        log: Log,
    }

    impl System<u32> for First {
        fn update(&mut self, _entities: &mut EntityManager, year: &u32) -> Result<()> {
            self.log.lock().unwrap().push(format!("first@{year}"));
            Ok(())
        }
    }

    struct Second {
        log: Log,
        calls: u32,
    }

    impl System<u32> for Second {
        fn update(&mut self, _entities: &mut EntityManager, year: &u32) -> Result<()> {
            self.calls += 1;
            self.log.lock().unwrap().push(format!("second@{year}"));
            Ok(())
        }
    }

    struct Broken;

    impl System<u32> for Broken {
        fn process_entity(
            &mut self,
            _entity: EntityId,
            _entities: &mut EntityManager,
            _args: &u32,
        ) -> Result<()> {
            anyhow::bail!("boom")
        }
    }

    fn manager(log: &Log) -> SystemManager<u32> {
        let mut systems = SystemManager::new();
        systems.register(First { log: log.clone() }).unwrap();
        systems
            .register(Second {
                log: log.clone(),
                calls: 0,
            })
            .unwrap();
        systems
    }

    #[test]
    fn test_update_runs_in_registration_order() {
        let log = Log::default();
        let mut systems = manager(&log);
        let mut entities = EntityManager::new();

        systems.update(&mut entities, &1000).unwrap();
        systems.update(&mut entities, &1001).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first@1000", "second@1000", "first@1001", "second@1001"]
        );
        assert_eq!(systems.tick_count(), 2);
        assert_eq!(systems.get_system::<Second>().unwrap().calls, 2);
    }

    #[test]
    fn test_duplicate_registration_leaves_registry_unchanged() {
        let log = Log::default();
        let mut systems = manager(&log);

        let err = systems.register(First { log: log.clone() }).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateRegistration(_)));
        assert_eq!(systems.names(), vec!["First", "Second"]);
    }

    #[test]
    fn test_unregister() {
        let log = Log::default();
        let mut systems = manager(&log);

        let removed = systems.unregister::<First>().unwrap();
        assert!(Arc::ptr_eq(&removed.log, &log));
        assert!(!systems.contains::<First>());
        assert!(matches!(
            systems.unregister::<First>(),
            Err(EcsError::UnknownRegistration(_))
        ));
        assert_eq!(systems.len(), 1);
    }

    #[test]
    fn test_get_system_mut() {
        let log = Log::default();
        let mut systems = manager(&log);
        systems.get_system_mut::<Second>().unwrap().calls = 41;

        systems.update(&mut EntityManager::new(), &0).unwrap();
        assert_eq!(systems.get_system::<Second>().unwrap().calls, 42);
        assert!(systems.get_system::<Broken>().is_none());
    }

    #[test]
    fn test_failure_aborts_tick_with_context() {
        let log = Log::default();
        let mut systems = SystemManager::new();
        systems.register(Broken).unwrap();
        systems.register(First { log: log.clone() }).unwrap();

        let mut entities = EntityManager::new();
        entities.create_entity(());

        let err = systems.update(&mut entities, &7).unwrap_err();
        assert!(err.to_string().contains("Broken"));
        assert_eq!(err.root_cause().to_string(), "boom");
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(systems.tick_count(), 0);
    }

    #[test]
    fn test_tick_reports() {
        let log = Log::default();
        let mut systems = manager(&log).with_history(2);
        let mut entities = EntityManager::new();
        assert!(systems.average_tick_time().is_none());

        for year in 0..3 {
            let report = systems.update(&mut entities, &year).unwrap();
            assert_eq!(report.systems.len(), 2);
            assert_eq!(report.systems[0].name, "First");
        }

        let ticks: Vec<_> = systems.recent_reports().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![2, 3]);
        assert!(systems.average_tick_time().is_some());
    }

    #[test]
    fn test_clear() {
        let log = Log::default();
        let mut systems = manager(&log);
        systems.update(&mut EntityManager::new(), &0).unwrap();

        systems.clear();
        assert!(systems.is_empty());
        assert_eq!(systems.tick_count(), 0);
        systems.register(First { log }).unwrap();
        assert_eq!(systems.len(), 1);
    }
}
