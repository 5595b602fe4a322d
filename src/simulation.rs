//! Driver pairing one entity manager with one system manager

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    component_types,
    components::{Age, Calendar, Chronicle, Deceased, Figure},
    ecs::{EntityManager, Name, SystemManager, TickReport},
    scenario::Scenario,
    systems::{AgingSystem, CalendarSystem, ChronicleSystem, TickArgs},
};

/// End-of-run view of the simulated world.
#[derive(Debug, Clone, Serialize)]
pub struct ChronicleSummary {
    pub scenario: String,
    pub ticks: u64,
    pub year: i32,
    pub living: usize,
    pub deceased: usize,
    pub entries: Vec<String>,
}

pub struct Simulation {
    scenario_name: String,
    entities: EntityManager,
    systems: SystemManager<TickArgs>,
    args: TickArgs,
}

impl Simulation {
    /// An empty world at `start_year` with the standard systems registered
    /// in execution order: calendar, aging, chronicle.
    pub fn new(
        scenario_name: impl Into<String>,
        start_year: i32,
        years_per_tick: u32,
    ) -> Result<Self> {
        let mut systems = SystemManager::new();
        systems.register(CalendarSystem::new())?;
        systems.register_filtered(AgingSystem::new())?;
        systems.register_filtered(ChronicleSystem::new())?;

        let mut entities = EntityManager::new();
        entities.create_entity((
            Name::new("world"),
            Calendar { year: start_year },
            Chronicle::default(),
        ));

        Ok(Self {
            scenario_name: scenario_name.into(),
            entities,
            systems,
            args: TickArgs {
                years: years_per_tick,
            },
        })
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        scenario.validate()?;
        let mut simulation =
            Self::new(&scenario.name, scenario.start_year, scenario.years_per_tick)?;
        for seed in scenario.figure_seeds() {
            let figure = Figure {
                birth_year: seed.birth_year,
                lifespan: seed.lifespan,
            };
            let age = Age(figure.age_in(scenario.start_year));
            simulation
                .entities
                .create_entity((Name::new(seed.name), figure, age));
        }
        info!(
            scenario = %scenario.name,
            figures = scenario.figures.len(),
            start_year = scenario.start_year,
            "world seeded"
        );
        Ok(simulation)
    }

    /// Advance the world by one tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        let report = self.systems.update(&mut self.entities, &self.args)?;
        debug!(tick = report.tick, year = ?self.year().ok(), "tick complete");
        Ok(report)
    }

    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.run_with_hook(ticks, |_| {})
    }

    pub fn run_with_hook<F>(&mut self, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&TickReport),
    {
        for _ in 0..ticks {
            let report = self.tick()?;
            hook(&report);
        }
        Ok(())
    }

    pub fn year(&self) -> Result<i32> {
        self.entities
            .get_singleton_component::<Calendar>()
            .map(|calendar| calendar.year)
            .ok_or_else(|| anyhow!("no entity holds a Calendar"))
    }

    pub fn summary(&self) -> Result<ChronicleSummary> {
        let figures = self.entities.count_holders::<Figure>();
        let deceased = self
            .entities
            .get_entities_with_components(&component_types![Figure, Deceased])
            .len();
        let entries = self
            .entities
            .get_singleton_component::<Chronicle>()
            .map(|chronicle| chronicle.entries.clone())
            .unwrap_or_default();

        Ok(ChronicleSummary {
            scenario: self.scenario_name.clone(),
            ticks: self.systems.tick_count(),
            year: self.year()?,
            living: figures - deceased,
            deceased,
            entries,
        })
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn systems(&self) -> &SystemManager<TickArgs> {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut SystemManager<TickArgs> {
        &mut self.systems
    }
}
