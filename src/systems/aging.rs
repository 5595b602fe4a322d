use anyhow::{anyhow, Result};
use tracing::debug;

use crate::{
    component_types,
    components::{Age, Calendar, Deceased, Figure},
    ecs::{ComponentType, EntityFilter, EntityId, EntityManager, FilteredSystem, Name},
    systems::TickArgs,
};

/// Ages living figures against the calendar and marks those past their
/// lifespan as deceased.
pub struct AgingSystem {
    required: Vec<ComponentType>,
    filter: EntityFilter,
}

impl AgingSystem {
    pub fn new() -> Self {
        Self {
            required: component_types![Figure, Age],
            filter: EntityFilter::lacks_component::<Deceased>(),
        }
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FilteredSystem<TickArgs> for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn required_components(&self) -> &[ComponentType] {
        &self.required
    }

    fn filter(&self) -> &EntityFilter {
        &self.filter
    }

    fn process_filtered_entity(
        &mut self,
        entity: EntityId,
        entities: &mut EntityManager,
        _args: &TickArgs,
    ) -> Result<()> {
        let year = entities
            .get_singleton_component::<Calendar>()
            .map(|calendar| calendar.year)
            .ok_or_else(|| anyhow!("no entity holds a Calendar"))?;
        let Some(figure_entity) = entities.get_entity_mut(entity)? else {
            return Ok(());
        };
        let Some(figure) = figure_entity.get::<Figure>().copied() else {
            return Ok(());
        };

        let age = figure.age_in(year);
        figure_entity.add(Age(age));
        if age >= figure.lifespan {
            debug!(
                %entity,
                name = figure_entity.get::<Name>().map(Name::as_str).unwrap_or("?"),
                age,
                year,
                "figure died"
            );
            figure_entity.add(Deceased { year });
        }
        Ok(())
    }
}
