use anyhow::{anyhow, Result};

use crate::{
    component_types,
    components::{Age, Chronicle, Deceased, Recorded},
    ecs::{ComponentType, EntityFilter, EntityId, EntityManager, FilteredSystem, Name},
    systems::TickArgs,
};

/// Writes one chronicle entry per death.
pub struct ChronicleSystem {
    required: Vec<ComponentType>,
    filter: EntityFilter,
}

impl ChronicleSystem {
    pub fn new() -> Self {
        Self {
            required: component_types![Deceased, Name],
            filter: EntityFilter::lacks_component::<Recorded>(),
        }
    }
}

impl Default for ChronicleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FilteredSystem<TickArgs> for ChronicleSystem {
    fn name(&self) -> &str {
        "chronicle"
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
        let Some(figure) = entities.get_entity_mut(entity)? else {
            return Ok(());
        };
        let entry = match (figure.get::<Name>(), figure.get::<Deceased>()) {
            (Some(name), Some(death)) => match figure.get::<Age>() {
                Some(Age(age)) => format!("In {}, {name} died at the age of {age}.", death.year),
                None => format!("In {}, {name} died.", death.year),
            },
            _ => return Ok(()),
        };
        figure.add(Recorded);

        entities
            .get_singleton_component_mut::<Chronicle>()
            .ok_or_else(|| anyhow!("no entity holds a Chronicle"))?
            .entries
            .push(entry);
        Ok(())
    }
}
