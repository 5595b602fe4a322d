use anyhow::{anyhow, Result};

use crate::{
    components::Calendar,
    ecs::{EntityManager, System},
    systems::TickArgs,
};

/// Advances the calendar singleton once per tick.
pub struct CalendarSystem;

impl CalendarSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalendarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<TickArgs> for CalendarSystem {
    fn name(&self) -> &str {
        "calendar"
    }

    fn update(&mut self, entities: &mut EntityManager, args: &TickArgs) -> Result<()> {
        let calendar = entities
            .get_singleton_component_mut::<Calendar>()
            .ok_or_else(|| anyhow!("no entity holds a Calendar"))?;
        let years = i32::try_from(args.years)?;
        calendar.year = calendar
            .year
            .checked_add(years)
            .ok_or_else(|| anyhow!("calendar year overflow past {}", calendar.year))?;
        Ok(())
    }
}
