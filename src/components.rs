use serde::Serialize;

use crate::ecs::Component;

/// World clock. Expected on exactly one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub year: i32,
}

impl Component for Calendar {}

/// A historical figure's fixed traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    pub birth_year: i32,
    pub lifespan: u32,
}

impl Figure {
    pub fn age_in(&self, year: i32) -> u32 {
        u32::try_from(i64::from(year) - i64::from(self.birth_year)).unwrap_or(0)
    }
}

impl Component for Figure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(pub u32);

impl Component for Age {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deceased {
    pub year: i32,
}

impl Component for Deceased {}

/// Marks a death that already has a chronicle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded;

impl Component for Recorded {}

/// Append-only list of notable events. Expected on exactly one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chronicle {
    pub entries: Vec<String>,
}

impl Component for Chronicle {}
