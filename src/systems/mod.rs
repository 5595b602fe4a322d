mod aging;
mod calendar;
mod chronicle;

pub use aging::AgingSystem;
pub use calendar::CalendarSystem;
pub use chronicle::ChronicleSystem;

/// Argument handed to every simulation system each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickArgs {
    pub years: u32,
}

impl Default for TickArgs {
    fn default() -> Self {
        Self { years: 1 }
    }
}
