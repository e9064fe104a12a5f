pub mod favorability;
pub mod scoring;
pub mod window;

pub use favorability::FavorabilityCriteria;
pub use scoring::SoilScorer;
pub use window::{build_calendar, MAX_CALENDAR_DAYS};
