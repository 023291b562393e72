pub mod bootstrap;
pub mod chart;
pub mod export;
pub mod orchestrator;

pub use bootstrap::build_orchestrator;
pub use chart::RatingChart;
pub use orchestrator::{cache_key, ChartOutcome, Orchestrator, ResultCache};
