pub mod evolution;
pub mod manager;
pub mod traits;

pub use evolution::{EvolutionConfig, SelectionMethod, TrackingMethod};
pub use manager::{AppConfig, ConfigManager, GrammarConfig};
pub use traits::ConfigSection;
