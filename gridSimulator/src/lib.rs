// Module declarations for the marbles grid game core

// Session, phases and round settlement
pub mod core {
    pub mod session;
    pub mod phase;
    pub mod commands;
    pub mod allocation;
    pub mod exploration;
    pub mod settlement;
    pub mod transition;
    pub mod autopilot;
    pub mod self_test;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod game_config;
    pub mod tech_type;
    pub mod texts;
}

// Generation technologies
pub mod models {
    pub mod plant;
    pub mod thermal;
    pub mod storage;
    pub mod variable;
    pub mod generation_unit;
}

// Weather, demand and forecasting
pub mod resources {
    pub mod state;
    pub mod generators;
    pub mod demand;
    pub mod forecast;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
    pub mod traits;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used modules
pub use crate::core::session::Session;
pub use crate::core::commands::{Command, GameEvent};
pub use crate::config::tech_type::TechType;
pub use crate::models::generation_unit::GenerationUnit;
