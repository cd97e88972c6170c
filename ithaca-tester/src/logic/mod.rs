pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::GameplayStrategy;
pub use seeds::{derive_iteration_seed, resolve_seed_inputs};
pub use simulation::{GameRecord, SimulationConfig, run_game};
