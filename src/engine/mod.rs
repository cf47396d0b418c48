//! Engine facades
//!
//! The call surface consumed by presentation code: the TSP engine, the
//! foraging simulation, their animation clock and stats, and the surface
//! registry.

pub mod clock;
pub mod foraging;
pub mod registry;
pub mod stats;
pub mod tsp;

#[cfg(feature = "python")]
pub mod py_api;

mod scenario_test;

pub use clock::AnimationClock;
pub use foraging::ForagingSimulation;
pub use registry::{EngineRegistry, ForagingRegistry};
pub use stats::{ColonyStats, SimulationState, SimulationStats};
pub use tsp::AcoEngine;
