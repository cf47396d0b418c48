//! AcoSwarm Core - Ant Colony Optimization Engine
//!
//! Two caller-driven simulations sharing one set of mechanics:
//! probabilistic path choice weighted by trail and distance, evaporation,
//! and reinforcement.
//!
//! - [`AcoEngine`] solves the Traveling Salesman Problem over user-placed
//!   cities, one generation per [`AcoEngine::run_iteration`] call.
//! - [`ForagingSimulation`] moves ants between a nest and food sources on a
//!   continuous canvas, one tick per [`ForagingSimulation::step_simulation`].
//!
//! Nothing runs in the background: the embedding animation loop drives
//! every step.

pub mod aco;
pub mod core;
pub mod engine;
pub mod geometry;
pub mod swarm;
pub mod utils;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use crate::aco::{Colony, GenerationSummary, PheromoneMatrix, Tour};
pub use crate::core::config::{
    AcoParam, ColonyParams, DepositRule, EngineConfig, ForagingParams, StartStrategy,
};
pub use crate::core::error::{EngineError, EngineResult};
pub use crate::engine::{
    AcoEngine, AnimationClock, EngineRegistry, ForagingRegistry, ForagingSimulation,
    SimulationState, SimulationStats,
};
pub use crate::geometry::{Bounds, Point, Topology};
pub use crate::utils::TourBenchmark;

/// Initialize tracing for the library.
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "setup_logging", signature = (level=None))]
fn py_setup_logging(level: Option<String>) {
    setup_logging(level);
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn acoswarm_core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_setup_logging, m)?)?;

    // TSP colony
    m.add_class::<engine::py_api::PyAcoEngine>()?;

    // Foraging
    m.add_class::<engine::py_api::PyForagingSimulation>()?;

    Ok(())
}
