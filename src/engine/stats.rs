use crate::aco::GenerationSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Foraging run state: `idle -> running <-> paused -> idle` (via reset).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl SimulationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationState::Idle => "idle",
            SimulationState::Running => "running",
            SimulationState::Paused => "paused",
        }
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified foraging stats.
///
/// `best_distance` carries the cumulative amount of food collected.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationStats {
    pub iteration: u64,
    pub best_distance: f64,
    pub cities_count: usize,
    pub ants_count: usize,
    pub state: SimulationState,
}

/// Snapshot of the TSP colony for status displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColonyStats {
    pub generation: usize,
    pub max_generations: usize,
    pub best_distance: Option<f64>,
    pub cities_count: usize,
    pub ants_count: usize,
    pub running: bool,
    pub complete: bool,
    pub last_generation: Option<GenerationSummary>,
}
