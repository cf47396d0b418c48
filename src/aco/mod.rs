//! ACO Engine (TSP)
//!
//! Pheromone matrix, tour construction and the generation scheduler.

pub mod ant;
pub mod colony;
pub mod pheromone;


pub use ant::{construct_tour, roulette_select, Ant, Tour};
pub use colony::{Colony, GenerationSummary, MIN_CITIES};
pub use pheromone::PheromoneMatrix;
