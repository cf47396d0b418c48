//! Foraging Swarm
//!
//! Continuous-space ants that search for food, carry it home and coordinate
//! through a decaying trail grid.

pub mod forager;
pub mod pheromone;
pub mod world;

pub use forager::{AntState, ForagingAnt};
pub use pheromone::PheromoneField;
pub use world::{FoodSource, ForagingWorld, Nest};
