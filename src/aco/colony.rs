//! Colony / Generation Scheduler
//!
//! Owns the distance snapshot, the pheromone matrix and the best tour.
//! One call to [`Colony::run_iteration`] is one generation: every ant builds
//! a tour, trails evaporate, every ant deposits, the counter advances.

use super::ant::{construct_tour, Tour};
use super::pheromone::PheromoneMatrix;
use crate::core::config::{AcoParam, ColonyParams, DepositRule, StartStrategy};
use crate::core::error::{EngineError, EngineResult};
use crate::geometry::{CityId, DistanceMatrix};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

pub const MIN_CITIES: usize = 3;

/// Length statistics of the tours built in one generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_length: f64,
    pub mean_length: f64,
    pub worst_length: f64,
}

#[derive(Debug)]
pub struct Colony {
    distances: DistanceMatrix,
    pheromone: PheromoneMatrix,
    params: ColonyParams,
    best: Option<Tour>,
    generation: usize,
    last_generation: Option<GenerationSummary>,
    rng: StdRng,
}

impl Colony {
    pub fn new(distances: DistanceMatrix, params: ColonyParams, rng: StdRng) -> EngineResult<Self> {
        if distances.len() < MIN_CITIES {
            return Err(EngineError::invalid(format!(
                "a colony needs at least {} cities, got {}",
                MIN_CITIES,
                distances.len()
            )));
        }
        params.validate()?;

        let tau0 = params
            .initial_pheromone
            .unwrap_or_else(|| estimate_initial_pheromone(&distances, params.num_ants));
        let mut pheromone = PheromoneMatrix::new(distances.len(), tau0)?;
        if let Some(max) = params.pheromone_ceiling {
            pheromone = pheromone.with_ceiling(max);
        }

        info!(
            "🐜 [Colony] Initialized: {} cities, {} ants, {} generations (rho={}, alpha={}, beta={}, tau0={:.5})",
            distances.len(),
            params.num_ants,
            params.max_generations,
            params.evaporation_rate,
            params.alpha,
            params.beta,
            tau0
        );

        Ok(Colony {
            distances,
            pheromone,
            params,
            best: None,
            generation: 0,
            last_generation: None,
            rng,
        })
    }

    /// Advance one generation.
    ///
    /// Returns `true` while generations remain and `false` once the cap is
    /// reached; further calls after that do no work.
    pub fn run_iteration(&mut self) -> EngineResult<bool> {
        if self.is_complete() {
            return Ok(false);
        }

        let n = self.distances.len();
        let ColonyParams {
            num_ants,
            alpha,
            beta,
            evaporation_rate,
            deposit_q,
            deposit_rule,
            start_strategy,
            ..
        } = self.params;

        let mut tours = Vec::with_capacity(num_ants);
        for k in 0..num_ants {
            let start = match start_strategy {
                StartStrategy::Cyclic => k % n,
                StartStrategy::Random => self.rng.gen_range(0..n),
            };
            tours.push(construct_tour(
                start,
                &self.distances,
                &self.pheromone,
                alpha,
                beta,
                &mut self.rng,
            ));
        }

        let summary = summarize(self.generation + 1, &tours);
        if let Some(iteration_best) = tours.iter().min_by(|a, b| a.length.total_cmp(&b.length)) {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| iteration_best.length < best.length);
            if improved {
                info!(
                    "🏆 [Colony] Generation {}: new best tour {:.3}",
                    self.generation + 1,
                    iteration_best.length
                );
                self.best = Some(iteration_best.clone());
            }
        }

        self.pheromone.evaporate(evaporation_rate)?;
        for tour in &tours {
            if tour.length > 0.0 {
                self.pheromone.deposit_tour(&tour.route, deposit_q / tour.length);
            }
        }
        if let DepositRule::Elitist { weight } = deposit_rule {
            if let Some(best) = &self.best {
                if best.length > 0.0 {
                    self.pheromone
                        .deposit_tour(&best.route, weight * deposit_q / best.length);
                }
            }
        }

        self.generation += 1;
        self.last_generation = Some(summary);
        debug!(
            "[Colony] Generation {}/{}: best={:.3} mean={:.3} worst={:.3}",
            self.generation,
            self.params.max_generations,
            summary.best_length,
            summary.mean_length,
            summary.worst_length
        );

        Ok(self.generation < self.params.max_generations)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn best_distance(&self) -> Option<f64> {
        self.best.as_ref().map(|t| t.length)
    }

    pub fn best_route(&self) -> Option<&[CityId]> {
        self.best.as_ref().map(|t| t.route.as_slice())
    }

    pub fn is_complete(&self) -> bool {
        self.generation >= self.params.max_generations
    }

    pub fn last_generation(&self) -> Option<GenerationSummary> {
        self.last_generation
    }

    pub fn params(&self) -> &ColonyParams {
        &self.params
    }

    /// Live parameter change, observed by the next generation.
    pub fn set_param(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        self.params.set(param, value)?;
        debug!("[Colony] {} set to {}", param, value);
        Ok(())
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

/// tau0 = m / L_nn: ant count over a greedy tour length.
fn estimate_initial_pheromone(distances: &DistanceMatrix, num_ants: usize) -> f64 {
    let length = distances.tour_length(&distances.nearest_neighbor_tour(0));
    if length > 0.0 {
        num_ants as f64 / length
    } else {
        1.0
    }
}

fn summarize(generation: usize, tours: &[Tour]) -> GenerationSummary {
    let lengths = tours.iter().map(|t| t.length);
    let best = lengths.clone().fold(f64::INFINITY, f64::min);
    let worst = lengths.clone().fold(0.0, f64::max);
    let mean = if tours.is_empty() {
        0.0
    } else {
        lengths.sum::<f64>() / tours.len() as f64
    };
    GenerationSummary {
        generation,
        best_length: best,
        mean_length: mean,
        worst_length: worst,
    }
}
