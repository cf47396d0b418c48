//! Tour Constructor
//!
//! One ant walks a Hamiltonian cycle, picking each next city by roulette
//! wheel over `tau(i, j)^alpha * (1 / d(i, j))^beta`.

use super::pheromone::PheromoneMatrix;
use crate::geometry::{CityId, DistanceMatrix};
use rand::Rng;

/// A closed tour: a permutation of all city ids plus its cycle length.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    pub route: Vec<CityId>,
    pub length: f64,
}

/// Per-generation state of a single TSP ant.
#[derive(Clone, Debug)]
pub struct Ant {
    current: CityId,
    route: Vec<CityId>,
    visited: Vec<bool>,
    length: f64,
}

impl Ant {
    pub fn new(start: CityId, num_cities: usize) -> Self {
        let mut visited = vec![false; num_cities];
        visited[start] = true;
        let mut route = Vec::with_capacity(num_cities);
        route.push(start);
        Ant {
            current: start,
            route,
            visited,
            length: 0.0,
        }
    }

    pub fn current(&self) -> CityId {
        self.current
    }

    pub fn route(&self) -> &[CityId] {
        &self.route
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn unvisited(&self) -> impl Iterator<Item = CityId> + '_ {
        self.visited
            .iter()
            .enumerate()
            .filter_map(|(i, &seen)| if seen { None } else { Some(i) })
    }

    pub fn is_complete(&self) -> bool {
        self.route.len() == self.visited.len()
    }

    /// Roulette-wheel choice among the unvisited cities.
    ///
    /// A zero distance (duplicate coordinates) contributes zero heuristic
    /// weight; if every candidate weighs zero the choice is uniform.
    pub fn select_next<R: Rng + ?Sized>(
        &self,
        distances: &DistanceMatrix,
        pheromone: &PheromoneMatrix,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Option<CityId> {
        let candidates: Vec<CityId> = self.unvisited().collect();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&j| {
                let d = distances.get(self.current, j);
                let eta = if d > 0.0 { 1.0 / d } else { 0.0 };
                pheromone.get(self.current, j).powf(alpha) * eta.powf(beta)
            })
            .collect();
        roulette_select(&weights, rng).map(|k| candidates[k])
    }

    pub fn visit(&mut self, city: CityId, distances: &DistanceMatrix) {
        if self.visited[city] {
            return;
        }
        self.length += distances.get(self.current, city);
        self.visited[city] = true;
        self.route.push(city);
        self.current = city;
    }

    /// Close the cycle back to the start and hand over the finished tour.
    pub fn into_tour(self, distances: &DistanceMatrix) -> Tour {
        let closing = self
            .route
            .first()
            .map(|&start| distances.get(self.current, start))
            .unwrap_or(0.0);
        Tour {
            length: self.length + closing,
            route: self.route,
        }
    }
}

/// Build one complete tour starting at `start`.
pub fn construct_tour<R: Rng + ?Sized>(
    start: CityId,
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Tour {
    let mut ant = Ant::new(start, distances.len());
    while !ant.is_complete() {
        match ant.select_next(distances, pheromone, alpha, beta, rng) {
            Some(next) => ant.visit(next, distances),
            None => break,
        }
    }
    ant.into_tour(distances)
}

/// Index drawn with probability proportional to `weights[i]`.
///
/// Fallbacks, so a choice is always made for non-empty input:
/// - infinite weights: uniform among the infinite ones
/// - all weights zero (or NaN): uniform among all
/// - a sum that overflows: weights are rescaled by their maximum
pub fn roulette_select<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let infinite: Vec<usize> = (0..weights.len())
        .filter(|&i| weights[i] == f64::INFINITY)
        .collect();
    if !infinite.is_empty() {
        return Some(infinite[rng.gen_range(0..infinite.len())]);
    }

    let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let mut total: f64 = weights.iter().map(|&w| clean(w)).sum();
    let mut scale = 1.0;
    if total.is_infinite() {
        let max = weights.iter().map(|&w| clean(w)).fold(0.0, f64::max);
        scale = 1.0 / max;
        total = weights.iter().map(|&w| clean(w) * scale).sum();
    }
    if total <= 0.0 || !total.is_finite() {
        return Some(rng.gen_range(0..weights.len()));
    }

    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        let w = clean(w) * scale;
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if target < cumulative {
            return Some(i);
        }
    }
    // rounding left the target just past the final bucket
    Some(last_positive)
}
