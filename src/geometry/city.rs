use super::distance::DistanceMatrix;
use super::{Point, Topology};
use crate::core::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Insertion-order identifier of a city.
pub type CityId = usize;

/// An immutable point of the TSP instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub position: Point,
}

impl City {
    pub fn new(id: CityId, x: f64, y: f64) -> Self {
        City {
            id,
            position: Point::new(x, y),
        }
    }
}

/// City store with a lazily rebuilt pairwise distance cache.
///
/// Any structural change (new city, clear, topology switch) drops the cache;
/// the next call to [`CitySet::distances`] recomputes it.
#[derive(Clone, Debug)]
pub struct CitySet {
    cities: Vec<City>,
    topology: Topology,
    cache: Option<DistanceMatrix>,
}

impl CitySet {
    pub fn new(topology: Topology) -> Self {
        CitySet {
            cities: Vec::new(),
            topology,
            cache: None,
        }
    }

    pub fn add(&mut self, x: f64, y: f64) -> EngineResult<CityId> {
        if !x.is_finite() || !y.is_finite() {
            return Err(EngineError::InvalidCoordinate { x, y });
        }
        let id = self.cities.len();
        self.cities.push(City::new(id, x, y));
        self.cache = None;
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.cities.clear();
        self.cache = None;
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, id: CityId) -> Option<&City> {
        self.cities.get(id)
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn set_topology(&mut self, topology: Topology) {
        if self.topology != topology {
            self.topology = topology;
            self.cache = None;
        }
    }

    /// Distance between two cities without touching the cache.
    pub fn distance(&self, i: CityId, j: CityId) -> Option<f64> {
        let a = self.cities.get(i)?;
        let b = self.cities.get(j)?;
        Some(self.topology.distance(a.position, b.position))
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Full distance matrix, recomputed if the city set changed since the last read.
    pub fn distances(&mut self) -> &DistanceMatrix {
        let cities = &self.cities;
        let topology = self.topology;
        self.cache
            .get_or_insert_with(|| DistanceMatrix::build(cities, topology))
    }
}
