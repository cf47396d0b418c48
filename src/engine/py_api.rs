use super::foraging::ForagingSimulation;
use super::tsp::AcoEngine;
use crate::core::config::{AcoParam, EngineConfig};
use pyo3::prelude::*;
use pyo3::types::PyDict;

fn load_config(seed: Option<u64>, config_json: Option<&str>) -> PyResult<EngineConfig> {
    let mut config = match config_json {
        Some(json) => EngineConfig::from_json(json)?,
        None => EngineConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

/// TSP colony engine for Python callers.
#[pyclass]
pub struct PyAcoEngine {
    engine: AcoEngine,
}

#[pymethods]
impl PyAcoEngine {
    #[new]
    #[pyo3(signature = (seed=None, config_json=None))]
    pub fn new(seed: Option<u64>, config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            engine: AcoEngine::new(load_config(seed, config_json)?)?,
        })
    }

    pub fn add_city(&mut self, x: f64, y: f64) -> PyResult<usize> {
        Ok(self.engine.add_city(x, y)?)
    }

    pub fn clear_cities(&mut self) {
        self.engine.clear_cities();
    }

    pub fn get_city_count(&self) -> usize {
        self.engine.get_city_count()
    }

    #[pyo3(signature = (num_ants=20, max_generations=100, evaporation_rate=0.1, alpha=1.0, beta=2.0))]
    pub fn initialize_colony(
        &mut self,
        num_ants: usize,
        max_generations: usize,
        evaporation_rate: f64,
        alpha: f64,
        beta: f64,
    ) -> PyResult<()> {
        Ok(self
            .engine
            .initialize_colony(num_ants, max_generations, evaporation_rate, alpha, beta)?)
    }

    pub fn start(&mut self) -> PyResult<bool> {
        Ok(self.engine.start()?)
    }

    pub fn stop(&mut self) -> bool {
        self.engine.stop()
    }

    pub fn run_iteration(&mut self) -> PyResult<bool> {
        Ok(self.engine.run_iteration()?)
    }

    pub fn update_animation(&mut self, timestamp_ms: f64) -> bool {
        self.engine.update_animation(timestamp_ms)
    }

    pub fn advance_frame(&mut self, timestamp_ms: f64) -> PyResult<bool> {
        Ok(self.engine.advance_frame(timestamp_ms)?)
    }

    pub fn interpolation(&self) -> f64 {
        self.engine.clock().interpolation()
    }

    pub fn set_animation_speed(&mut self, speed: f64) -> PyResult<()> {
        Ok(self.engine.set_animation_speed(speed)?)
    }

    pub fn set_torus_mode(&mut self, enabled: bool) -> bool {
        self.engine.set_torus_mode(enabled)
    }

    pub fn set_aco_param(&mut self, name: &str, value: f64) -> PyResult<()> {
        let param: AcoParam = name.parse()?;
        Ok(self.engine.set_param(param, value)?)
    }

    pub fn get_generation(&self) -> usize {
        self.engine.get_generation()
    }

    pub fn get_best_distance(&self) -> Option<f64> {
        self.engine.get_best_distance()
    }

    pub fn get_best_route(&self) -> Vec<usize> {
        self.engine.get_best_route()
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn get_stats(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self.engine.stats();
        let dict = PyDict::new_bound(py);
        dict.set_item("generation", stats.generation)?;
        dict.set_item("max_generations", stats.max_generations)?;
        dict.set_item("best_distance", stats.best_distance)?;
        dict.set_item("cities_count", stats.cities_count)?;
        dict.set_item("ants_count", stats.ants_count)?;
        dict.set_item("running", stats.running)?;
        dict.set_item("complete", stats.complete)?;
        Ok(dict.into())
    }
}

/// Foraging simulation for Python callers.
#[pyclass]
pub struct PyForagingSimulation {
    simulation: ForagingSimulation,
}

#[pymethods]
impl PyForagingSimulation {
    #[new]
    #[pyo3(signature = (seed=None, config_json=None))]
    pub fn new(seed: Option<u64>, config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            simulation: ForagingSimulation::new(&load_config(seed, config_json)?)?,
        })
    }

    #[pyo3(signature = (x, y, quantity=None))]
    pub fn add_city(&mut self, x: f64, y: f64, quantity: Option<f64>) -> PyResult<usize> {
        let id = match quantity {
            Some(q) => self.simulation.add_food_source_with_quantity(x, y, q)?,
            None => self.simulation.add_city(x, y)?,
        };
        Ok(id)
    }

    pub fn remove_city(&mut self, x: f64, y: f64) -> usize {
        self.simulation.remove_city(x, y)
    }

    pub fn clear_cities(&mut self) {
        self.simulation.clear_cities();
    }

    pub fn start_simulation(&mut self) -> PyResult<bool> {
        Ok(self.simulation.start_simulation()?)
    }

    pub fn pause_simulation(&mut self) -> bool {
        self.simulation.pause_simulation()
    }

    pub fn reset_simulation(&mut self) {
        self.simulation.reset_simulation();
    }

    pub fn step_simulation(&mut self) -> bool {
        self.simulation.step_simulation()
    }

    pub fn update_animation(&mut self, timestamp_ms: f64) -> bool {
        self.simulation.update_animation(timestamp_ms)
    }

    pub fn advance_frame(&mut self, timestamp_ms: f64) -> bool {
        self.simulation.advance_frame(timestamp_ms)
    }

    pub fn interpolation(&self) -> f64 {
        self.simulation.interpolation()
    }

    pub fn set_aco_param(&mut self, name: &str, value: f64) -> PyResult<()> {
        Ok(self.simulation.set_aco_param(name, value)?)
    }

    pub fn set_animation_speed(&mut self, speed: f64) -> PyResult<()> {
        Ok(self.simulation.set_animation_speed(speed)?)
    }

    pub fn set_show_ant_trails(&mut self, show: bool) {
        self.simulation.set_show_ant_trails(show);
    }

    pub fn set_show_pheromone_levels(&mut self, show: bool) {
        self.simulation.set_show_pheromone_levels(show);
    }

    pub fn set_torus_mode(&mut self, enabled: bool) {
        self.simulation.set_torus_mode(enabled);
    }

    /// Ant positions as `(x, y, carrying)` tuples for drawing.
    pub fn ant_positions(&self) -> Vec<(f64, f64, bool)> {
        self.simulation
            .world()
            .ants()
            .iter()
            .map(|a| (a.position.x, a.position.y, a.is_carrying()))
            .collect()
    }

    /// Per-ant recent positions; empty while trails are hidden.
    pub fn ant_trails(&self) -> Vec<Vec<(f64, f64)>> {
        self.simulation
            .ant_trails()
            .into_iter()
            .map(|trail| trail.into_iter().map(|p| (p.x, p.y)).collect())
            .collect()
    }

    /// Row-major trail levels with the grid shape.
    pub fn pheromone_levels(&self) -> (usize, usize, Vec<f64>) {
        let field = self.simulation.world().field();
        (field.width, field.height, field.levels().to_vec())
    }

    pub fn get_stats(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self.simulation.get_stats();
        let dict = PyDict::new_bound(py);
        dict.set_item("iteration", stats.iteration)?;
        dict.set_item("best_distance", stats.best_distance)?;
        dict.set_item("cities_count", stats.cities_count)?;
        dict.set_item("ants_count", stats.ants_count)?;
        dict.set_item("state", stats.state.as_str())?;
        Ok(dict.into())
    }
}
