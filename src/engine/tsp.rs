//! TSP Engine
//!
//! Caller-driven facade over the city set, the colony and the animation
//! clock. The presentation layer calls [`AcoEngine::run_iteration`] (or
//! [`AcoEngine::advance_frame`]) once per frame; nothing runs in the
//! background.

use super::clock::AnimationClock;
use super::stats::ColonyStats;
use crate::aco::{Colony, MIN_CITIES};
use crate::core::config::{AcoParam, ColonyParams, EngineConfig};
use crate::core::error::{EngineError, EngineResult};
use crate::geometry::{Bounds, City, CityId, CitySet, Topology};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

#[derive(Debug)]
pub struct AcoEngine {
    config: EngineConfig,
    cities: CitySet,
    colony: Option<Colony>,
    clock: AnimationClock,
    running: bool,
    rng: StdRng,
}

impl AcoEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(AcoEngine {
            cities: CitySet::new(Topology::Euclidean),
            clock: AnimationClock::new(&config.clock),
            colony: None,
            running: false,
            rng,
            config,
        })
    }

    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> EngineResult<Self> {
        Self::new(EngineConfig::default().with_seed(seed))
    }

    // ---- cities ----

    /// Append a city. Any existing colony is discarded: its pheromone
    /// matrix no longer matches the city set.
    pub fn add_city(&mut self, x: f64, y: f64) -> EngineResult<CityId> {
        let id = self.cities.add(x, y)?;
        self.discard_colony("city set changed");
        Ok(id)
    }

    pub fn clear_cities(&mut self) {
        self.cities.clear();
        self.discard_colony("cities cleared");
        self.clock.reset();
    }

    pub fn get_city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn cities(&self) -> &[City] {
        self.cities.cities()
    }

    /// Switch between plain and wraparound distances.
    ///
    /// Returns `true` if the topology changed; a changed topology discards
    /// the colony like any other change to the distance model.
    pub fn set_torus_mode(&mut self, enabled: bool) -> bool {
        let bounds = Bounds::new(self.config.canvas.width, self.config.canvas.height);
        let topology = Topology::from_flag(enabled, bounds);
        if self.cities.topology() == topology {
            return false;
        }
        self.cities.set_topology(topology);
        self.discard_colony("topology changed");
        true
    }

    pub fn torus_mode(&self) -> bool {
        self.cities.topology().is_torus()
    }

    pub fn distance(&self, i: CityId, j: CityId) -> Option<f64> {
        self.cities.distance(i, j)
    }

    // ---- colony lifecycle ----

    pub fn initialize_colony(
        &mut self,
        num_ants: usize,
        max_generations: usize,
        evaporation_rate: f64,
        alpha: f64,
        beta: f64,
    ) -> EngineResult<()> {
        let params = ColonyParams {
            num_ants,
            max_generations,
            evaporation_rate,
            alpha,
            beta,
            ..self.config.colony.clone()
        };
        self.initialize_colony_with(params)
    }

    /// Build a fresh colony over the current cities. On failure the
    /// previous colony, if any, is left untouched.
    pub fn initialize_colony_with(&mut self, params: ColonyParams) -> EngineResult<()> {
        if self.cities.len() < MIN_CITIES {
            return Err(EngineError::invalid(format!(
                "a colony needs at least {} cities, got {}",
                MIN_CITIES,
                self.cities.len()
            )));
        }
        params.validate()?;

        let distances = self.cities.distances().clone();
        let rng = StdRng::seed_from_u64(self.rng.gen());
        let colony = Colony::new(distances, params, rng)?;
        self.colony = Some(colony);
        self.running = false;
        self.clock.reset();
        Ok(())
    }

    /// Mark the engine as running for frame-driven stepping.
    ///
    /// Returns `false` (no-op) when already running or when the colony has
    /// exhausted its generations.
    pub fn start(&mut self) -> EngineResult<bool> {
        let colony = self
            .colony
            .as_ref()
            .ok_or(EngineError::NotInitialized("colony"))?;
        if self.running || colony.is_complete() {
            debug!(
                "[Colony] start ignored (running={}, complete={})",
                self.running,
                colony.is_complete()
            );
            return Ok(false);
        }
        self.running = true;
        self.clock.reset();
        info!("▶️ [Colony] Started at generation {}", colony.generation());
        Ok(true)
    }

    pub fn stop(&mut self) -> bool {
        if !self.running {
            debug!("[Colony] stop ignored: not running");
            return false;
        }
        self.running = false;
        info!("⏸️ [Colony] Stopped at generation {}", self.get_generation());
        true
    }

    /// One generation. `false` once the generation cap is reached; the
    /// engine stops itself at that point.
    pub fn run_iteration(&mut self) -> EngineResult<bool> {
        let colony = self
            .colony
            .as_mut()
            .ok_or(EngineError::NotInitialized("colony"))?;
        let more = colony.run_iteration()?;
        if !more && self.running {
            self.running = false;
            info!(
                "🏁 [Colony] Complete after {} generations, best {:.3}",
                colony.generation(),
                colony.best_distance().unwrap_or(f64::INFINITY)
            );
        }
        Ok(more)
    }

    // ---- animation ----

    pub fn update_animation(&mut self, timestamp_ms: f64) -> bool {
        self.clock.update(timestamp_ms)
    }

    pub fn set_animation_speed(&mut self, speed: f64) -> EngineResult<()> {
        self.clock.set_speed(speed)
    }

    /// Frame callback: runs one generation when running and a step is due.
    /// Returns whether a generation ran.
    pub fn advance_frame(&mut self, timestamp_ms: f64) -> EngineResult<bool> {
        if !self.running {
            return Ok(false);
        }
        if !self.clock.update(timestamp_ms) {
            return Ok(false);
        }
        self.run_iteration()?;
        Ok(true)
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Live change, observed by the next generation. Also becomes the
    /// default for later colonies.
    pub fn set_param(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        if let Some(colony) = self.colony.as_mut() {
            colony.set_param(param, value)?;
        }
        self.config.colony.set(param, value)
    }

    // ---- queries ----

    pub fn get_generation(&self) -> usize {
        self.colony.as_ref().map_or(0, Colony::generation)
    }

    pub fn get_best_distance(&self) -> Option<f64> {
        self.colony.as_ref().and_then(Colony::best_distance)
    }

    pub fn get_best_route(&self) -> Vec<CityId> {
        self.colony
            .as_ref()
            .and_then(Colony::best_route)
            .map(<[CityId]>::to_vec)
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.colony.as_ref().is_some_and(Colony::is_complete)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn colony(&self) -> Option<&Colony> {
        self.colony.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> ColonyStats {
        let colony = self.colony.as_ref();
        ColonyStats {
            generation: self.get_generation(),
            max_generations: colony.map_or(0, |c| c.params().max_generations),
            best_distance: self.get_best_distance(),
            cities_count: self.cities.len(),
            ants_count: colony.map_or(0, |c| c.params().num_ants),
            running: self.running,
            complete: self.is_complete(),
            last_generation: colony.and_then(Colony::last_generation),
        }
    }

    fn discard_colony(&mut self, reason: &str) {
        if self.colony.take().is_some() {
            debug!("[Colony] Discarded: {}", reason);
        }
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(points: &[(f64, f64)]) -> AcoEngine {
        let mut engine = AcoEngine::seeded(99).unwrap();
        for &(x, y) in points {
            engine.add_city(x, y).unwrap();
        }
        engine
    }

    const TRIANGLE: [(f64, f64); 3] = [(0.0, 0.0), (30.0, 0.0), (0.0, 40.0)];

    #[test]
    fn queries_before_initialize() {
        let engine = engine_with(&TRIANGLE);
        assert_eq!(engine.get_city_count(), 3);
        assert_eq!(engine.get_generation(), 0);
        assert_eq!(engine.get_best_distance(), None);
        assert!(engine.get_best_route().is_empty());
        assert!(!engine.is_complete());
        assert!(!engine.is_running());
    }

    #[test]
    fn stepping_requires_a_colony() {
        let mut engine = engine_with(&TRIANGLE);
        assert!(matches!(engine.run_iteration(), Err(EngineError::NotInitialized(_))));
        assert!(matches!(engine.start(), Err(EngineError::NotInitialized(_))));
    }

    #[test]
    fn non_finite_city_is_rejected() {
        let mut engine = engine_with(&[]);
        assert!(matches!(
            engine.add_city(f64::INFINITY, 0.0),
            Err(EngineError::InvalidCoordinate { .. })
        ));
        assert_eq!(engine.get_city_count(), 0);
    }

    #[test]
    fn failed_initialize_keeps_previous_colony() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(5, 10, 0.1, 1.0, 2.0).unwrap();
        engine.run_iteration().unwrap();
        assert!(engine.initialize_colony(0, 10, 0.1, 1.0, 2.0).is_err());
        assert!(engine.initialize_colony(5, 10, 1.5, 1.0, 2.0).is_err());
        assert_eq!(engine.get_generation(), 1);
    }

    #[test]
    fn adding_a_city_discards_the_colony() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(5, 10, 0.1, 1.0, 2.0).unwrap();
        engine.start().unwrap();
        engine.add_city(10.0, 10.0).unwrap();
        assert!(engine.colony().is_none());
        assert!(!engine.is_running());
        assert!(matches!(engine.run_iteration(), Err(EngineError::NotInitialized(_))));
    }

    #[test]
    fn start_stop_are_idempotent() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(5, 10, 0.1, 1.0, 2.0).unwrap();
        assert!(!engine.stop());
        assert!(engine.start().unwrap());
        assert!(!engine.start().unwrap());
        assert!(engine.is_running());
        assert!(engine.stop());
        assert!(!engine.stop());
    }

    #[test]
    fn frames_drive_generations() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(3, 2, 0.1, 1.0, 2.0).unwrap();
        assert!(!engine.advance_frame(0.0).unwrap());

        engine.start().unwrap();
        assert!(!engine.advance_frame(0.0).unwrap());
        assert!(engine.advance_frame(100.0).unwrap());
        assert_eq!(engine.get_generation(), 1);
        assert!(engine.advance_frame(200.0).unwrap());
        assert_eq!(engine.get_generation(), 2);
        assert!(engine.is_complete());
        assert!(!engine.is_running());
        assert!(!engine.advance_frame(300.0).unwrap());
        assert!(!engine.start().unwrap());
    }

    #[test]
    fn torus_toggle_discards_colony() {
        let mut engine = engine_with(&[(5.0, 300.0), (795.0, 300.0), (400.0, 100.0)]);
        let plain = engine.distance(0, 1).unwrap();
        engine.initialize_colony(3, 5, 0.1, 1.0, 2.0).unwrap();
        assert!(engine.set_torus_mode(true));
        assert!(!engine.set_torus_mode(true));
        assert!(engine.colony().is_none());
        assert!(engine.distance(0, 1).unwrap() < plain);
    }

    #[test]
    fn torus_distance_for_off_canvas_cities() {
        let mut engine = engine_with(&[(0.0, 0.0), (2000.0, 0.0), (10.0, 10.0), (-1590.0, 1810.0)]);
        engine.set_torus_mode(true);
        assert!((engine.distance(0, 1).unwrap() - 400.0).abs() < 1e-9);
        assert!(engine.distance(2, 3).unwrap() < 1e-9);
    }

    #[test]
    fn live_params_flow_to_colony_and_defaults() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(5, 10, 0.1, 1.0, 2.0).unwrap();
        engine.set_param(AcoParam::Beta, 4.0).unwrap();
        assert_eq!(engine.colony().unwrap().params().beta, 4.0);
        assert_eq!(engine.config().colony.beta, 4.0);
        assert!(engine.set_param(AcoParam::Alpha, 11.0).is_err());
    }

    #[test]
    fn stats_snapshot() {
        let mut engine = engine_with(&TRIANGLE);
        engine.initialize_colony(4, 3, 0.1, 1.0, 2.0).unwrap();
        engine.run_iteration().unwrap();
        let stats = engine.stats();
        assert_eq!(stats.generation, 1);
        assert_eq!(stats.max_generations, 3);
        assert_eq!(stats.ants_count, 4);
        assert_eq!(stats.cities_count, 3);
        assert_eq!(stats.best_distance, Some(120.0));
        assert_eq!(stats.last_generation.unwrap().generation, 1);
    }
}
