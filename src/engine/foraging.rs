//! Foraging Simulation
//!
//! Run-state machine, animation clock and display toggles around a
//! [`ForagingWorld`]. Food sources play the role of "cities" on the shared
//! call surface. Speed changes how often ticks fire, not how far an ant
//! travels per tick.

use super::clock::AnimationClock;
use super::stats::{SimulationState, SimulationStats};
use crate::core::config::{AcoParam, EngineConfig};
use crate::core::error::{EngineError, EngineResult};
use crate::geometry::{Bounds, Point};
use crate::swarm::ForagingWorld;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[derive(Debug)]
pub struct ForagingSimulation {
    world: ForagingWorld,
    state: SimulationState,
    clock: AnimationClock,
    show_ant_trails: bool,
    show_pheromone_levels: bool,
}

impl ForagingSimulation {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bounds = Bounds::new(config.canvas.width, config.canvas.height);
        Ok(ForagingSimulation {
            world: ForagingWorld::new(bounds, config.foraging.clone(), rng)?,
            state: SimulationState::Idle,
            clock: AnimationClock::new(&config.clock),
            show_ant_trails: true,
            show_pheromone_levels: true,
        })
    }

    // ---- food sources ----

    /// Place a food source with a randomized default quantity.
    pub fn add_city(&mut self, x: f64, y: f64) -> EngineResult<usize> {
        self.world.add_food_default(x, y)
    }

    pub fn add_food_source_with_quantity(
        &mut self,
        x: f64,
        y: f64,
        quantity: f64,
    ) -> EngineResult<usize> {
        self.world.add_food(x, y, quantity)
    }

    /// Remove food sources near a click; returns how many were removed.
    pub fn remove_city(&mut self, x: f64, y: f64) -> usize {
        self.world.remove_food_near(x, y)
    }

    /// Remove every food source and return to idle.
    pub fn clear_cities(&mut self) {
        self.world.clear_food();
        self.world.reset();
        self.state = SimulationState::Idle;
        info!("🧹 [Foraging] Food sources cleared");
    }

    // ---- run state ----

    /// `idle -> running` spawns the colony at the nest; `paused -> running`
    /// resumes. Requires at least one food source.
    pub fn start_simulation(&mut self) -> EngineResult<bool> {
        if self.world.food().is_empty() {
            return Err(EngineError::invalid("place at least one food source before starting"));
        }
        match self.state {
            SimulationState::Running => {
                debug!("[Foraging] start ignored: already running");
                Ok(false)
            }
            SimulationState::Idle => {
                self.world.spawn_colony();
                self.clock.reset();
                self.state = SimulationState::Running;
                info!(
                    "▶️ [Foraging] Started with {} ants and {} food sources",
                    self.world.ants().len(),
                    self.world.food().len()
                );
                Ok(true)
            }
            SimulationState::Paused => {
                self.clock.reset();
                self.state = SimulationState::Running;
                info!("▶️ [Foraging] Resumed at tick {}", self.world.ticks());
                Ok(true)
            }
        }
    }

    pub fn pause_simulation(&mut self) -> bool {
        if self.state != SimulationState::Running {
            debug!("[Foraging] pause ignored: state is {}", self.state);
            return false;
        }
        self.state = SimulationState::Paused;
        self.clock.reset();
        info!("⏸️ [Foraging] Paused at tick {}", self.world.ticks());
        true
    }

    /// Back to idle: ants and trails cleared, food refilled, totals zeroed.
    pub fn reset_simulation(&mut self) {
        self.world.reset();
        self.clock.reset();
        self.state = SimulationState::Idle;
        info!("🔄 [Foraging] Reset");
    }

    /// One tick. Returns `false` without doing anything unless running.
    pub fn step_simulation(&mut self) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }
        self.world.step();
        if self.world.ticks() % 100 == 0 {
            debug!(
                "[Foraging] Tick {}: collected {}, food left {}",
                self.world.ticks(),
                self.world.collected(),
                self.world.total_food_remaining()
            );
        }
        true
    }

    // ---- animation ----

    pub fn update_animation(&mut self, timestamp_ms: f64) -> bool {
        self.clock.update(timestamp_ms)
    }

    /// Frame callback: runs one tick when running and a step is due.
    /// Frames seen while paused or idle never reach the clock.
    pub fn advance_frame(&mut self, timestamp_ms: f64) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }
        if !self.clock.update(timestamp_ms) {
            return false;
        }
        self.step_simulation()
    }

    /// Progress toward the next tick, for smoothing ant motion between frames.
    pub fn interpolation(&self) -> f64 {
        self.clock.interpolation()
    }

    // ---- parameters & toggles ----

    /// String-keyed entry point for `alpha | beta | evaporation | num_ants`.
    pub fn set_aco_param(&mut self, name: &str, value: f64) -> EngineResult<()> {
        let param: AcoParam = name.parse()?;
        self.set_param(param, value)
    }

    pub fn set_param(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        self.world.set_param(param, value)
    }

    pub fn set_animation_speed(&mut self, speed: f64) -> EngineResult<()> {
        self.clock.set_speed(speed)
    }

    pub fn set_show_ant_trails(&mut self, show: bool) {
        self.show_ant_trails = show;
    }

    pub fn set_show_pheromone_levels(&mut self, show: bool) {
        self.show_pheromone_levels = show;
    }

    pub fn set_torus_mode(&mut self, enabled: bool) {
        self.world.set_torus(enabled);
    }

    // ---- queries ----

    pub fn get_stats(&self) -> SimulationStats {
        SimulationStats {
            iteration: self.world.ticks(),
            best_distance: self.world.collected(),
            cities_count: self.world.food().len(),
            ants_count: self.world.ants().len(),
            state: self.state,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn animation_speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn show_ant_trails(&self) -> bool {
        self.show_ant_trails
    }

    pub fn show_pheromone_levels(&self) -> bool {
        self.show_pheromone_levels
    }

    pub fn torus_mode(&self) -> bool {
        self.world.topology().is_torus()
    }

    /// Recent positions of every ant, oldest first. Empty while trails are hidden.
    pub fn ant_trails(&self) -> Vec<Vec<Point>> {
        if !self.show_ant_trails {
            return Vec::new();
        }
        self.world
            .ants()
            .iter()
            .map(|ant| ant.trail().copied().collect())
            .collect()
    }

    pub fn world(&self) -> &ForagingWorld {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> ForagingSimulation {
        ForagingSimulation::new(&EngineConfig::default().with_seed(21)).unwrap()
    }

    #[test]
    fn start_requires_food() {
        let mut s = sim();
        assert!(matches!(s.start_simulation(), Err(EngineError::InvalidInput(_))));
        assert_eq!(s.state(), SimulationState::Idle);
    }

    #[test]
    fn state_machine_transitions() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        assert!(!s.pause_simulation());
        assert!(!s.step_simulation());

        assert!(s.start_simulation().unwrap());
        assert_eq!(s.state(), SimulationState::Running);
        assert_eq!(s.get_stats().ants_count, 15);
        assert!(!s.start_simulation().unwrap());
        assert!(s.step_simulation());

        assert!(s.pause_simulation());
        assert!(!s.step_simulation());
        assert_eq!(s.get_stats().iteration, 1);

        assert!(s.start_simulation().unwrap());
        assert_eq!(s.get_stats().ants_count, 15);

        s.reset_simulation();
        let stats = s.get_stats();
        assert_eq!(stats.state, SimulationState::Idle);
        assert_eq!(stats.iteration, 0);
        assert_eq!(stats.ants_count, 0);
        assert_eq!(stats.cities_count, 1);
    }

    #[test]
    fn unknown_param_is_rejected() {
        let mut s = sim();
        assert!(matches!(
            s.set_aco_param("pheromone_boost", 1.0),
            Err(EngineError::InvalidInput(_))
        ));
        s.set_aco_param("beta", 3.0).unwrap();
        assert_eq!(s.world().params().beta, 3.0);
    }

    #[test]
    fn toggles_and_speed() {
        let mut s = sim();
        s.set_show_ant_trails(false);
        s.set_show_pheromone_levels(false);
        s.set_torus_mode(true);
        assert!(!s.show_ant_trails());
        assert!(!s.show_pheromone_levels());
        assert!(s.torus_mode());
        assert!(s.set_animation_speed(0.0).is_err());
        s.set_animation_speed(2.5).unwrap();
        assert_eq!(s.animation_speed(), 2.5);
    }

    #[test]
    fn paused_frames_do_not_accumulate() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        s.start_simulation().unwrap();

        assert!(!s.advance_frame(0.0));
        assert!(!s.advance_frame(60.0));
        assert!((s.interpolation() - 0.6).abs() < 1e-9);

        s.pause_simulation();
        assert!(!s.advance_frame(10_000.0));
        assert_eq!(s.get_stats().iteration, 0);

        s.start_simulation().unwrap();
        // First frame after resuming only re-anchors.
        assert!(!s.advance_frame(10_040.0));
        assert!(!s.advance_frame(10_080.0));
        assert!((s.interpolation() - 0.4).abs() < 1e-9);
        assert!(s.advance_frame(10_140.0));
        assert_eq!(s.get_stats().iteration, 1);
    }

    #[test]
    fn speed_drives_tick_rate() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        s.set_animation_speed(4.0).unwrap();
        s.start_simulation().unwrap();
        assert!(!s.advance_frame(0.0));
        for frame in 1..=10 {
            assert!(s.advance_frame(frame as f64 * 25.0));
        }
        assert_eq!(s.get_stats().iteration, 10);
    }

    #[test]
    fn trails_follow_the_toggle() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        s.start_simulation().unwrap();
        for _ in 0..5 {
            s.step_simulation();
        }
        let trails = s.ant_trails();
        assert_eq!(trails.len(), 15);
        for (trail, ant) in trails.iter().zip(s.world().ants()) {
            assert_eq!(trail.len(), ant.trail_len());
            assert!(trail.len() > 1);
            assert_eq!(trail.last().copied(), Some(ant.position));
        }

        s.set_show_ant_trails(false);
        assert!(s.ant_trails().is_empty());
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        s.start_simulation().unwrap();
        s.step_simulation();
        s.clear_cities();
        let stats = s.get_stats();
        assert_eq!(stats.cities_count, 0);
        assert_eq!(stats.state, SimulationState::Idle);
        assert_eq!(stats.ants_count, 0);
    }

    #[test]
    fn remove_city_by_click() {
        let mut s = sim();
        s.add_city(600.0, 300.0).unwrap();
        s.add_food_source_with_quantity(100.0, 100.0, 3.0).unwrap();
        assert_eq!(s.remove_city(598.0, 305.0), 1);
        assert_eq!(s.get_stats().cities_count, 1);
        assert_eq!(s.world().food()[0].remaining, 3.0);
    }
}
