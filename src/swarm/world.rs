//! Foraging World
//!
//! Nest, food sources, ant population and the trail grid, advanced one tick
//! at a time. Searchers steer by sampling the grid ahead of them; carriers
//! walk home and lay trail as they go.

use super::forager::{AntState, ForagingAnt};
use super::pheromone::PheromoneField;
use crate::aco::roulette_select;
use crate::core::config::{AcoParam, CanvasConfig, ForagingParams};
use crate::core::error::{EngineError, EngineResult};
use crate::geometry::{Bounds, Point, Topology};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use tracing::{debug, info};

/// Random-walk bias floor for sideways headings when no food is known.
const WANDER_FLOOR: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Nest {
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FoodSource {
    pub position: Point,
    pub remaining: f64,
    pub initial: f64,
}

impl FoodSource {
    pub fn new(position: Point, quantity: f64) -> Self {
        FoodSource {
            position,
            remaining: quantity,
            initial: quantity,
        }
    }

    /// Remove up to `amount`; returns what was actually taken.
    pub fn take(&mut self, amount: f64) -> f64 {
        let taken = amount.min(self.remaining).max(0.0);
        self.remaining -= taken;
        taken
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Remaining share of the initial quantity, for rendering.
    pub fn fill_ratio(&self) -> f64 {
        if self.initial > 0.0 {
            self.remaining / self.initial
        } else {
            0.0
        }
    }

    pub fn refill(&mut self) {
        self.remaining = self.initial;
    }
}

#[derive(Debug)]
pub struct ForagingWorld {
    bounds: Bounds,
    topology: Topology,
    nest: Nest,
    food: Vec<FoodSource>,
    ants: Vec<ForagingAnt>,
    field: PheromoneField,
    params: ForagingParams,
    collected: f64,
    ticks: u64,
    next_ant_id: usize,
    rng: StdRng,
}

/// Disjoint borrows of the world handed to the per-ant update.
struct TickContext<'a> {
    params: &'a ForagingParams,
    bounds: Bounds,
    topology: Topology,
    nest: Point,
    step: f64,
    food: &'a mut [FoodSource],
    field: &'a mut PheromoneField,
    rng: &'a mut StdRng,
    collected: &'a mut f64,
}

impl ForagingWorld {
    /// Build an empty world; `params` are validated against `bounds`.
    pub fn new(bounds: Bounds, params: ForagingParams, rng: StdRng) -> EngineResult<Self> {
        if !(bounds.width.is_finite() && bounds.width > 0.0)
            || !(bounds.height.is_finite() && bounds.height > 0.0)
        {
            return Err(EngineError::invalid(format!(
                "canvas must have a positive finite size, got {}x{}",
                bounds.width, bounds.height
            )));
        }
        params.validate(&CanvasConfig {
            width: bounds.width,
            height: bounds.height,
        })?;

        let field = PheromoneField::new(
            bounds,
            params.cell_size,
            params.evaporation_rate,
            params.diffusion,
        );
        let nest = Nest {
            position: Point::new(params.nest.0, params.nest.1),
        };
        info!(
            "🐜 [Foraging] World ready: {}x{} canvas, nest at ({}, {}), {}x{} trail grid",
            bounds.width, bounds.height, nest.position.x, nest.position.y, field.width, field.height
        );
        Ok(ForagingWorld {
            bounds,
            topology: Topology::Euclidean,
            nest,
            food: Vec::new(),
            ants: Vec::new(),
            field,
            params,
            collected: 0.0,
            ticks: 0,
            next_ant_id: 0,
            rng,
        })
    }

    // ---- food ----

    /// Place a food source at `(x, y)`.
    ///
    /// Rejects non-finite coordinates, points off the canvas, points too
    /// close to the nest, a non-positive quantity and a full source list.
    pub fn add_food(&mut self, x: f64, y: f64, quantity: f64) -> EngineResult<usize> {
        let position = Point::new(x, y);
        if !position.is_finite() {
            return Err(EngineError::InvalidCoordinate { x, y });
        }
        if !(0.0..=self.bounds.width).contains(&x) || !(0.0..=self.bounds.height).contains(&y) {
            return Err(EngineError::invalid(format!(
                "food at ({}, {}) lies outside the {}x{} canvas",
                x, y, self.bounds.width, self.bounds.height
            )));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(EngineError::invalid(format!(
                "food quantity must be finite and > 0, got {}",
                quantity
            )));
        }
        let nest_distance = self.topology.distance(position, self.nest.position);
        if nest_distance < self.params.min_food_nest_distance {
            return Err(EngineError::invalid(format!(
                "food at ({}, {}) is within {} of the nest",
                x, y, self.params.min_food_nest_distance
            )));
        }
        if self.food.len() >= self.params.max_food_sources {
            return Err(EngineError::invalid(format!(
                "at most {} food sources are allowed",
                self.params.max_food_sources
            )));
        }

        self.food.push(FoodSource::new(position, quantity));
        debug!(
            "[Foraging] Food source {} at ({}, {}) qty {}",
            self.food.len() - 1,
            x,
            y,
            quantity
        );
        Ok(self.food.len() - 1)
    }

    /// Place a food source holding `default_food_quantity` plus a whole
    /// random amount up to `food_quantity_spread`.
    pub fn add_food_default(&mut self, x: f64, y: f64) -> EngineResult<usize> {
        let base = self.params.default_food_quantity;
        let spread = self.params.food_quantity_spread;
        let quantity = (base + self.rng.gen_range(0.0..=spread)).round().max(base);
        self.add_food(x, y, quantity)
    }

    /// Drop every source within the click radius of `(x, y)`; returns how many went.
    pub fn remove_food_near(&mut self, x: f64, y: f64) -> usize {
        let target = Point::new(x, y);
        if !target.is_finite() {
            return 0;
        }
        let radius = self.params.food_click_radius;
        let topology = self.topology;
        let before = self.food.len();
        self.food
            .retain(|f| topology.distance(f.position, target) > radius);
        let removed = before - self.food.len();
        if removed > 0 {
            debug!("[Foraging] Removed {} food source(s) near ({}, {})", removed, x, y);
        }
        removed
    }

    pub fn clear_food(&mut self) {
        self.food.clear();
    }

    pub fn refill_food(&mut self) {
        self.food.iter_mut().for_each(FoodSource::refill);
    }

    pub fn food(&self) -> &[FoodSource] {
        &self.food
    }

    pub fn total_food_remaining(&self) -> f64 {
        self.food.iter().map(|f| f.remaining).sum()
    }

    // ---- population ----

    /// Grow or shrink the population to `count`. New ants start at the nest.
    pub fn resize_population(&mut self, count: usize) {
        if count < self.ants.len() {
            self.ants.truncate(count);
            return;
        }
        while self.ants.len() < count {
            let heading = self.rng.gen_range(0.0..TAU);
            let ant = ForagingAnt::new(
                self.next_ant_id,
                self.nest.position,
                heading,
                self.params.trail_length,
            );
            self.next_ant_id += 1;
            self.ants.push(ant);
        }
    }

    pub fn spawn_colony(&mut self) {
        self.resize_population(self.params.num_ants);
    }

    pub fn clear_ants(&mut self) {
        self.ants.clear();
        self.next_ant_id = 0;
    }

    pub fn ants(&self) -> &[ForagingAnt] {
        &self.ants
    }

    // ---- world state ----

    /// Back to a fresh run: no ants, empty grid, zero totals, full food.
    pub fn reset(&mut self) {
        self.clear_ants();
        self.field.clear();
        self.collected = 0.0;
        self.ticks = 0;
        self.refill_food();
    }

    pub fn set_torus(&mut self, torus: bool) {
        self.topology = Topology::from_flag(torus, self.bounds);
        self.field.set_wrap(torus);
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Live parameter change, visible from the next tick.
    ///
    /// `num_ants` resizes an existing population immediately; before the
    /// first start it only changes how many ants will be spawned.
    pub fn set_param(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        self.params.set(param, value)?;
        match param {
            AcoParam::Evaporation => self.field.decay_rate = self.params.evaporation_rate,
            AcoParam::NumAnts if !self.ants.is_empty() => {
                self.resize_population(self.params.num_ants)
            }
            _ => {}
        }
        debug!("[Foraging] {} set to {}", param, value);
        Ok(())
    }

    pub fn params(&self) -> &ForagingParams {
        &self.params
    }

    pub fn nest(&self) -> &Nest {
        &self.nest
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn collected(&self) -> f64 {
        self.collected
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One simulation tick.
    ///
    /// Per-tick travel is capped at the capture radius so an ant cannot
    /// step over a food source.
    pub fn step(&mut self) {
        let step = self.params.ant_speed.min(self.params.capture_radius);
        let mut ctx = TickContext {
            params: &self.params,
            bounds: self.bounds,
            topology: self.topology,
            nest: self.nest.position,
            step,
            food: &mut self.food,
            field: &mut self.field,
            rng: &mut self.rng,
            collected: &mut self.collected,
        };
        for ant in self.ants.iter_mut() {
            step_ant(ant, &mut ctx);
        }
        self.field.tick();
        self.ticks += 1;
    }
}

fn step_ant(ant: &mut ForagingAnt, ctx: &mut TickContext<'_>) {
    match ant.state {
        AntState::AtNest => {
            ant.heading = match ant.food_memory {
                Some(target) => ctx.topology.heading(ant.position, target),
                None => ctx.rng.gen_range(0.0..TAU),
            };
            ant.state = AntState::Searching;
        }
        AntState::Searching => search(ant, ctx),
        AntState::CarryingFood => carry_home(ant, ctx),
        AntState::Returning => {
            *ctx.collected += ant.unload();
        }
    }
}

fn search(ant: &mut ForagingAnt, ctx: &mut TickContext<'_>) {
    if try_harvest(ant, ctx) {
        return;
    }

    // remembered source is gone or depleted
    if let Some(memory) = ant.food_memory {
        if ctx.topology.distance(ant.position, memory) <= ctx.params.capture_radius {
            ant.food_memory = None;
        }
    }

    let target = nearest_known_food(ant, ctx);
    let k = ctx.params.heading_candidates;
    let mut headings = Vec::with_capacity(k);
    let mut weights = Vec::with_capacity(k);
    for i in 0..k {
        let offset = -PI / 2.0 + PI * i as f64 / (k - 1) as f64;
        let heading = ant.heading + offset;
        let probe = probe_point(ant.position, heading, ctx);
        let tau = ctx.field.sample(probe) + ctx.params.tau_floor;
        let eta = match target {
            Some(food) => 1.0 / ctx.topology.distance(probe, food).max(1.0),
            None => (1.0 + offset.cos()) / 2.0 + WANDER_FLOOR,
        };
        headings.push(heading);
        weights.push(tau.powf(ctx.params.alpha) * eta.powf(ctx.params.beta));
    }

    if let Some(choice) = roulette_select(&weights, &mut *ctx.rng) {
        ant.heading = headings[choice] + jitter(ctx.params.heading_noise, ctx.rng);
    }
    ant.advance(ctx.step, ctx.bounds, ctx.topology);
    try_harvest(ant, ctx);
}

/// Pick up food from a live source within reach. Returns whether it did.
fn try_harvest(ant: &mut ForagingAnt, ctx: &mut TickContext<'_>) -> bool {
    let reach = ctx.params.capture_radius;
    let topology = ctx.topology;
    let here = ant.position;
    let source = ctx
        .food
        .iter_mut()
        .filter(|f| !f.is_exhausted())
        .find(|f| topology.distance(here, f.position) <= reach);
    let Some(source) = source else {
        return false;
    };

    let taken = source.take(ctx.params.harvest_amount);
    if taken <= 0.0 {
        return false;
    }
    if source.is_exhausted() {
        info!(
            "🍂 [Foraging] Food source at ({:.0}, {:.0}) exhausted",
            source.position.x, source.position.y
        );
    }

    ant.carrying = taken;
    ant.food_memory = Some(source.position);
    ant.deposit_strength = ctx.params.deposit_strength;
    ant.state = AntState::CarryingFood;
    ant.heading = ctx.topology.heading(ant.position, ctx.nest);
    true
}

fn carry_home(ant: &mut ForagingAnt, ctx: &mut TickContext<'_>) {
    ctx.field
        .deposit(ant.position, ant.deposit_strength * ant.carrying);
    ant.deposit_strength *= ctx.params.deposit_decay;

    let remaining = ctx.topology.distance(ant.position, ctx.nest);
    if remaining > ctx.params.nest_radius {
        ant.heading =
            ctx.topology.heading(ant.position, ctx.nest) + jitter(ctx.params.heading_noise, ctx.rng);
        ant.advance(ctx.step.min(remaining), ctx.bounds, ctx.topology);
    }
    if ctx.topology.distance(ant.position, ctx.nest) <= ctx.params.nest_radius {
        ant.place(ctx.nest);
        ant.state = AntState::Returning;
    }
}

/// Closest of: remembered source, live sources within sense radius.
fn nearest_known_food(ant: &ForagingAnt, ctx: &TickContext<'_>) -> Option<Point> {
    let sensed = ctx
        .food
        .iter()
        .filter(|f| !f.is_exhausted())
        .map(|f| f.position)
        .filter(|&p| ctx.topology.distance(ant.position, p) <= ctx.params.sense_radius);
    ant.food_memory
        .into_iter()
        .chain(sensed)
        .min_by(|a, b| {
            ctx.topology
                .distance(ant.position, *a)
                .total_cmp(&ctx.topology.distance(ant.position, *b))
        })
}

fn probe_point(from: Point, heading: f64, ctx: &TickContext<'_>) -> Point {
    let probe = from.offset(heading, ctx.params.sensor_distance);
    if ctx.topology.is_torus() {
        ctx.bounds.wrap(probe)
    } else {
        ctx.bounds.clamp(probe)
    }
}

fn jitter(sigma: f64, rng: &mut StdRng) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    match Normal::new(0.0, sigma) {
        Ok(normal) => normal.sample(rng),
        Err(_) => 0.0,
    }
}
