use super::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

pub const ALPHA_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const BETA_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const MAX_COLONY_ANTS: usize = 10_000;
pub const MAX_FORAGING_ANTS: usize = 500;

/// Drawing surface extent. Also the period of the torus topology.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Animation pacing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Wall-clock milliseconds per discrete step at speed 1.0
    pub base_step_ms: f64,
    pub speed: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            base_step_ms: 100.0,
            speed: 1.0,
        }
    }
}

/// How pheromone is laid after every generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum DepositRule {
    /// Every ant deposits `q / length` on each edge of its tour.
    AntSystem,
    /// Ant System plus `weight * q / best_length` on the best-so-far tour.
    Elitist { weight: f64 },
}

/// Which city each ant starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStrategy {
    /// Ant `k` starts at city `k mod n`.
    Cyclic,
    /// Uniformly random start city per ant.
    Random,
}

/// TSP colony hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyParams {
    pub num_ants: usize,
    pub max_generations: usize,
    pub evaporation_rate: f64,
    pub alpha: f64,
    pub beta: f64,
    pub deposit_q: f64,
    pub deposit_rule: DepositRule,
    pub start_strategy: StartStrategy,
    /// Baseline trail strength; derived from a nearest-neighbour tour when unset.
    pub initial_pheromone: Option<f64>,
    /// Upper bound on any trail entry. Unbounded when unset.
    pub pheromone_ceiling: Option<f64>,
}

impl Default for ColonyParams {
    fn default() -> Self {
        ColonyParams {
            num_ants: 20,
            max_generations: 100,
            evaporation_rate: 0.1,
            alpha: 1.0,
            beta: 2.0,
            deposit_q: 1.0,
            deposit_rule: DepositRule::AntSystem,
            start_strategy: StartStrategy::Cyclic,
            initial_pheromone: None,
            pheromone_ceiling: None,
        }
    }
}

impl ColonyParams {
    pub fn new(
        num_ants: usize,
        max_generations: usize,
        evaporation_rate: f64,
        alpha: f64,
        beta: f64,
    ) -> Self {
        ColonyParams {
            num_ants,
            max_generations,
            evaporation_rate,
            alpha,
            beta,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        check_ant_count(self.num_ants as f64, MAX_COLONY_ANTS)?;
        if self.max_generations < 1 {
            return Err(rejected("max_generations must be at least 1"));
        }
        check_evaporation(self.evaporation_rate)?;
        check_inclusive("alpha", self.alpha, ALPHA_RANGE)?;
        check_inclusive("beta", self.beta, BETA_RANGE)?;
        check_positive("deposit_q", self.deposit_q)?;
        if let DepositRule::Elitist { weight } = self.deposit_rule {
            if !weight.is_finite() || weight < 0.0 {
                return Err(rejected(format!(
                    "elitist weight must be finite and >= 0, got {}",
                    weight
                )));
            }
        }
        if let Some(tau0) = self.initial_pheromone {
            check_positive("initial_pheromone", tau0)?;
        }
        if let Some(max) = self.pheromone_ceiling {
            check_positive("pheromone_ceiling", max)?;
        }
        Ok(())
    }

    /// Apply a single live parameter change.
    pub fn set(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        match param {
            AcoParam::Alpha => self.alpha = check_inclusive("alpha", value, ALPHA_RANGE)?,
            AcoParam::Beta => self.beta = check_inclusive("beta", value, BETA_RANGE)?,
            AcoParam::Evaporation => self.evaporation_rate = check_evaporation(value)?,
            AcoParam::NumAnts => self.num_ants = check_ant_count(value, MAX_COLONY_ANTS)?,
        }
        Ok(())
    }
}

/// Foraging world tuning. Distances are in canvas pixels, rates per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagingParams {
    pub num_ants: usize,
    pub alpha: f64,
    pub beta: f64,
    pub evaporation_rate: f64,
    /// Laplacian diffusion coefficient of the trail grid, stable in [0, 0.25].
    pub diffusion: f64,
    pub ant_speed: f64,
    pub capture_radius: f64,
    pub nest_radius: f64,
    pub sense_radius: f64,
    pub sensor_distance: f64,
    pub heading_candidates: usize,
    pub heading_noise: f64,
    pub harvest_amount: f64,
    pub default_food_quantity: f64,
    /// Random extra quantity, up to this amount, for sources placed without one.
    pub food_quantity_spread: f64,
    pub deposit_strength: f64,
    pub deposit_decay: f64,
    pub trail_length: usize,
    pub cell_size: f64,
    pub tau_floor: f64,
    pub max_food_sources: usize,
    pub min_food_nest_distance: f64,
    pub food_click_radius: f64,
    pub nest: (f64, f64),
}

impl Default for ForagingParams {
    fn default() -> Self {
        ForagingParams {
            num_ants: 15,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.02,
            diffusion: 0.0,
            ant_speed: 2.0,
            capture_radius: 10.0,
            nest_radius: 10.0,
            sense_radius: 120.0,
            sensor_distance: 10.0,
            heading_candidates: 7,
            heading_noise: 0.1,
            harvest_amount: 1.0,
            default_food_quantity: 50.0,
            food_quantity_spread: 50.0,
            deposit_strength: 10.0,
            deposit_decay: 0.98,
            trail_length: 50,
            cell_size: 5.0,
            tau_floor: 0.1,
            max_food_sources: 20,
            min_food_nest_distance: 30.0,
            food_click_radius: 15.0,
            nest: (400.0, 300.0),
        }
    }
}

impl ForagingParams {
    pub fn validate(&self, canvas: &CanvasConfig) -> EngineResult<()> {
        check_ant_count(self.num_ants as f64, MAX_FORAGING_ANTS)?;
        check_inclusive("alpha", self.alpha, ALPHA_RANGE)?;
        check_inclusive("beta", self.beta, BETA_RANGE)?;
        check_evaporation(self.evaporation_rate)?;
        check_inclusive("diffusion", self.diffusion, 0.0..=0.25)?;
        for (name, value) in [
            ("ant_speed", self.ant_speed),
            ("capture_radius", self.capture_radius),
            ("nest_radius", self.nest_radius),
            ("sense_radius", self.sense_radius),
            ("sensor_distance", self.sensor_distance),
            ("harvest_amount", self.harvest_amount),
            ("default_food_quantity", self.default_food_quantity),
            ("deposit_strength", self.deposit_strength),
            ("cell_size", self.cell_size),
            ("tau_floor", self.tau_floor),
            ("food_click_radius", self.food_click_radius),
        ] {
            check_positive(name, value)?;
        }
        check_inclusive("heading_noise", self.heading_noise, 0.0..=std::f64::consts::PI)?;
        check_inclusive("deposit_decay", self.deposit_decay, 0.0..=1.0)?;
        check_inclusive("food_quantity_spread", self.food_quantity_spread, 0.0..=f64::MAX)?;
        check_inclusive("min_food_nest_distance", self.min_food_nest_distance, 0.0..=f64::MAX)?;
        if self.heading_candidates < 2 {
            return Err(rejected("heading_candidates must be at least 2"));
        }
        if self.max_food_sources < 1 {
            return Err(rejected("max_food_sources must be at least 1"));
        }
        let (nx, ny) = self.nest;
        if !(0.0..=canvas.width).contains(&nx) || !(0.0..=canvas.height).contains(&ny) {
            return Err(rejected(format!(
                "nest ({}, {}) lies outside the {}x{} canvas",
                nx, ny, canvas.width, canvas.height
            )));
        }
        Ok(())
    }

    pub fn set(&mut self, param: AcoParam, value: f64) -> EngineResult<()> {
        match param {
            AcoParam::Alpha => self.alpha = check_inclusive("alpha", value, ALPHA_RANGE)?,
            AcoParam::Beta => self.beta = check_inclusive("beta", value, BETA_RANGE)?,
            AcoParam::Evaporation => self.evaporation_rate = check_evaporation(value)?,
            AcoParam::NumAnts => self.num_ants = check_ant_count(value, MAX_FORAGING_ANTS)?,
        }
        Ok(())
    }
}

/// Top-level engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    /// Explicit RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub clock: ClockConfig,
    pub colony: ColonyParams,
    pub foraging: ForagingParams,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        check_positive("canvas.width", self.canvas.width)?;
        check_positive("canvas.height", self.canvas.height)?;
        check_positive("clock.base_step_ms", self.clock.base_step_ms)?;
        check_positive("clock.speed", self.clock.speed)?;
        self.colony.validate()?;
        self.foraging.validate(&self.canvas)
    }
}

/// Closed set of parameters adjustable while a simulation runs.
///
/// | name          | valid range               |
/// |---------------|---------------------------|
/// | `alpha`       | 0.0 ..= 10.0              |
/// | `beta`        | 0.0 ..= 10.0              |
/// | `evaporation` | strictly between 0 and 1  |
/// | `num_ants`    | whole number, 1 ..= cap   |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcoParam {
    Alpha,
    Beta,
    Evaporation,
    NumAnts,
}

impl AcoParam {
    pub fn name(&self) -> &'static str {
        match self {
            AcoParam::Alpha => "alpha",
            AcoParam::Beta => "beta",
            AcoParam::Evaporation => "evaporation",
            AcoParam::NumAnts => "num_ants",
        }
    }
}

impl fmt::Display for AcoParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AcoParam {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(AcoParam::Alpha),
            "beta" => Ok(AcoParam::Beta),
            "evaporation" => Ok(AcoParam::Evaporation),
            "num_ants" => Ok(AcoParam::NumAnts),
            other => Err(rejected(format!("unknown parameter '{}'", other))),
        }
    }
}

fn rejected(msg: impl Into<String>) -> EngineError {
    let msg = msg.into();
    warn!("[Config] Rejected: {}", msg);
    EngineError::InvalidInput(msg)
}

fn check_inclusive(name: &str, value: f64, range: RangeInclusive<f64>) -> EngineResult<f64> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(rejected(format!(
            "{} must be within [{}, {}], got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

fn check_positive(name: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(rejected(format!("{} must be finite and > 0, got {}", name, value)))
    }
}

pub(crate) fn check_evaporation(rate: f64) -> EngineResult<f64> {
    if rate.is_finite() && rate > 0.0 && rate < 1.0 {
        Ok(rate)
    } else {
        Err(rejected(format!(
            "evaporation rate must be strictly between 0 and 1, got {}",
            rate
        )))
    }
}

fn check_ant_count(value: f64, cap: usize) -> EngineResult<usize> {
    if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= cap as f64 {
        Ok(value as usize)
    } else {
        Err(rejected(format!(
            "num_ants must be a whole number within [1, {}], got {}",
            cap, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{"seed": 7, "colony": {"num_ants": 5}}"#).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.colony.num_ants, 5);
        assert_eq!(cfg.colony.beta, 2.0);
        assert_eq!(cfg.canvas.width, 800.0);
    }

    #[test]
    fn json_deposit_rule_is_tagged() {
        let cfg = EngineConfig::from_json(
            r#"{"colony": {"deposit_rule": {"rule": "elitist", "weight": 2.0}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.colony.deposit_rule, DepositRule::Elitist { weight: 2.0 });
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        let err = EngineConfig::from_json(r#"{"colony": {"evaporation_rate": 1.5}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn colony_params_reject_out_of_range() {
        assert!(ColonyParams::new(0, 10, 0.1, 1.0, 2.0).validate().is_err());
        assert!(ColonyParams::new(5, 0, 0.1, 1.0, 2.0).validate().is_err());
        assert!(ColonyParams::new(5, 10, 0.0, 1.0, 2.0).validate().is_err());
        assert!(ColonyParams::new(5, 10, 1.0, 1.0, 2.0).validate().is_err());
        assert!(ColonyParams::new(5, 10, 0.1, -1.0, 2.0).validate().is_err());
        assert!(ColonyParams::new(5, 10, 0.1, 1.0, f64::NAN).validate().is_err());
        assert!(ColonyParams::new(5, 10, 0.1, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn param_names_are_closed() {
        assert_eq!("alpha".parse::<AcoParam>().unwrap(), AcoParam::Alpha);
        assert_eq!("num_ants".parse::<AcoParam>().unwrap(), AcoParam::NumAnts);
        assert!(matches!(
            "gamma".parse::<AcoParam>(),
            Err(EngineError::InvalidInput(_))
        ));
        assert!("Alpha".parse::<AcoParam>().is_err());
    }

    #[test]
    fn setters_validate_and_apply() {
        let mut params = ForagingParams::default();
        params.set(AcoParam::NumAnts, 5.0).unwrap();
        assert_eq!(params.num_ants, 5);
        assert!(params.set(AcoParam::NumAnts, 2.5).is_err());
        assert!(params.set(AcoParam::NumAnts, 0.0).is_err());
        assert!(params.set(AcoParam::Evaporation, 0.0).is_err());
        params.set(AcoParam::Evaporation, 0.3).unwrap();
        assert_eq!(params.evaporation_rate, 0.3);
        assert_eq!(params.num_ants, 5);
    }

    #[test]
    fn nest_must_lie_on_canvas() {
        let mut params = ForagingParams::default();
        params.nest = (900.0, 10.0);
        assert!(params.validate(&CanvasConfig::default()).is_err());
    }
}
