use crate::aco::{Colony, MIN_CITIES};
use crate::core::config::ColonyParams;
use crate::core::error::EngineResult;
use crate::geometry::{CitySet, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One TSP instance per JSONL line (internal use only)
#[derive(Clone, Debug, Deserialize)]
struct TourInstance {
    instance_id: String,
    cities: Vec<[f64; 2]>,
    #[serde(default)]
    known_optimum: Option<f64>,
}

/// Outcome of solving one instance to completion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstanceResult {
    pub instance_id: String,
    pub cities: usize,
    pub generations: usize,
    pub best_length: f64,
    pub known_optimum: Option<f64>,
    /// `(best - optimum) / optimum`, when the optimum is known.
    pub gap: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub results: Vec<InstanceResult>,
    pub skipped: usize,
}

impl BenchmarkReport {
    /// Mean optimality gap over instances with a known optimum.
    pub fn mean_gap(&self) -> Option<f64> {
        let gaps: Vec<f64> = self.results.iter().filter_map(|r| r.gap).collect();
        if gaps.is_empty() {
            None
        } else {
            Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
        }
    }
}

/// Benchmark - solves a JSONL dataset of TSP instances with a fixed colony setup
pub struct TourBenchmark {
    seed: u64,
}

impl TourBenchmark {
    pub fn new(seed: u64) -> Self {
        TourBenchmark { seed }
    }

    /// Solve up to `limit` instances from `dataset_jsonl`.
    ///
    /// Lines that fail to parse or hold fewer than three cities are
    /// skipped and counted; invalid `params` fail the whole run.
    pub fn run_jsonl(
        &self,
        dataset_jsonl: &str,
        params: &ColonyParams,
        limit: usize,
    ) -> EngineResult<BenchmarkReport> {
        params.validate()?;

        let mut report = BenchmarkReport::default();
        let mut instances = Vec::new();
        for line in dataset_jsonl.lines().filter(|l| !l.trim().is_empty()) {
            if instances.len() >= limit {
                break;
            }
            match serde_json::from_str::<TourInstance>(line) {
                Ok(instance) => instances.push(instance),
                Err(e) => {
                    warn!("[Benchmark] Skipping malformed line: {}", e);
                    report.skipped += 1;
                }
            }
        }

        info!("📊 [Benchmark] Running {} TSP instances...", instances.len());

        for (index, instance) in instances.iter().enumerate() {
            match self.solve(instance, params, index as u64)? {
                Some(result) => {
                    match result.gap {
                        Some(gap) => info!(
                            "✅ [Benchmark] [{}] best {:.3} (gap {:.2}%)",
                            result.instance_id,
                            result.best_length,
                            gap * 100.0
                        ),
                        None => info!(
                            "✅ [Benchmark] [{}] best {:.3}",
                            result.instance_id, result.best_length
                        ),
                    }
                    report.results.push(result);
                }
                None => report.skipped += 1,
            }
        }

        match report.mean_gap() {
            Some(gap) => info!(
                "📈 [Benchmark] Complete. {} solved, {} skipped, mean gap {:.2}%",
                report.results.len(),
                report.skipped,
                gap * 100.0
            ),
            None => info!(
                "📈 [Benchmark] Complete. {} solved, {} skipped",
                report.results.len(),
                report.skipped
            ),
        }

        Ok(report)
    }

    fn solve(
        &self,
        instance: &TourInstance,
        params: &ColonyParams,
        index: u64,
    ) -> EngineResult<Option<InstanceResult>> {
        let mut cities = CitySet::new(Topology::Euclidean);
        for &[x, y] in &instance.cities {
            if cities.add(x, y).is_err() {
                warn!("[Benchmark] [{}] non-finite city, skipped", instance.instance_id);
                return Ok(None);
            }
        }
        if cities.len() < MIN_CITIES {
            warn!(
                "[Benchmark] [{}] only {} cities, skipped",
                instance.instance_id,
                cities.len()
            );
            return Ok(None);
        }

        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(index));
        let mut colony = Colony::new(cities.distances().clone(), params.clone(), rng)?;
        while colony.run_iteration()? {}

        let best_length = colony.best_distance().unwrap_or(f64::INFINITY);
        let gap = instance
            .known_optimum
            .filter(|opt| *opt > 0.0)
            .map(|opt| (best_length - opt) / opt);

        Ok(Some(InstanceResult {
            instance_id: instance.instance_id.clone(),
            cities: cities.len(),
            generations: colony.generation(),
            best_length,
            known_optimum: instance.known_optimum,
            gap,
        }))
    }
}
