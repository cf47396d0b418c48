use crate::core::config::check_evaporation;
use crate::core::error::{EngineError, EngineResult};
use crate::geometry::CityId;

/// Symmetric trail-strength store over city pairs.
///
/// Stored dense (`n * n`) with both `(i, j)` and `(j, i)` kept equal.
/// The diagonal is always zero: there are no self-loop trails.
/// No entry is ever negative.
#[derive(Clone, Debug)]
pub struct PheromoneMatrix {
    data: Box<[f64]>,
    n: usize,
    ceiling: Option<f64>,
}

impl PheromoneMatrix {
    pub fn new(n: usize, tau0: f64) -> EngineResult<Self> {
        let mut matrix = PheromoneMatrix {
            data: Box::new([]),
            n: 0,
            ceiling: None,
        };
        matrix.initialize(n, tau0)?;
        Ok(matrix)
    }

    /// Bound every entry to `max` on deposit. Unbounded by default.
    pub fn with_ceiling(mut self, max: f64) -> Self {
        self.ceiling = Some(max);
        self.apply_ceiling();
        self
    }

    /// Reallocate for `n` cities and seed every off-diagonal pair to `tau0`.
    pub fn initialize(&mut self, n: usize, tau0: f64) -> EngineResult<()> {
        if !tau0.is_finite() || tau0 < 0.0 {
            return Err(EngineError::invalid(format!(
                "initial pheromone must be finite and >= 0, got {}",
                tau0
            )));
        }
        let mut data = vec![tau0; n * n].into_boxed_slice();
        for i in 0..n {
            data[i * n + i] = 0.0;
        }
        self.data = data;
        self.n = n;
        self.apply_ceiling();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Trail strength of the pair; zero for self-pairs and unknown cities.
    #[inline]
    pub fn get(&self, i: CityId, j: CityId) -> f64 {
        if i < self.n && j < self.n {
            self.data[i * self.n + j]
        } else {
            0.0
        }
    }

    /// Multiply every entry by `1 - rho`. `rho` must lie strictly in (0, 1).
    pub fn evaporate(&mut self, rho: f64) -> EngineResult<()> {
        let rho = check_evaporation(rho)?;
        let keep = 1.0 - rho;
        self.data.iter_mut().for_each(|v| *v *= keep);
        Ok(())
    }

    /// Add `amount` to the pair. Self-pairs, unknown cities, negative and
    /// non-finite amounts are ignored.
    pub fn deposit(&mut self, i: CityId, j: CityId, amount: f64) {
        if i == j || i >= self.n || j >= self.n || !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let mut value = self.data[i * self.n + j] + amount;
        if let Some(max) = self.ceiling {
            value = value.min(max);
        }
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }

    /// Deposit `amount` on every edge of the closed tour `route`.
    pub fn deposit_tour(&mut self, route: &[CityId], amount: f64) {
        if route.len() < 2 {
            return;
        }
        for w in route.windows(2) {
            self.deposit(w[0], w[1], amount);
        }
        self.deposit(route[route.len() - 1], route[0], amount);
    }

    /// Strongest trail, for normalizing overlays.
    pub fn max_level(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Row-major view of the full matrix.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn apply_ceiling(&mut self) {
        if let Some(max) = self.ceiling {
            self.data.iter_mut().for_each(|v| *v = v.min(max));
        }
    }
}
