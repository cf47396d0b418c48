use crate::geometry::{Bounds, Point};

/// Trail grid laid over the canvas for the foraging world.
///
/// Carriers splat pheromone into the cells they walk through; every tick
/// the whole grid diffuses (5-point Laplacian) and decays by the
/// evaporation rate. Under torus topology the grid wraps at its edges,
/// otherwise edge cells see themselves as their missing neighbours.
#[derive(Clone, Debug)]
pub struct PheromoneField {
    data: Box<[f64]>,
    pub width: usize,
    pub height: usize,
    pub cell_size: f64,
    pub decay_rate: f64,
    pub diffusion: f64,
    wrap: bool,
}

impl PheromoneField {
    pub fn new(bounds: Bounds, cell_size: f64, decay_rate: f64, diffusion: f64) -> Self {
        let width = ((bounds.width / cell_size).ceil() as usize).max(1);
        let height = ((bounds.height / cell_size).ceil() as usize).max(1);
        Self {
            data: vec![0.0; width * height].into_boxed_slice(),
            width,
            height,
            cell_size,
            decay_rate,
            diffusion,
            wrap: false,
        }
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    #[inline]
    fn column(&self, c: i64) -> usize {
        if self.wrap {
            c.rem_euclid(self.width as i64) as usize
        } else {
            c.clamp(0, self.width as i64 - 1) as usize
        }
    }

    #[inline]
    fn row(&self, r: i64) -> usize {
        if self.wrap {
            r.rem_euclid(self.height as i64) as usize
        } else {
            r.clamp(0, self.height as i64 - 1) as usize
        }
    }

    /// Grid cell containing a canvas point, with the fractional offset inside it
    fn cell_coords(&self, p: Point) -> (i64, i64, f64, f64) {
        let gx = p.x / self.cell_size;
        let gy = p.y / self.cell_size;
        let cx = gx.floor();
        let cy = gy.floor();
        (cx as i64, cy as i64, gx - cx, gy - cy)
    }

    /// Bilinear splat of `amount` across the 4 cells around `p`.
    pub fn deposit(&mut self, p: Point, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 || !p.is_finite() {
            return;
        }
        let (cx, cy, fx, fy) = self.cell_coords(p);
        let w = self.width;
        let (x0, x1) = (self.column(cx), self.column(cx + 1));
        let (y0, y1) = (self.row(cy), self.row(cy + 1));

        self.data[y0 * w + x0] += amount * (1.0 - fx) * (1.0 - fy);
        self.data[y0 * w + x1] += amount * fx * (1.0 - fy);
        self.data[y1 * w + x0] += amount * (1.0 - fx) * fy;
        self.data[y1 * w + x1] += amount * fx * fy;
    }

    /// Trail strength of the cell containing `p`.
    pub fn sample(&self, p: Point) -> f64 {
        if !p.is_finite() {
            return 0.0;
        }
        let (cx, cy, _, _) = self.cell_coords(p);
        self.data[self.row(cy) * self.width + self.column(cx)]
    }

    /// One passive tick: diffusion then decay.
    pub fn tick(&mut self) {
        let w = self.width;
        let h = self.height;
        let keep = 1.0 - self.decay_rate;
        let d = self.diffusion;

        // scratch buffer so the update is synchronous and unbiased
        let mut next = self.data.clone();
        for i in 0..h {
            let up = self.row(i as i64 - 1);
            let down = self.row(i as i64 + 1);
            for j in 0..w {
                let idx = i * w + j;
                let laplacian = if d > 0.0 {
                    let left = self.column(j as i64 - 1);
                    let right = self.column(j as i64 + 1);
                    self.data[up * w + j]
                        + self.data[down * w + j]
                        + self.data[i * w + left]
                        + self.data[i * w + right]
                        - 4.0 * self.data[idx]
                } else {
                    0.0
                };
                next[idx] = ((self.data[idx] + d * laplacian) * keep).max(0.0);
            }
        }
        self.data = next;
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Row-major cell levels for overlay rendering.
    pub fn levels(&self) -> &[f64] {
        &self.data
    }

    pub fn max_level(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}
