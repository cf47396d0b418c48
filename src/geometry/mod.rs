//! Geometry
//!
//! Points, the canvas rectangle and the two distance topologies shared by
//! the TSP colony and the foraging world.

pub mod city;
pub mod distance;

use serde::{Deserialize, Serialize};

pub use city::{City, CityId, CitySet};
pub use distance::DistanceMatrix;

/// A 2D canvas coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Move `step` along `heading` (radians, 0 = +x).
    pub fn offset(&self, heading: f64, step: f64) -> Point {
        Point::new(self.x + heading.cos() * step, self.y + heading.sin() * step)
    }
}

/// Rectangle `[0, width) x [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Bounds { width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    /// Map a point back onto the rectangle by identifying opposite edges.
    pub fn wrap(&self, p: Point) -> Point {
        Point::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }
}

/// Distance model over the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Topology {
    Euclidean,
    /// Opposite canvas edges are identified.
    Torus(Bounds),
}

impl Topology {
    pub fn from_flag(torus: bool, bounds: Bounds) -> Self {
        if torus {
            Topology::Torus(bounds)
        } else {
            Topology::Euclidean
        }
    }

    pub fn is_torus(&self) -> bool {
        matches!(self, Topology::Torus(_))
    }

    /// Shortest displacement from `a` to `b`.
    ///
    /// Under the torus each axis is reduced to its nearest periodic image,
    /// so the vector may point "through" an edge. Points need not lie on
    /// the canvas.
    pub fn delta(&self, a: Point, b: Point) -> (f64, f64) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        match self {
            Topology::Euclidean => (dx, dy),
            Topology::Torus(bounds) => (
                dx - bounds.width * (dx / bounds.width).round(),
                dy - bounds.height * (dy / bounds.height).round(),
            ),
        }
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = self.delta(a, b);
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading (radians) of the shortest path from `a` to `b`.
    pub fn heading(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = self.delta(a, b);
        dy.atan2(dx)
    }
}

/// `rem_euclid` can round a tiny negative up to `period` itself.
fn wrap_axis(v: f64, period: f64) -> f64 {
    let r = v.rem_euclid(period);
    if r >= period {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Bounds = Bounds::new(800.0, 600.0);

    #[test]
    fn euclidean_distance() {
        let d = Topology::Euclidean.distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn torus_is_shorter_across_the_edge() {
        let a = Point::new(5.0, 300.0);
        let b = Point::new(795.0, 300.0);
        let plain = Topology::Euclidean.distance(a, b);
        let wrapped = Topology::Torus(CANVAS).distance(a, b);
        assert_eq!(plain, 790.0);
        assert!((wrapped - 10.0).abs() < 1e-9);
        assert!(wrapped < plain);
    }

    #[test]
    fn torus_corner_images() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(799.0, 599.0);
        let d = Topology::Torus(CANVAS).distance(a, b);
        assert!((d - (8.0f64).sqrt()).abs() < 1e-9);
        let (dx, dy) = Topology::Torus(CANVAS).delta(a, b);
        assert!(dx < 0.0 && dy < 0.0);
    }

    #[test]
    fn torus_never_exceeds_euclidean() {
        let topo = Topology::Torus(CANVAS);
        for &(a, b) in &[
            (Point::new(100.0, 100.0), Point::new(200.0, 150.0)),
            (Point::new(0.0, 0.0), Point::new(400.0, 300.0)),
            (Point::new(700.0, 10.0), Point::new(20.0, 590.0)),
        ] {
            assert!(topo.distance(a, b) <= Topology::Euclidean.distance(a, b) + 1e-12);
        }
    }

    #[test]
    fn torus_reduces_far_off_canvas_points() {
        let topo = Topology::Torus(CANVAS);
        let d = topo.distance(Point::new(0.0, 0.0), Point::new(2000.0, 0.0));
        assert!((d - 400.0).abs() < 1e-9);
        let d = topo.distance(Point::new(10.0, 10.0), Point::new(-1590.0, 1810.0));
        assert!((d - 0.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_stays_inside_for_tiny_negatives() {
        let p = CANVAS.wrap(Point::new(-1e-14, -1e-14));
        assert!(CANVAS.contains(p));
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn wrap_identifies_opposite_edges() {
        let p = CANVAS.wrap(Point::new(801.0, -2.0));
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 598.0).abs() < 1e-9);
    }
}
