//! Foraging ant: position, heading, carry state and a short trail history.

use crate::geometry::{Bounds, Point, Topology};
use serde::Serialize;
use std::collections::VecDeque;
use std::f64::consts::PI;

/// Lifecycle of a foraging ant.
///
/// `AtNest -> Searching -> CarryingFood -> Returning -> AtNest`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AntState {
    AtNest,
    Searching,
    CarryingFood,
    /// Reached the nest with a load; unloads on the next tick.
    Returning,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForagingAnt {
    pub id: usize,
    pub position: Point,
    /// Radians, 0 = +x.
    pub heading: f64,
    pub state: AntState,
    pub carrying: f64,
    /// Lifetime amount this ant has brought home.
    pub delivered: f64,
    /// Last food source this ant harvested from.
    pub food_memory: Option<Point>,
    /// Trail strength of the next deposit while carrying.
    pub deposit_strength: f64,
    #[serde(skip)]
    trail: VecDeque<Point>,
    #[serde(skip)]
    trail_capacity: usize,
}

impl ForagingAnt {
    pub fn new(id: usize, nest: Point, heading: f64, trail_capacity: usize) -> Self {
        let mut ant = ForagingAnt {
            id,
            position: nest,
            heading,
            state: AntState::AtNest,
            carrying: 0.0,
            delivered: 0.0,
            food_memory: None,
            deposit_strength: 0.0,
            trail: VecDeque::with_capacity(trail_capacity),
            trail_capacity,
        };
        ant.record_trail();
        ant
    }

    pub fn is_carrying(&self) -> bool {
        matches!(self.state, AntState::CarryingFood | AntState::Returning)
    }

    /// Move `step` along the current heading and resolve the canvas edge.
    ///
    /// On a torus the ant re-enters from the opposite edge. Otherwise it is
    /// clamped to the canvas and the heading component that crossed the
    /// edge is mirrored.
    pub fn advance(&mut self, step: f64, bounds: Bounds, topology: Topology) {
        let next = self.position.offset(self.heading, step);
        if topology.is_torus() {
            self.position = bounds.wrap(next);
        } else {
            let mut reflected = next;
            if next.x < 0.0 || next.x > bounds.width {
                reflected.x = if next.x < 0.0 { -next.x } else { 2.0 * bounds.width - next.x };
                self.heading = PI - self.heading;
            }
            if next.y < 0.0 || next.y > bounds.height {
                reflected.y = if next.y < 0.0 { -next.y } else { 2.0 * bounds.height - next.y };
                self.heading = -self.heading;
            }
            self.position = bounds.clamp(reflected);
        }
        self.heading = self.heading.rem_euclid(2.0 * PI);
        self.record_trail();
    }

    /// Snap to `point` without touching the trail geometry in between.
    pub fn place(&mut self, point: Point) {
        self.position = point;
        self.record_trail();
    }

    pub fn record_trail(&mut self) {
        if self.trail_capacity == 0 {
            return;
        }
        while self.trail.len() >= self.trail_capacity {
            self.trail.pop_front();
        }
        self.trail.push_back(self.position);
    }

    /// Recent positions, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = &Point> + '_ {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Hand the load over; returns the amount unloaded.
    pub fn unload(&mut self) -> f64 {
        let amount = self.carrying;
        self.delivered += amount;
        self.carrying = 0.0;
        self.deposit_strength = 0.0;
        self.state = AntState::AtNest;
        amount
    }
}
