use rand::Rng;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use slicesim_core::agent::MobilityInfo;

#[derive(Deserialize, Default, Debug, Copy, Clone, PartialEq, TypedBuilder)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl MobilityInfo for Point2D {}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A discrete random walk. Every step moves the node by <code>speed * time_step</code> along
/// each axis, with the direction drawn independently per axis from {-1, 0, +1}.
#[derive(Clone, Copy, Debug, Default, PartialEq, TypedBuilder)]
pub struct RandomWalk {
    pub speed: f64,
}

impl RandomWalk {
    pub fn step<R: Rng + ?Sized>(&self, position: &mut Point2D, time_step: f64, rng: &mut R) {
        position.x += self.speed * time_step * Self::direction(rng);
        position.y += self.speed * time_step * Self::direction(rng);
    }

    #[inline]
    fn direction<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        rng.gen_range(-1i32..=1) as f64
    }
}
