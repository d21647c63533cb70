use crate::config::FoodCfg;
use crate::model::{Bounds, Point};
use anyhow::Result;
use rand::prelude::*;
use rand_distr::Uniform;
use serde::Serialize;

/// Depletable food source.
///
/// Its amount only ever decreases, one unit per pickup, and stops at zero.
/// An empty source stays in the world but can no longer be picked from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Food {
    position: Point,
    radius: f64,
    amount: u32,
    amount_init: u32,
}

impl Food {
    pub fn new(position: Point, radius: f64, amount: u32) -> Self {
        Self {
            position,
            radius,
            amount,
            amount_init: amount,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_depleted(&self) -> bool {
        self.amount == 0
    }

    /// Fraction of the initial amount still available, in `[0, 1]`.
    pub fn fill(&self) -> f64 {
        if self.amount_init == 0 {
            return 0.0;
        }
        self.amount as f64 / self.amount_init as f64
    }
}

/// Generate `n_food` sources placed uniformly over the plane.
///
/// Sources may overlap each other and the nest.
pub fn generate<R: Rng + ?Sized>(
    n_food: usize,
    bounds: &Bounds,
    cfg: &FoodCfg,
    rng: &mut R,
) -> Result<Vec<Food>> {
    let x_dist = Uniform::new_inclusive(0.0, bounds.width())?;
    let y_dist = Uniform::new_inclusive(0.0, bounds.height())?;
    let radius_dist = Uniform::new_inclusive(cfg.radius_min, cfg.radius_max)?;

    let mut food_vec = Vec::with_capacity(n_food);
    for _ in 0..n_food {
        let position = Point::new(x_dist.sample(rng), y_dist.sample(rng));
        food_vec.push(Food::new(position, radius_dist.sample(rng), cfg.amount));
    }

    Ok(food_vec)
}

/// Take one unit from `food` if it is not empty and `position` lies
/// strictly inside its radius.
pub fn try_pickup(food: &mut Food, position: Point) -> bool {
    if food.amount == 0 || position.distance(food.position) >= food.radius {
        return false;
    }
    food.amount -= 1;
    true
}
