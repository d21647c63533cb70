use crate::config::Config;
use crate::controller::{Agent, Sampler, update_agent};
use crate::food::{self, Food};
use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Point of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rectangular extent of the plane, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Extent")]
pub struct Bounds {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct Extent {
    width: f64,
    height: f64,
}

impl TryFrom<Extent> for Bounds {
    type Error = anyhow::Error;

    fn try_from(extent: Extent) -> Result<Self> {
        Self::new(extent.width, extent.height)
    }
}

impl Bounds {
    /// Create new bounds, rejecting empty or non-finite extents.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            bail!("width must be positive and finite, but is {width:?}");
        }
        if !(height.is_finite() && height > 0.0) {
            bail!("height must be positive and finite, but is {height:?}");
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Position of the nest, fixed at the center of the plane.
    pub fn nest(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Clamp each coordinate independently onto the plane.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}

/// State of the simulation at a given tick.
///
/// Food sources and agents keep their order for the whole run: agents are
/// updated in sequence and each one sees the food amounts left by the
/// agents before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    bounds: Bounds,
    food_vec: Vec<Food>,
    agt_vec: Vec<Agent>,
    n_delivered: u64,
}

impl World {
    /// Assemble a world from explicit parts.
    ///
    /// # Errors
    /// Returns an error if an agent or a food source lies outside the bounds.
    pub fn from_parts(bounds: Bounds, food_vec: Vec<Food>, agt_vec: Vec<Agent>) -> Result<Self> {
        for (i_food, food) in food_vec.iter().enumerate() {
            if !bounds.contains(food.position()) {
                bail!("food source {i_food} lies outside the bounds");
            }
        }
        for (i_agt, agt) in agt_vec.iter().enumerate() {
            if !bounds.contains(agt.position()) {
                bail!("agent {i_agt} lies outside the bounds");
            }
        }
        Ok(Self {
            bounds,
            food_vec,
            agt_vec,
            n_delivered: 0,
        })
    }

    /// Generate a fresh world: random food sources and a colony of agents
    /// gathered at the nest, each heading in a random direction.
    pub fn generate<R: Rng + ?Sized>(cfg: &Config, rng: &mut R) -> Result<Self> {
        let bounds =
            Bounds::new(cfg.world.width, cfg.world.height).context("failed to construct bounds")?;

        let food_vec = food::generate(cfg.food.n_food, &bounds, &cfg.food, rng)
            .context("failed to generate food sources")?;

        let dir_dist = Uniform::new(0.0, TAU)?;
        let speed_dist = Uniform::new_inclusive(cfg.colony.speed_min, cfg.colony.speed_max)?;

        let nest = bounds.nest();
        let mut agt_vec = Vec::with_capacity(cfg.colony.n_agt);
        for _ in 0..cfg.colony.n_agt {
            agt_vec.push(Agent::new(
                nest,
                dir_dist.sample(rng),
                speed_dist.sample(rng),
                cfg.colony.turn_speed,
                cfg.pheromone.trail_cap,
            ));
        }

        Self::from_parts(bounds, food_vec, agt_vec)
    }

    /// Advance every agent by one tick, in sequence order.
    pub fn step<R: Rng + ?Sized>(&mut self, cfg: &Config, sampler: &Sampler, rng: &mut R) {
        for (i_agt, agt) in self.agt_vec.iter_mut().enumerate() {
            let events = update_agent(agt, &mut self.food_vec, &self.bounds, cfg, sampler, rng);

            if let Some(i_food) = events.i_food {
                log::trace!("agent {i_agt} picked up food from source {i_food}");
            }
            if events.delivered {
                self.n_delivered += 1;
                log::debug!("agent {i_agt} delivered food to the nest");
            }
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn nest(&self) -> Point {
        self.bounds.nest()
    }

    pub fn food_vec(&self) -> &[Food] {
        &self.food_vec
    }

    pub fn agt_vec(&self) -> &[Agent] {
        &self.agt_vec
    }

    /// Number of food units delivered to the nest so far.
    pub fn n_delivered(&self) -> u64 {
        self.n_delivered
    }

    /// Total food left in all sources.
    pub fn food_left(&self) -> u64 {
        self.food_vec.iter().map(|food| food.amount() as u64).sum()
    }
}
