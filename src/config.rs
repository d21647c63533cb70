use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Default canvas width.
pub const WIDTH: f64 = 800.0;
/// Default canvas height.
pub const HEIGHT: f64 = 600.0;

/// Default number of agents in the colony.
pub const N_AGT: usize = 50;
/// Default number of food sources.
pub const N_FOOD: usize = 5;

/// Default initial amount of every food source.
pub const FOOD_AMOUNT: u32 = 100;
/// Default initial strength of a pheromone.
pub const PHEROMONE_STRENGTH: f64 = 100.0;
/// Default maximum number of pheromones kept per agent.
pub const TRAIL_CAP: usize = 30;

/// Simulation configuration parameters.
///
/// Every field has a default, so an empty TOML file (or none at all)
/// yields the standard colony. See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub world: WorldCfg,
    pub colony: ColonyCfg,
    pub food: FoodCfg,
    pub pheromone: PheromoneCfg,

    /// Seed of the random number generator (drawn from the OS if absent).
    pub seed: Option<u64>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldCfg {
    /// Width of the plane.
    pub width: f64,
    /// Height of the plane.
    pub height: f64,
}

impl Default for WorldCfg {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColonyCfg {
    /// Number of agents.
    pub n_agt: usize,

    /// Lower bound of the agent speed.
    pub speed_min: f64,
    /// Upper bound of the agent speed.
    pub speed_max: f64,

    /// Magnitude of the periodic wander turn.
    pub turn_speed: f64,
    /// Number of ticks between wander turns.
    pub wander_interval: u32,

    /// Distance from the nest at which food is delivered.
    pub nest_radius: f64,
    /// Proportional gain of the nest-bound steering.
    pub steer_gain: f64,
}

impl Default for ColonyCfg {
    fn default() -> Self {
        Self {
            n_agt: N_AGT,
            speed_min: 1.0,
            speed_max: 1.5,
            turn_speed: 0.1,
            wander_interval: 20,
            nest_radius: 20.0,
            steer_gain: 0.05,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoodCfg {
    /// Number of food sources.
    pub n_food: usize,

    /// Lower bound of the source radius.
    pub radius_min: f64,
    /// Upper bound of the source radius.
    pub radius_max: f64,

    /// Initial amount of every source.
    pub amount: u32,
}

impl Default for FoodCfg {
    fn default() -> Self {
        Self {
            n_food: N_FOOD,
            radius_min: 10.0,
            radius_max: 20.0,
            amount: FOOD_AMOUNT,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PheromoneCfg {
    /// Probability of emitting a pheromone on a given tick.
    pub prob_emit: f64,
    /// Strength of a freshly deposited pheromone.
    pub strength: f64,
    /// Strength lost by every pheromone per tick.
    pub decay_rate: f64,
    /// Maximum number of pheromones per agent.
    pub trail_cap: usize,
}

impl Default for PheromoneCfg {
    fn default() -> Self {
        Self {
            prob_emit: 0.05,
            strength: PHEROMONE_STRENGTH,
            decay_rate: 0.5,
            trail_cap: TRAIL_CAP,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded. Missing keys take their default
    /// values and unknown keys are rejected.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check that every parameter lies in its admissible range.
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        check_num(world.width, f64::MIN_POSITIVE..=1e6).context("invalid world width")?;
        check_num(world.height, f64::MIN_POSITIVE..=1e6).context("invalid world height")?;

        let colony = &self.colony;
        check_num(colony.n_agt, 1..=100_000).context("invalid number of agents")?;
        check_num(colony.speed_min, 0.0..=1e3).context("invalid minimum speed")?;
        check_num(colony.speed_max, colony.speed_min..=1e3).context("invalid maximum speed")?;
        check_num(colony.turn_speed, 0.0..=10.0).context("invalid turn speed")?;
        check_num(colony.wander_interval, 1..=100_000).context("invalid wander interval")?;
        check_num(colony.nest_radius, 0.0..=1e6).context("invalid nest radius")?;
        check_num(colony.steer_gain, 0.0..=1.0).context("invalid steering gain")?;

        let food = &self.food;
        check_num(food.n_food, 0..=10_000).context("invalid number of food sources")?;
        check_num(food.radius_min, 0.0..=1e6).context("invalid minimum food radius")?;
        check_num(food.radius_max, food.radius_min..=1e6).context("invalid maximum food radius")?;
        check_num(food.amount, 1..=1_000_000).context("invalid food amount")?;

        let pheromone = &self.pheromone;
        check_num(pheromone.prob_emit, 0.0..=1.0).context("invalid emission probability")?;
        check_num(pheromone.strength, f64::MIN_POSITIVE..=1e6)
            .context("invalid pheromone strength")?;
        check_num(pheromone.decay_rate, f64::MIN_POSITIVE..=1e6)
            .context("invalid pheromone decay rate")?;
        check_num(pheromone.trail_cap, 1..=10_000).context("invalid trail capacity")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
