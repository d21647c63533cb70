use crate::model::World;
use crate::stats::Accumulator;
use crate::trail::PheromoneKind;
use anyhow::{Context, Result};
use std::{fs::File, io::BufWriter, path::Path};

/// Quantity observed on the world once per tick.
pub trait Obs {
    fn update(&mut self, world: &World);
    fn report(&self) -> serde_json::Value;
}

/// Fraction of the initial food still left in the sources.
pub struct FoodLeft {
    acc: Accumulator,
}

impl FoodLeft {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for FoodLeft {
    fn update(&mut self, world: &World) {
        let food_vec = world.food_vec();
        if food_vec.is_empty() {
            return;
        }
        let fill_sum: f64 = food_vec.iter().map(|food| food.fill()).sum();
        self.acc.add(fill_sum / food_vec.len() as f64);
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "food_left": self.acc.report() })
    }
}

/// Fraction of agents carrying food.
pub struct Carrying {
    acc: Accumulator,
}

impl Carrying {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for Carrying {
    fn update(&mut self, world: &World) {
        let agt_vec = world.agt_vec();
        if agt_vec.is_empty() {
            return;
        }
        let n_carrying = agt_vec.iter().filter(|agt| agt.has_food()).count();
        self.acc.add(n_carrying as f64 / agt_vec.len() as f64);
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "carrying": self.acc.report() })
    }
}

/// Mean number of live pheromones per agent, by kind.
pub struct TrailLoad {
    acc_home: Accumulator,
    acc_food: Accumulator,
}

impl TrailLoad {
    pub fn new() -> Self {
        Self {
            acc_home: Accumulator::new(),
            acc_food: Accumulator::new(),
        }
    }
}

impl Obs for TrailLoad {
    fn update(&mut self, world: &World) {
        let agt_vec = world.agt_vec();
        if agt_vec.is_empty() {
            return;
        }
        let (mut n_home, mut n_food) = (0, 0);
        for pheromone in agt_vec.iter().flat_map(|agt| agt.trail()) {
            match pheromone.kind() {
                PheromoneKind::Home => n_home += 1,
                PheromoneKind::Food => n_food += 1,
            }
        }
        let n_agt = agt_vec.len() as f64;
        self.acc_home.add(n_home as f64 / n_agt);
        self.acc_food.add(n_food as f64 / n_agt);
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "trail_load": {
                "home": self.acc_home.report(),
                "food": self.acc_food.report(),
            }
        })
    }
}

/// Collects observables over a run.
pub struct Analyzer {
    obs_ptr_vec: Vec<Box<dyn Obs>>,
    n_ticks: u64,
    n_delivered: u64,
}

impl Analyzer {
    pub fn new() -> Self {
        let obs_ptr_vec: Vec<Box<dyn Obs>> = vec![
            Box::new(FoodLeft::new()),
            Box::new(Carrying::new()),
            Box::new(TrailLoad::new()),
        ];
        Self {
            obs_ptr_vec,
            n_ticks: 0,
            n_delivered: 0,
        }
    }

    /// Record the world as it stands after a tick.
    pub fn add_world(&mut self, world: &World) {
        for obs in &mut self.obs_ptr_vec {
            obs.update(world);
        }
        self.n_ticks += 1;
        self.n_delivered = world.n_delivered();
    }

    pub fn report(&self) -> serde_json::Value {
        let obs_reports: Vec<_> = self.obs_ptr_vec.iter().map(|obs| obs.report()).collect();
        serde_json::json!({
            "n_ticks": self.n_ticks,
            "n_delivered": self.n_delivered,
            "observables": obs_reports,
        })
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, &self.report())
            .context("failed to serialize results")?;
        Ok(())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
