use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Simulation;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Headless driver: plays the role of the render loop, calling `tick`
/// at its own pace and recording observables instead of drawing.
pub struct Driver {
    sim: Simulation,
    analyzer: Analyzer,
}

impl Driver {
    pub fn new(cfg: Config) -> Result<Self> {
        let sim = Simulation::new(cfg).context("failed to construct simulation")?;
        Ok(Self {
            sim,
            analyzer: Analyzer::new(),
        })
    }

    /// Run a fresh session for `n_ticks` ticks, then stop.
    pub fn run(&mut self, n_ticks: u64) -> Result<()> {
        self.sim.start().context("failed to start simulation")?;
        self.analyzer = Analyzer::new();

        let n_reports = 10;
        let ticks_per_report = (n_ticks / n_reports).max(1);

        for i_tick in 0..n_ticks {
            if !self.sim.tick() {
                bail!("simulation stopped unexpectedly at tick {i_tick}");
            }
            let world = self.sim.world().context("simulation has no world")?;
            self.analyzer.add_world(world);

            if (i_tick + 1) % ticks_per_report == 0 || i_tick + 1 == n_ticks {
                let progress = 100.0 * (i_tick + 1) as f64 / n_ticks as f64;
                log::info!("completed {progress:06.2}%");
            }
        }

        self.sim.stop();

        if let Some(world) = self.sim.world() {
            let n_depleted = world.food_vec().iter().filter(|f| f.is_depleted()).count();
            log::info!(
                "delivered {} units, {} units left, {n_depleted} sources depleted",
                world.n_delivered(),
                world.food_left()
            );
        }

        Ok(())
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        self.analyzer
            .save_results(file)
            .with_context(|| format!("failed to save results to {file:?}"))?;
        log::info!("saved {file:?}");
        Ok(())
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}
