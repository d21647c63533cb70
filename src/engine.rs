use crate::config::Config;
use crate::controller::Sampler;
use crate::model::World;
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

/// Simulation engine.
///
/// Holds the configuration, the current world (once started), and the
/// random number generator. `start`, `stop` and `tick` are the only
/// operations that change it; whoever owns the engine decides how often
/// `tick` is called.
pub struct Simulation {
    cfg: Config,
    session: Option<Session>,
    running: bool,
    rng: ChaCha12Rng,
}

struct Session {
    world: World,
    sampler: Sampler,
    n_ticks: u64,
}

impl Simulation {
    /// Create a new, stopped `Simulation`.
    ///
    /// The generator is seeded from `cfg.seed`, or from the OS if unset.
    pub fn new(cfg: Config) -> Result<Self> {
        let rng = match cfg.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng")?,
        };

        Ok(Self {
            cfg,
            session: None,
            running: false,
            rng,
        })
    }

    /// Build a fresh world and start running, discarding any previous one.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid. In that case the
    /// engine is left exactly as it was.
    pub fn start(&mut self) -> Result<()> {
        self.cfg.validate().context("failed to validate config")?;

        let sampler = Sampler::new(&self.cfg.pheromone).context("failed to construct sampler")?;
        let world =
            World::generate(&self.cfg, &mut self.rng).context("failed to generate world")?;

        log::info!(
            "started simulation with {} agents and {} food sources",
            world.agt_vec().len(),
            world.food_vec().len()
        );

        self.session = Some(Session {
            world,
            sampler,
            n_ticks: 0,
        });
        self.running = true;

        Ok(())
    }

    /// Halt future ticks. The world stays as last computed.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("stopped simulation after {} ticks", self.n_ticks());
        }
    }

    /// Start when stopped, stop when running.
    pub fn toggle(&mut self) -> Result<()> {
        if self.running {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Advance the world by one tick.
    ///
    /// Returns `false` without touching anything if the engine is stopped.
    pub fn tick(&mut self) -> bool {
        let session = match self.session.as_mut() {
            Some(session) if self.running => session,
            _ => {
                log::debug!("ignored tick while stopped");
                return false;
            }
        };

        session.world.step(&self.cfg, &session.sampler, &mut self.rng);
        session.n_ticks += 1;

        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks since the last start.
    pub fn n_ticks(&self) -> u64 {
        self.session.as_ref().map_or(0, |session| session.n_ticks)
    }

    /// Current world, if the engine was ever started.
    pub fn world(&self) -> Option<&World> {
        self.session.as_ref().map(|session| &session.world)
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }
}
