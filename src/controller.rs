use crate::config::{ColonyCfg, Config, PheromoneCfg};
use crate::food::{Food, try_pickup};
use crate::model::{Bounds, Point};
use crate::trail::{Pheromone, PheromoneKind, PheromoneTrail};
use anyhow::Result;
use rand::prelude::*;
use rand_distr::{Bernoulli, Uniform};
use serde::Serialize;
use std::f64::consts::{PI, TAU};

/// Simulated forager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    position: Point,
    direction: f64,
    speed: f64,
    turn_speed: f64,
    has_food: bool,
    wander_counter: u32,
    trail: PheromoneTrail,
}

impl Agent {
    /// Create a new agent without food and with an empty trail.
    pub fn new(
        position: Point,
        direction: f64,
        speed: f64,
        turn_speed: f64,
        trail_cap: usize,
    ) -> Self {
        Self {
            position,
            direction,
            speed,
            turn_speed,
            has_food: false,
            wander_counter: 0,
            trail: PheromoneTrail::new(trail_cap),
        }
    }

    /// Return the same agent, loaded with food or not.
    pub fn with_food(mut self, has_food: bool) -> Self {
        self.has_food = has_food;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading in radians.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn turn_speed(&self) -> f64 {
        self.turn_speed
    }

    pub fn has_food(&self) -> bool {
        self.has_food
    }

    pub fn wander_counter(&self) -> u32 {
        self.wander_counter
    }

    pub fn trail(&self) -> &PheromoneTrail {
        &self.trail
    }

    fn emit_pheromone<R: Rng + ?Sized>(
        &mut self,
        cfg: &PheromoneCfg,
        sampler: &Sampler,
        rng: &mut R,
    ) {
        if sampler.emit.sample(rng) {
            let kind = PheromoneKind::from_carrying(self.has_food);
            self.trail.deposit(Pheromone::new(self.position, kind, cfg.strength));
        }
    }

    fn advance(&mut self) {
        self.position.x += self.direction.cos() * self.speed;
        self.position.y += self.direction.sin() * self.speed;
    }

    fn wander<R: Rng + ?Sized>(&mut self, wander_interval: u32, sampler: &Sampler, rng: &mut R) {
        self.wander_counter += 1;
        if self.wander_counter > wander_interval {
            self.direction += sampler.wander.sample(rng) * self.turn_speed;
            self.wander_counter = 0;
        }
    }

    /// Claim one unit from the first reachable source and turn around.
    fn seek_food(&mut self, food_vec: &mut [Food]) -> Option<usize> {
        for (i_food, food) in food_vec.iter_mut().enumerate() {
            if try_pickup(food, self.position) {
                self.has_food = true;
                self.direction += PI;
                return Some(i_food);
            }
        }
        None
    }

    /// Drop the food once close to the nest, then bend the heading toward it.
    fn return_to_nest(&mut self, nest: Point, cfg: &ColonyCfg) -> bool {
        let delivered = self.position.distance(nest) < cfg.nest_radius;
        if delivered {
            self.has_food = false;
            self.direction += PI;
        }

        let angle_to_nest = (nest.y - self.position.y).atan2(nest.x - self.position.x);
        let angle_diff = normalize_angle(angle_to_nest - self.direction);
        self.direction += angle_diff * cfg.steer_gain;

        delivered
    }
}

/// Random sources driving emission and wandering.
#[derive(Debug, Clone)]
pub struct Sampler {
    emit: Bernoulli,
    wander: Uniform<f64>,
}

impl Sampler {
    pub fn new(cfg: &PheromoneCfg) -> Result<Self> {
        Ok(Self {
            emit: Bernoulli::new(cfg.prob_emit)?,
            wander: Uniform::new(-0.5, 0.5)?,
        })
    }
}

/// What happened to an agent during one update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Events {
    /// Index of the food source picked from, if any.
    pub i_food: Option<usize>,
    /// Whether food was delivered to the nest.
    pub delivered: bool,
}

/// Advance one agent by one tick.
///
/// The steps run in a fixed order. Food-seeking and nest-return are
/// selected by `has_food` as it stands when each is reached, so an agent
/// that picks up food right next to the nest delivers it in the same tick.
pub fn update_agent<R: Rng + ?Sized>(
    agt: &mut Agent,
    food_vec: &mut [Food],
    bounds: &Bounds,
    cfg: &Config,
    sampler: &Sampler,
    rng: &mut R,
) -> Events {
    let mut events = Events::default();

    agt.emit_pheromone(&cfg.pheromone, sampler, rng);
    agt.trail.decay(cfg.pheromone.decay_rate);

    agt.advance();
    agt.position = bounds.clamp(agt.position);

    agt.wander(cfg.colony.wander_interval, sampler, rng);

    if !agt.has_food {
        events.i_food = agt.seek_food(food_vec);
    }
    if agt.has_food {
        events.delivered = agt.return_to_nest(bounds.nest(), &cfg.colony);
    }

    agt.direction = normalize_angle(agt.direction);

    events
}

/// Map any finite angle onto `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (PI - angle).rem_euclid(TAU);
    if wrapped >= TAU {
        return PI;
    }
    PI - wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha12Rng;

    fn quiet_cfg() -> Config {
        let mut cfg = Config::default();
        cfg.pheromone.prob_emit = 0.0;
        cfg
    }

    #[test]
    fn normalize_angle_covers_half_open_interval() {
        assert_eq!(normalize_angle(PI), PI);
        assert_eq!(normalize_angle(-PI), PI);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-7.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);

        for i in -1000..=1000 {
            let angle = normalize_angle(i as f64 * 0.173);
            assert!(angle > -PI && angle <= PI, "angle {angle} out of range");
        }
    }

    #[test]
    fn agent_moves_along_heading() {
        let cfg = quiet_cfg();
        let sampler = Sampler::new(&cfg.pheromone).unwrap();
        let bounds = Bounds::new(100.0, 100.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        let mut agt = Agent::new(Point::new(10.0, 10.0), PI / 2.0, 2.0, 0.1, 30);
        update_agent(&mut agt, &mut [], &bounds, &cfg, &sampler, &mut rng);

        assert!((agt.position().x - 10.0).abs() < 1e-12);
        assert!((agt.position().y - 12.0).abs() < 1e-12);
        assert_eq!(agt.direction(), PI / 2.0);
    }

    #[test]
    fn wander_turn_fires_after_interval() {
        let mut cfg = quiet_cfg();
        cfg.colony.wander_interval = 3;
        let sampler = Sampler::new(&cfg.pheromone).unwrap();
        let bounds = Bounds::new(1000.0, 1000.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(5);

        let mut agt = Agent::new(Point::new(100.0, 100.0), 0.0, 0.0, 0.1, 30);
        for expected in 1..=3 {
            update_agent(&mut agt, &mut [], &bounds, &cfg, &sampler, &mut rng);
            assert_eq!(agt.wander_counter(), expected);
            assert_eq!(agt.direction(), 0.0);
        }

        update_agent(&mut agt, &mut [], &bounds, &cfg, &sampler, &mut rng);
        assert_eq!(agt.wander_counter(), 0);
        assert!(agt.direction().abs() <= 0.05);
    }

    #[test]
    fn pickup_turns_agent_around() {
        let cfg = quiet_cfg();
        let sampler = Sampler::new(&cfg.pheromone).unwrap();
        let bounds = Bounds::new(1000.0, 1000.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(1);

        let mut food_vec = vec![
            Food::new(Point::new(900.0, 900.0), 15.0, 10),
            Food::new(Point::new(100.0, 100.0), 15.0, 10),
            Food::new(Point::new(101.0, 100.0), 15.0, 10),
        ];
        let mut agt = Agent::new(Point::new(100.0, 100.0), 0.0, 0.0, 0.1, 30);

        let events = update_agent(&mut agt, &mut food_vec, &bounds, &cfg, &sampler, &mut rng);

        assert_eq!(events.i_food, Some(1));
        assert!(agt.has_food());
        assert_eq!(food_vec[1].amount(), 9);
        assert_eq!(food_vec[2].amount(), 10);

        // The heading is reversed, then bent a little toward the nest at (500, 500).
        let reversed = PI;
        let bend = normalize_angle(PI / 4.0 - reversed) * cfg.colony.steer_gain;
        assert!((agt.direction() - normalize_angle(reversed + bend)).abs() < 1e-12);
    }

    #[test]
    fn loaded_agent_steers_toward_nest() {
        let cfg = quiet_cfg();
        let sampler = Sampler::new(&cfg.pheromone).unwrap();
        let bounds = Bounds::new(1000.0, 1000.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(2);

        // Nest lies straight along +x; heading +y.
        let mut agt = Agent::new(Point::new(100.0, 500.0), PI / 2.0, 0.0, 0.1, 30).with_food(true);
        update_agent(&mut agt, &mut [], &bounds, &cfg, &sampler, &mut rng);

        let expected = PI / 2.0 - PI / 2.0 * cfg.colony.steer_gain;
        assert!((agt.direction() - expected).abs() < 1e-12);
        assert!(agt.has_food());
    }

    #[test]
    fn emission_records_carrying_state() {
        let mut cfg = Config::default();
        cfg.pheromone.prob_emit = 1.0;
        let sampler = Sampler::new(&cfg.pheromone).unwrap();
        let bounds = Bounds::new(1000.0, 1000.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(4);

        let mut agt = Agent::new(Point::new(100.0, 100.0), 0.0, 1.0, 0.1, 30).with_food(true);
        update_agent(&mut agt, &mut [], &bounds, &cfg, &sampler, &mut rng);

        let pheromone = agt.trail().iter().next().unwrap();
        assert_eq!(pheromone.kind(), PheromoneKind::Food);
        assert_eq!(pheromone.position(), Point::new(100.0, 100.0));
        assert_eq!(pheromone.strength(), 99.5);
    }
}
