use crate::model::Point;
use serde::{Deserialize, Serialize};
use std::collections::{VecDeque, vec_deque};

/// What an agent was doing when it left a pheromone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PheromoneKind {
    /// Deposited while carrying food.
    Food,
    /// Deposited while foraging.
    Home,
}

impl PheromoneKind {
    pub fn from_carrying(has_food: bool) -> Self {
        if has_food { Self::Food } else { Self::Home }
    }
}

/// Scent marker left at a fixed position, fading every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pheromone {
    position: Point,
    kind: PheromoneKind,
    strength: f64,
    strength_init: f64,
}

impl Pheromone {
    pub fn new(position: Point, kind: PheromoneKind, strength: f64) -> Self {
        Self {
            position,
            kind,
            strength,
            strength_init: strength,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn kind(&self) -> PheromoneKind {
        self.kind
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Remaining strength relative to the deposit, in `(0, 1]` while alive.
    pub fn intensity(&self) -> f64 {
        self.strength / self.strength_init
    }
}

/// Bounded trail of pheromones owned by one agent, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PheromoneTrail {
    cap: usize,
    deque: VecDeque<Pheromone>,
}

impl PheromoneTrail {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            deque: VecDeque::with_capacity(cap + 1),
        }
    }

    /// Append a pheromone, dropping the oldest one once over capacity.
    pub fn deposit(&mut self, pheromone: Pheromone) {
        self.deque.push_back(pheromone);
        if self.deque.len() > self.cap {
            self.deque.pop_front();
        }
    }

    /// Weaken every pheromone by `rate` and drop the exhausted ones.
    pub fn decay(&mut self, rate: f64) {
        for pheromone in self.deque.iter_mut() {
            pheromone.strength -= rate;
        }
        self.deque.retain(|pheromone| pheromone.strength > 0.0);
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.deque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, Pheromone> {
        self.deque.iter()
    }
}

impl<'a> IntoIterator for &'a PheromoneTrail {
    type Item = &'a Pheromone;
    type IntoIter = vec_deque::Iter<'a, Pheromone>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
