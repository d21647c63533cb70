//! Simulation of a colony of foraging ants on a bounded plane.
//!
//! Agents leave the nest at the center, wander until they stumble on a
//! food source, then curve back home to deliver it. Along the way they
//! drop pheromones that fade over time.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod driver;
pub mod engine;
pub mod food;
pub mod model;
pub mod stats;
pub mod trail;

pub use config::Config;
pub use engine::Simulation;
pub use model::{Bounds, Point, World};
