//! Grid world and update engine for the infection simulation.
//!
//! A [`GridState`] holds the population; the [`SimulationEngine`] seeds it once
//! and then advances it one generation at a time. [`Simulation`] drives both for
//! a configured number of generations and records population statistics.

pub mod grid;
pub mod rules;
pub mod engine;
pub mod simulation;

pub use grid::GridState;
pub use rules::Neighbourhood;
pub use engine::SimulationEngine;
pub use simulation::{Simulation, SimulationResult};
