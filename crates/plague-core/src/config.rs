//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid configuration parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of the grid in cells
    pub width: i32,
    /// Height of the grid in cells
    pub height: i32,
}

impl GridConfig {
    /// Total number of cells
    pub fn capacity(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

/// Initial population placed by seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Organisms placed on empty cells
    pub healthy: usize,
    /// Organisms among those that start out infected
    pub infected: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            healthy: 25_000,
            infected: 2_500,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid configuration
    pub grid: GridConfig,
    /// Initial population
    pub population: PopulationConfig,
    /// Number of generations to run
    pub num_generations: u64,
    /// Random seed for reproducibility (entropy when unset)
    pub seed: Option<u64>,
    /// Pause between generations when driven interactively
    pub generation_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            population: PopulationConfig::default(),
            num_generations: 50,
            seed: None,
            generation_delay_ms: 200,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that the configuration describes a runnable simulation
    pub fn validate(&self) -> Result<()> {
        if self.grid.width <= 0
            || self.grid.height <= 0
            || self.grid.width.checked_mul(self.grid.height).is_none()
        {
            return Err(Error::InvalidDimensions {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        let capacity = self.grid.capacity();
        if self.population.healthy > capacity {
            return Err(Error::CapacityExceeded {
                cell: Cell::Healthy,
                requested: self.population.healthy,
                available: capacity,
            });
        }

        if self.population.infected > self.population.healthy {
            return Err(Error::CapacityExceeded {
                cell: Cell::Infected,
                requested: self.population.infected,
                available: self.population.healthy,
            });
        }

        if self.num_generations == 0 {
            return Err(Error::Validation(
                "num_generations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
