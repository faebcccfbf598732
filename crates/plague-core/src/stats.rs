//! Population statistics collected per generation.

use crate::types::Cell;
use serde::{Deserialize, Serialize};

/// Number of cells of each type in one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub empty: usize,
    pub healthy: usize,
    pub infected: usize,
}

impl PopulationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cell: Cell) {
        match cell {
            Cell::Empty => self.empty += 1,
            Cell::Healthy => self.healthy += 1,
            Cell::Infected => self.infected += 1,
        }
    }

    pub fn get(&self, cell: Cell) -> usize {
        match cell {
            Cell::Empty => self.empty,
            Cell::Healthy => self.healthy,
            Cell::Infected => self.infected,
        }
    }

    /// Living organisms, healthy or infected
    pub fn organisms(&self) -> usize {
        self.healthy + self.infected
    }

    pub fn total(&self) -> usize {
        self.empty + self.healthy + self.infected
    }

    /// Share of living organisms that carry the infection
    pub fn infection_rate(&self) -> f64 {
        if self.organisms() == 0 {
            0.0
        } else {
            self.infected as f64 / self.organisms() as f64
        }
    }
}

impl FromIterator<Cell> for PopulationCounts {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut counts = Self::new();
        for cell in iter {
            counts.record(cell);
        }
        counts
    }
}

/// Snapshot taken after a generation completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    pub counts: PopulationCounts,
}

/// Ordered per-generation samples for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationSeries {
    samples: Vec<GenerationStats>,
}

impl PopulationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stats: GenerationStats) {
        debug_assert!(
            self.samples
                .last()
                .map_or(true, |last| last.generation < stats.generation),
            "samples must be pushed in generation order"
        );
        self.samples.push(stats);
    }

    pub fn samples(&self) -> &[GenerationStats] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (generation, count) points for one cell type
    pub fn series(&self, cell: Cell) -> Vec<(u64, usize)> {
        self.samples
            .iter()
            .map(|s| (s.generation, s.counts.get(cell)))
            .collect()
    }

    pub fn healthy_series(&self) -> Vec<(u64, usize)> {
        self.series(Cell::Healthy)
    }

    pub fn infected_series(&self) -> Vec<(u64, usize)> {
        self.series(Cell::Infected)
    }

    /// Generation with the most infected cells (earliest on ties)
    pub fn peak_infected(&self) -> Option<GenerationStats> {
        self.samples
            .iter()
            .copied()
            .reduce(|best, s| if s.counts.infected > best.counts.infected { s } else { best })
    }

    pub fn final_counts(&self) -> Option<PopulationCounts> {
        self.samples.last().map(|s| s.counts)
    }

    /// First generation in which no organism is left
    pub fn extinct_generation(&self) -> Option<u64> {
        self.samples
            .iter()
            .find(|s| s.counts.organisms() == 0)
            .map(|s| s.generation)
    }
}
